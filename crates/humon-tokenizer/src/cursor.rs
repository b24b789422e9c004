use humon_syntax::LineCol;

use crate::classes::{CharClass, classify};

pub(crate) const EOF_CHAR: char = '\0';

/// One decoded code point and where it sits in the source.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Point {
    pub(crate) ch: char,
    pub(crate) offset: usize,
    /// Encoded length in bytes; `\r\n` is one two-byte point.
    pub(crate) len: usize,
    pub(crate) class: CharClass,
    pub(crate) pos: LineCol,
}

impl Point {
    pub(crate) fn end(&self) -> usize {
        self.offset + self.len
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.class == CharClass::Eof
    }
}

/// Reads code points with one point of lookahead.
pub(crate) struct Cursor<'t> {
    text: &'t str,
    tab_size: u32,
    current: Point,
    lookahead: Point,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(text: &'t str, tab_size: u32) -> Self {
        let tab_size = tab_size.max(1);
        let current = decode(text, 0, LineCol::START);
        let lookahead = next_point(text, tab_size, &current);
        Self { text, tab_size, current, lookahead }
    }

    pub(crate) fn current(&self) -> Point {
        self.current
    }

    pub(crate) fn lookahead(&self) -> Point {
        self.lookahead
    }

    pub(crate) fn text(&self) -> &'t str {
        self.text
    }

    pub(crate) fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.lookahead);
        self.lookahead = next_point(self.text, self.tab_size, &self.current);
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(Point) -> bool) {
        while !self.current.is_eof() && f(self.current) {
            self.advance();
        }
    }

    /// Advances until the current point starts at or beyond `offset`.
    pub(crate) fn advance_to(&mut self, offset: usize) {
        while !self.current.is_eof() && self.current.offset < offset {
            self.advance();
        }
    }
}

fn decode(text: &str, offset: usize, pos: LineCol) -> Point {
    let Some(ch) = text[offset..].chars().next() else {
        return Point { ch: EOF_CHAR, offset, len: 0, class: CharClass::Eof, pos };
    };

    let len = if ch == '\r' && text.as_bytes().get(offset + 1) == Some(&b'\n') {
        2
    } else {
        ch.len_utf8()
    };

    Point { ch, offset, len, class: classify(ch), pos }
}

fn next_point(text: &str, tab_size: u32, point: &Point) -> Point {
    let LineCol { line, col } = point.pos;
    let pos = match point.class {
        CharClass::Eof => return *point,
        CharClass::Newline => LineCol::new(line + 1, 1),
        CharClass::Tab => LineCol::new(line, col + tab_size - ((col - 1) % tab_size)),
        CharClass::Space | CharClass::Other => LineCol::new(line, col + 1),
    };
    decode(text, point.end(), pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_multibyte_points() {
        let mut cursor = Cursor::new("aé€😀", 4);
        let mut seen = Vec::new();
        while !cursor.current().is_eof() {
            let point = cursor.current();
            seen.push((point.ch, point.len, point.pos.col));
            cursor.advance();
        }

        assert_eq!(seen, vec![('a', 1, 1), ('é', 2, 2), ('€', 3, 3), ('😀', 4, 4)]);
        assert_eq!(cursor.current().offset, "aé€😀".len());
    }

    #[test]
    fn crlf_is_one_newline() {
        let mut cursor = Cursor::new("a\r\nb", 4);
        cursor.advance();
        let newline = cursor.current();
        assert_eq!(newline.class, CharClass::Newline);
        assert_eq!(newline.len, 2);

        cursor.advance();
        assert_eq!(cursor.current().ch, 'b');
        assert_eq!(cursor.current().pos, LineCol::new(2, 1));
    }

    #[test]
    fn tabs_advance_to_next_stop() {
        let mut cursor = Cursor::new("a\tb\t\tc", 4);
        cursor.advance_while(|p| p.ch != 'b');
        assert_eq!(cursor.current().pos, LineCol::new(1, 5));
        cursor.advance_while(|p| p.ch != 'c');
        assert_eq!(cursor.current().pos, LineCol::new(1, 13));
    }

    #[test]
    fn lookahead_peeks_one_point() {
        let mut cursor = Cursor::new("/*", 4);
        assert_eq!(cursor.current().ch, '/');
        assert_eq!(cursor.lookahead().ch, '*');
        cursor.advance();
        cursor.advance();
        assert!(cursor.current().is_eof());
        assert!(cursor.lookahead().is_eof());
    }
}
