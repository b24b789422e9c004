mod classes;
mod cursor;

use classes::{CharClass, classify};
pub use classes::is_whitespace;
use cursor::{Cursor, Point};
use humon_errors::{Diagnostic, ErrorCode};
use humon_syntax::TokenKind::*;
pub use humon_syntax::{Arena, QuoteStyle, Token, TokenId, TokenKind};
use text_size::{TextRange, TextSize};

/// Every token of a text, ending with exactly one `EOF`.
#[derive(Debug)]
pub struct Tokenized {
    pub tokens: Arena<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn tokenize(text: &str, tab_size: u32) -> Tokenized {
    Tokenizer::new(text, tab_size).finish()
}

pub struct Tokenizer<'t> {
    cursor: Cursor<'t>,
    tokens: Arena<Token>,
    diagnostics: Vec<Diagnostic>,
    eof: Option<TokenId>,
}

impl<'t> Tokenizer<'t> {
    pub fn new(text: &'t str, tab_size: u32) -> Self {
        Self {
            cursor: Cursor::new(text, tab_size),
            tokens: Arena::with_capacity(text.len() / 4),
            diagnostics: Vec::new(),
            eof: None,
        }
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub fn tokens(&self) -> &Arena<Token> {
        &self.tokens
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Scans the next token. Once the end is reached, keeps returning the
    /// `EOF` token.
    pub fn next_token_index(&mut self) -> TokenId {
        if let Some(eof) = self.eof {
            return eof;
        }

        self.cursor.advance_while(|p| p.class.is_whitespace());
        let start = self.cursor.current();

        if start.is_eof() {
            let eof = self.push(EOF, start);
            self.eof = Some(eof);
            return eof;
        }

        match start.ch {
            '[' => self.punctuation(LEFT_BRACKET, start),
            ']' => self.punctuation(RIGHT_BRACKET, start),
            '{' => self.punctuation(LEFT_BRACE, start),
            '}' => self.punctuation(RIGHT_BRACE, start),
            ':' => self.punctuation(COLON, start),
            '@' => self.punctuation(AT, start),
            '#' => self.line_comment(start),
            '/' if self.cursor.lookahead().ch == '/' => self.line_comment(start),
            '/' if self.cursor.lookahead().ch == '*' => self.block_comment(start),
            '\'' => self.quoted_word(start, '\'', QuoteStyle::Single),
            '"' => self.quoted_word(start, '"', QuoteStyle::Double),
            '`' => self.quoted_word(start, '`', QuoteStyle::Backtick),
            '^' => match self.tag_quoted_word(start) {
                Some(token) => token,
                None => self.word(start),
            },
            _ => self.word(start),
        }
    }

    pub fn finish(mut self) -> Tokenized {
        while self.eof.is_none() {
            self.next_token_index();
        }

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.diagnostics.len(),
            "tokenized"
        );
        Tokenized { tokens: self.tokens, diagnostics: self.diagnostics }
    }

    fn punctuation(&mut self, kind: TokenKind, start: Point) -> TokenId {
        self.cursor.advance();
        self.push(kind, start)
    }

    fn line_comment(&mut self, start: Point) -> TokenId {
        self.cursor.advance_while(|p| p.class != CharClass::Newline);
        self.push(COMMENT, start)
    }

    fn block_comment(&mut self, start: Point) -> TokenId {
        self.cursor.advance();
        self.cursor.advance();

        loop {
            let point = self.cursor.current();
            if point.is_eof() {
                let id = self.push(COMMENT, start);
                self.error_at(
                    ErrorCode::UnfinishedCStyleComment,
                    "`/*` comment is never closed",
                    id,
                    start.offset,
                    2,
                );
                return id;
            }

            self.cursor.advance();
            if point.ch == '*' && self.cursor.current().ch == '/' {
                self.cursor.advance();
                return self.push(COMMENT, start);
            }
        }
    }

    fn word(&mut self, start: Point) -> TokenId {
        let text = self.cursor.text();
        let mut unescaped = None;

        loop {
            let point = self.cursor.current();
            if point.is_eof() || point.class.is_whitespace() {
                break;
            }

            match point.ch {
                '{' | '}' | '[' | ']' | ':' | '@' | '#' => break,
                '/' if matches!(self.cursor.lookahead().ch, '/' | '*') => break,
                '\\' => self.escape(start.offset, &mut unescaped),
                _ => {
                    if let Some(buf) = &mut unescaped {
                        buf.push_str(&text[point.offset..point.end()]);
                    }
                    self.cursor.advance();
                }
            }
        }

        let value_range = range(start.offset, self.cursor.current().offset);
        self.push_word(start, QuoteStyle::Unquoted, value_range, unescaped)
    }

    fn quoted_word(&mut self, start: Point, delimiter: char, quote: QuoteStyle) -> TokenId {
        let text = self.cursor.text();
        self.cursor.advance();
        let value_start = self.cursor.current().offset;
        let mut unescaped = None;

        let value_end = loop {
            let point = self.cursor.current();
            if point.is_eof() {
                break None;
            }

            match point.ch {
                '\\' => self.escape(value_start, &mut unescaped),
                c if c == delimiter => {
                    self.cursor.advance();
                    break Some(point.offset);
                }
                _ => {
                    if let Some(buf) = &mut unescaped {
                        buf.push_str(&text[point.offset..point.end()]);
                    }
                    self.cursor.advance();
                }
            }
        };

        let end = value_end.unwrap_or(self.cursor.current().offset);
        let id = self.push_word(start, quote, range(value_start, end), unescaped);
        if value_end.is_none() {
            let message = format!("quoted word starting with {delimiter} is never closed");
            self.error_at(ErrorCode::UnfinishedQuote, message, id, start.offset, 1);
        }
        id
    }

    /// Scans `^tag^...^tag^`. Returns `None` when the `^` does not open a
    /// tag marker, in which case it starts an ordinary word.
    fn tag_quoted_word(&mut self, start: Point) -> Option<TokenId> {
        let text = self.cursor.text();
        let marker = tag_marker(&text[start.offset..])?;
        let value_start = start.offset + marker.len();
        let value_end = text[value_start..].find(marker).map(|i| value_start + i);

        let end = value_end.map_or(text.len(), |end| end + marker.len());
        self.cursor.advance_to(end);

        let value_range = range(value_start, value_end.unwrap_or(text.len()));
        let id = self.push_word(start, QuoteStyle::Tag, value_range, None);
        if value_end.is_none() {
            let message = format!("tag-quoted word is never closed with {marker}");
            self.error_at(ErrorCode::UnfinishedQuote, message, id, start.offset, marker.len());
        }
        Some(id)
    }

    /// Consumes a backslash and the code point it escapes.
    fn escape(&mut self, value_start: usize, unescaped: &mut Option<String>) {
        let text = self.cursor.text();
        let backslash = self.cursor.current();
        let buf = unescaped.get_or_insert_with(|| text[value_start..backslash.offset].to_owned());

        self.cursor.advance();
        let escaped = self.cursor.current();
        if escaped.is_eof() {
            buf.push('\\');
            return;
        }

        buf.push_str(&text[escaped.offset..escaped.end()]);
        self.cursor.advance();
    }

    fn push(&mut self, kind: TokenKind, start: Point) -> TokenId {
        let end = self.cursor.current();
        self.tokens.alloc(Token::new(kind, range(start.offset, end.offset), start.pos, end.pos))
    }

    fn push_word(
        &mut self,
        start: Point,
        quote: QuoteStyle,
        value_range: TextRange,
        unescaped: Option<String>,
    ) -> TokenId {
        let end = self.cursor.current();
        let mut token = Token::new(WORD, range(start.offset, end.offset), start.pos, end.pos);
        token.quote = quote;
        token.value_range = value_range;
        token.unescaped = unescaped.map(String::into_boxed_str);
        self.tokens.alloc(token)
    }

    fn error_at(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        id: TokenId,
        offset: usize,
        len: usize,
    ) {
        let token = &self.tokens[id];
        let diagnostic =
            Diagnostic::new(code, message, Some(id), token.start, range(offset, offset + len));
        tracing::debug!(%diagnostic, "tokenizer error");
        self.diagnostics.push(diagnostic);
    }
}

/// The `^tag^` marker `text` starts with, if any. The tag between the carets
/// may be empty but holds no whitespace.
pub fn tag_marker(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('^')?;
    let tag_len = rest.find(|c: char| c == '^' || classify(c) != CharClass::Other)?;
    rest[tag_len..].starts_with('^').then(|| &text[..tag_len + 2])
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
}
