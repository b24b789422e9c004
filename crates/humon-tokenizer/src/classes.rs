/// Whitespace classification of a single code point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CharClass {
    Other,
    /// Space-like: advances the column by one. Commas count as spaces.
    Space,
    Tab,
    Newline,
    Eof,
}

impl CharClass {
    pub(crate) fn is_whitespace(self) -> bool {
        matches!(self, Self::Space | Self::Tab | Self::Newline)
    }
}

pub(crate) fn classify(c: char) -> CharClass {
    match c {
        ' ' | ',' => CharClass::Space,
        '\t' => CharClass::Tab,
        '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}' => CharClass::Newline,
        '\u{00A0}'
        | '\u{1680}'
        | '\u{2000}'..='\u{200A}'
        | '\u{202F}'
        | '\u{205F}'
        | '\u{3000}' => CharClass::Space,
        _ => CharClass::Other,
    }
}

/// Whether the tokenizer treats `c` as a separator between tokens.
pub fn is_whitespace(c: char) -> bool {
    classify(c).is_whitespace()
}
