use text_size::TextRange;

use crate::arena::Key;

pub type TokenId = Key<Token>;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COLON,
    AT,

    WORD,
    COMMENT,

    EOF,
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::LEFT_BRACKET => "startList",
            Self::RIGHT_BRACKET => "endList",
            Self::LEFT_BRACE => "startDict",
            Self::RIGHT_BRACE => "endDict",
            Self::COLON => "keyValueSep",
            Self::AT => "metatag",
            Self::WORD => "word",
            Self::COMMENT => "comment",
            Self::EOF => "eof",
        }
    }
}

/// How a word token was delimited in the source.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum QuoteStyle {
    #[default]
    Unquoted,
    Single,
    Double,
    Backtick,
    /// `^tag^...^tag^`, verbatim content.
    Tag,
}

impl QuoteStyle {
    pub const fn delimiter(self) -> Option<char> {
        match self {
            Self::Single => Some('\''),
            Self::Double => Some('"'),
            Self::Backtick => Some('`'),
            Self::Unquoted | Self::Tag => None,
        }
    }
}

/// One-based line and column. Columns count code points, with tabs advancing
/// to the next tab stop.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const START: Self = Self { line: 1, col: 1 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub quote: QuoteStyle,
    /// Exact source bytes, delimiters included.
    pub range: TextRange,
    /// Payload bytes, delimiters excluded.
    pub value_range: TextRange,
    pub start: LineCol,
    /// Position just past the last code point of the token.
    pub end: LineCol,
    /// Set only when unescaping changed the payload.
    pub unescaped: Option<Box<str>>,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange, start: LineCol, end: LineCol) -> Self {
        Self {
            kind,
            quote: QuoteStyle::Unquoted,
            range,
            value_range: range,
            start,
            end,
            unescaped: None,
        }
    }

    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range]
    }

    pub fn value<'a>(&'a self, text: &'a str) -> &'a str {
        match &self.unescaped {
            Some(value) => value,
            None => &text[self.value_range],
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.quote != QuoteStyle::Unquoted
    }
}
