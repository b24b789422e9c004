use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
use humon_syntax::{LineCol, Token, TokenId};
pub use text_size::TextRange;
use thiserror::Error;

/// Problems recorded while tokenizing or parsing. None of them stops the
/// tokenizer; only `UnexpectedEof` stops the parser.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Error)]
pub enum ErrorCode {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("syntax error")]
    SyntaxError,
    #[error("container start and end do not match")]
    StartEndMismatch,
    #[error("more than one root value")]
    TooManyRoots,
    #[error("unfinished quote")]
    UnfinishedQuote,
    #[error("unfinished C-style comment")]
    UnfinishedCStyleComment,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    token: Option<TokenId>,
    position: LineCol,
    range: TextRange,
}

impl Diagnostic {
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        token: Option<TokenId>,
        position: LineCol,
        range: TextRange,
    ) -> Self {
        Self { code, message: message.into(), token, position, range }
    }

    pub fn at_token(
        code: ErrorCode,
        message: impl Into<String>,
        id: TokenId,
        token: &Token,
    ) -> Self {
        Self::new(code, message, Some(id), token.start, token.range)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn token(&self) -> Option<TokenId> {
        self.token
    }

    pub fn position(&self) -> LineCol {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn col(&self) -> u32 {
        self.position.col
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .line_start(1)
                .annotation(Level::Error.span(self.range.into()).label(self.code.label()))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl ErrorCode {
    fn label(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "input ends here",
            Self::SyntaxError => "unexpected token",
            Self::StartEndMismatch => "mismatched closing bracket",
            Self::TooManyRoots => "extra root value",
            Self::UnfinishedQuote => "quote starts here",
            Self::UnfinishedCStyleComment => "comment starts here",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.position, self.message)
    }
}
