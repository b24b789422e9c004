use std::fmt;

use humon_syntax::{LineCol, QuoteStyle, Token, TokenId, TokenKind};
use text_size::TextRange;

use crate::Trove;

/// A token of a [`Trove`].
#[derive(Clone, Copy)]
pub struct TokenRef<'t> {
    trove: &'t Trove,
    id: TokenId,
}

impl<'t> TokenRef<'t> {
    pub(crate) fn new(trove: &'t Trove, id: TokenId) -> Self {
        Self { trove, id }
    }

    fn data(&self) -> &'t Token {
        self.trove.token_data(self.id)
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.data().kind
    }

    pub fn quote(&self) -> QuoteStyle {
        self.data().quote
    }

    /// The exact source text, quotes and escapes included.
    pub fn raw(&self) -> &'t str {
        self.data().raw(self.trove.source_text())
    }

    /// The payload with quotes removed and escapes applied.
    pub fn value(&self) -> &'t str {
        self.data().value(self.trove.source_text())
    }

    pub fn start(&self) -> LineCol {
        self.data().start
    }

    pub fn end(&self) -> LineCol {
        self.data().end
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }
}

impl PartialEq for TokenRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.trove, other.trove) && self.id == other.id
    }
}

impl Eq for TokenRef<'_> {}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("raw", &self.raw())
            .finish()
    }
}

impl fmt::Display for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
