//! Data model shared by the Humon tokenizer, parser and document.
//!
//! Tokens and nodes live in index-addressed arenas. Every cross-reference
//! (parent, child, key, owner) is a [`Key`] resolved through the owning
//! arena at the point of use, so no reference outlives a growth of the arena.

/// Index-stable growable storage.
pub mod arena;
mod node;
mod token;
mod token_set;

pub use arena::{Arena, Key};
/// Tree elements and the annotations attached to them.
pub use node::{Comment, Metatag, Node, NodeId, NodeKind};
/// Lexical tokens and their source locations.
pub use token::{LineCol, QuoteStyle, Token, TokenId, TokenKind};
/// Compact set for grouping `TokenKind` values.
pub use token_set::TokenSet;
