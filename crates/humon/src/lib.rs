//! Load Humon documents and query them.
//!
//! ```text
//! {
//!     // comments and @metatags stay attached to what they annotate
//!     servers: [ alpha beta ] @role:primary
//! }
//! ```
//!
//! [`Trove`] owns the text and everything parsed from it. [`NodeRef`] and
//! [`TokenRef`] are copyable handles into a trove; nodes are also reachable
//! by address, e.g. `/servers/1`.

mod address;
mod annotations;
mod error;
mod node;
mod options;
mod token;
mod trove;

pub use annotations::{CommentRef, MetatagRef};
pub use error::{Error, Result};
pub use humon_errors::{Diagnostic, ErrorCode, Renderer, TextRange};
pub use humon_syntax::{LineCol, NodeId, NodeKind, QuoteStyle, TokenId, TokenKind};
pub use node::NodeRef;
pub use options::{DEFAULT_TAB_SIZE, LoadOptions};
pub use token::TokenRef;
pub use trove::Trove;
