use humon_errors::Diagnostic;
use humon_syntax::{Arena, Comment, Metatag, Node, NodeId, Token};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// The result of parsing one text. Whatever parsed is kept even when
/// `diagnostics` is not empty.
#[derive(Debug)]
pub struct Parse {
    pub tokens: Arena<Token>,
    pub nodes: Arena<Node>,
    /// Comments owned by the document rather than a node.
    pub comments: Vec<Comment>,
    /// Metatags owned by the document rather than a node.
    pub metatags: Vec<Metatag>,
    /// Tokenizer diagnostics first, then parser diagnostics, each in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId::new(0))
    }
}

pub fn parse(text: &str, tab_size: u32) -> Parse {
    let tokenized = humon_tokenizer::tokenize(text, tab_size);
    let mut parser = parser::Parser::new(text, tokenized);
    grammar::document(&mut parser);
    parser.finish()
}
