use std::path::Path;
use std::str::FromStr;

use humon_errors::Diagnostic;
use humon_parse::Parse;
use humon_syntax::{Arena, Comment, Metatag, Node, NodeId, Token, TokenId};

use crate::annotations::{Annotations, CommentRef, MetatagRef};
use crate::{Error, LoadOptions, NodeRef, Result, TokenRef, address};

/// A parsed document: its text, tokens, nodes, and the comments, metatags
/// and errors that belong to the document itself.
///
/// A trove with errors is still fully modeled; whatever parsed is available.
#[derive(Debug)]
pub struct Trove {
    text: String,
    options: LoadOptions,
    tokens: Arena<Token>,
    nodes: Arena<Node>,
    comments: Vec<Comment>,
    metatags: Vec<Metatag>,
    errors: Vec<Diagnostic>,
}

impl FromStr for Trove {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_str_with_options(text, LoadOptions::default())
    }
}

impl Trove {
    pub fn from_str_with_options(text: &str, options: LoadOptions) -> Result<Self> {
        Self::load(text.to_owned(), options)
    }

    pub fn from_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::BadFile { path: path.to_owned(), source })?;
        Self::load(text, options)
    }

    fn load(text: String, options: LoadOptions) -> Result<Self> {
        options.validate()?;

        let Parse { tokens, nodes, comments, metatags, diagnostics } =
            humon_parse::parse(&text, options.tab_size());
        tracing::debug!(
            tokens = tokens.len(),
            nodes = nodes.len(),
            errors = diagnostics.len(),
            "loaded trove"
        );

        Ok(Self { text, options, tokens, nodes, comments, metatags, errors: diagnostics })
    }

    pub(crate) fn token_data(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    fn annotations(&self) -> Annotations<'_> {
        Annotations { trove: self, owner: None, metatags: &self.metatags, comments: &self.comments }
    }

    /// The whole document as loaded; every token in order, byte for byte.
    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token(&self, id: impl Into<TokenId>) -> Option<TokenRef<'_>> {
        let id = id.into();
        self.tokens.get(id).map(|_| TokenRef::new(self, id))
    }

    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'_>> {
        (0..self.tokens.len() as u32).map(|index| TokenRef::new(self, TokenId::new(index)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: impl Into<NodeId>) -> Option<NodeRef<'_>> {
        let id = id.into();
        self.nodes.get(id).map(|_| NodeRef::new(self, id))
    }

    /// Nodes in allocation order: every parent before its children.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len() as u32).map(|index| NodeRef::new(self, NodeId::new(index)))
    }

    /// `None` for a document with no value.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.node(NodeId::new(0))
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fails with [`Error::TroveHasErrors`] if anything was recorded while loading.
    pub fn check(&self) -> Result<()> {
        match self.errors.len() {
            0 => Ok(()),
            count => Err(Error::TroveHasErrors { count }),
        }
    }

    pub fn metatag_count(&self) -> usize {
        self.metatags.len()
    }

    pub fn metatag(&self, index: usize) -> Option<MetatagRef<'_>> {
        self.annotations().metatag(index)
    }

    pub fn metatags(&self) -> impl Iterator<Item = MetatagRef<'_>> {
        self.annotations().metatags()
    }

    pub fn metatag_value(&self, key: &str) -> Option<&str> {
        self.annotations().metatag_value(key)
    }

    pub fn has_metatag(&self, key: &str) -> bool {
        self.metatags().any(|m| m.key() == key)
    }

    pub fn metatags_with_value<'a>(
        &'a self,
        value: &'a str,
    ) -> impl Iterator<Item = MetatagRef<'a>> {
        self.annotations().metatags_with_value(value)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn comment(&self, index: usize) -> Option<CommentRef<'_>> {
        self.annotations().comment(index)
    }

    pub fn comments(&self) -> impl Iterator<Item = CommentRef<'_>> {
        self.annotations().comments()
    }

    pub fn comments_containing<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = CommentRef<'a>> {
        self.annotations().comments_containing(text)
    }

    pub fn find_nodes_with_metatag_key<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = NodeRef<'a>> {
        self.nodes().filter(move |node| node.has_metatag(key))
    }

    pub fn find_nodes_with_metatag_value<'a>(
        &'a self,
        value: &'a str,
    ) -> impl Iterator<Item = NodeRef<'a>> {
        self.nodes().filter(move |node| node.metatags_with_value(value).next().is_some())
    }

    pub fn find_nodes_with_metatag<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = NodeRef<'a>> {
        self.nodes()
            .filter(move |node| node.metatags().any(|m| m.key() == key && m.value() == Some(value)))
    }

    pub fn find_nodes_with_comment_containing<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = NodeRef<'a>> {
        self.nodes().filter(move |node| node.comments_containing(text).next().is_some())
    }

    /// Resolves an absolute address such as `/servers/0/name`.
    pub fn resolve(&self, address: &str) -> Result<NodeRef<'_>> {
        address::resolve(self, None, address)
    }

    pub fn get(&self, address: &str) -> Option<NodeRef<'_>> {
        self.resolve(address).ok()
    }
}
