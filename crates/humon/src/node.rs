use std::fmt;

use humon_syntax::{Node, NodeId, NodeKind};
use text_size::TextRange;

use crate::annotations::{Annotations, CommentRef, MetatagRef};
use crate::{Result, TokenRef, Trove, address};

/// A node of a [`Trove`]. Cheap to copy; every accessor looks the node up by
/// index in its trove.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    trove: &'t Trove,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(trove: &'t Trove, id: NodeId) -> Self {
        Self { trove, id }
    }

    fn data(&self) -> &'t Node {
        self.trove.node_data(self.id)
    }

    fn annotations(&self) -> Annotations<'t> {
        let node = self.data();
        Annotations {
            trove: self.trove,
            owner: Some(self.id),
            metatags: &node.metatags,
            comments: &node.comments,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn trove(&self) -> &'t Trove {
        self.trove
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_root(&self) -> bool {
        self.data().is_root()
    }

    pub fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| Self::new(self.trove, id))
    }

    /// Position among the parent's children.
    pub fn ordinal(&self) -> usize {
        self.data().ordinal as usize
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, ordinal: usize) -> Option<Self> {
        let id = *self.data().children.get(ordinal)?;
        Some(Self::new(self.trove, id))
    }

    pub fn first_child(&self) -> Option<Self> {
        self.child(0)
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.parent()?.child(self.ordinal() + 1)
    }

    pub fn children(&self) -> impl Iterator<Item = Self> + use<'t> {
        let trove = self.trove;
        self.data().children.iter().map(move |&id| Self::new(trove, id))
    }

    /// The first child keyed `key`. Later children with the same key are
    /// reached by ordinal.
    pub fn child_by_key(&self, key: &str) -> Option<Self> {
        self.children().find(|child| child.key() == Some(key))
    }

    pub fn has_key(&self) -> bool {
        self.data().key_token.is_some()
    }

    pub fn key_token(&self) -> Option<TokenRef<'t>> {
        self.data().key_token.map(|id| TokenRef::new(self.trove, id))
    }

    pub fn key(&self) -> Option<&'t str> {
        self.key_token().map(|token| token.value())
    }

    /// The word of a value node, or the opening bracket of a container.
    pub fn value_token(&self) -> Option<TokenRef<'t>> {
        self.data().value_token.map(|id| TokenRef::new(self.trove, id))
    }

    /// The word of a value node, or the closing bracket of a container.
    pub fn last_value_token(&self) -> Option<TokenRef<'t>> {
        self.data().last_value_token.map(|id| TokenRef::new(self.trove, id))
    }

    /// The text of a value node. Containers have none.
    pub fn value(&self) -> Option<&'t str> {
        match self.kind() {
            NodeKind::Value => self.value_token().map(|token| token.value()),
            NodeKind::List | NodeKind::Dict | NodeKind::Pending => None,
        }
    }

    pub fn first_token(&self) -> TokenRef<'t> {
        TokenRef::new(self.trove, self.data().first_token)
    }

    pub fn last_token(&self) -> TokenRef<'t> {
        TokenRef::new(self.trove, self.data().last_token)
    }

    /// How many earlier siblings share this node's key.
    pub fn shared_key_index(&self) -> usize {
        self.data().shared_key_index as usize
    }

    /// The source text from the node's first token to its last, comments and
    /// metatags included.
    pub fn source_text(&self) -> &'t str {
        let range =
            TextRange::new(self.first_token().range().start(), self.last_token().range().end());
        &self.trove.source_text()[range]
    }

    pub fn metatag_count(&self) -> usize {
        self.data().metatags.len()
    }

    pub fn metatag(&self, index: usize) -> Option<MetatagRef<'t>> {
        self.annotations().metatag(index)
    }

    pub fn metatags(&self) -> impl Iterator<Item = MetatagRef<'t>> + use<'t> {
        self.annotations().metatags()
    }

    pub fn metatag_value(&self, key: &str) -> Option<&'t str> {
        self.annotations().metatag_value(key)
    }

    pub fn has_metatag(&self, key: &str) -> bool {
        self.metatags().any(|m| m.key() == key)
    }

    pub fn metatags_with_value<'a>(
        &self,
        value: &'a str,
    ) -> impl Iterator<Item = MetatagRef<'t>> + use<'t, 'a> {
        self.annotations().metatags_with_value(value)
    }

    pub fn comment_count(&self) -> usize {
        self.data().comments.len()
    }

    pub fn comment(&self, index: usize) -> Option<CommentRef<'t>> {
        self.annotations().comment(index)
    }

    pub fn comments(&self) -> impl Iterator<Item = CommentRef<'t>> + use<'t> {
        self.annotations().comments()
    }

    pub fn comments_containing<'a>(
        &self,
        text: &'a str,
    ) -> impl Iterator<Item = CommentRef<'t>> + use<'t, 'a> {
        self.annotations().comments_containing(text)
    }

    /// The absolute address of this node, e.g. `/config/servers/0`.
    pub fn address(&self) -> String {
        address::render(*self)
    }

    /// Resolves `address` relative to this node; a leading `/` starts from the
    /// root instead.
    pub fn resolve(&self, address: &str) -> Result<Self> {
        address::resolve(self.trove, Some(*self), address)
    }

    pub fn get(&self, address: &str) -> Option<Self> {
        self.resolve(address).ok()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.trove, other.trove) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("address", &self.address())
            .finish()
    }
}
