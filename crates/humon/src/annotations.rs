use std::fmt;

use humon_syntax::{Comment, Metatag, NodeId};

use crate::{NodeRef, TokenRef, Trove};

/// An `@key:value` annotation on a node or on the document.
#[derive(Clone, Copy)]
pub struct MetatagRef<'t> {
    trove: &'t Trove,
    metatag: Metatag,
    owner: Option<NodeId>,
}

impl<'t> MetatagRef<'t> {
    pub fn key_token(&self) -> TokenRef<'t> {
        TokenRef::new(self.trove, self.metatag.key)
    }

    pub fn value_token(&self) -> Option<TokenRef<'t>> {
        self.metatag.value.map(|value| TokenRef::new(self.trove, value))
    }

    pub fn key(&self) -> &'t str {
        self.key_token().value()
    }

    /// Missing when the document broke off before the value.
    pub fn value(&self) -> Option<&'t str> {
        self.value_token().map(|token| token.value())
    }

    /// `None` for document metatags.
    pub fn owner(&self) -> Option<NodeRef<'t>> {
        self.owner.map(|id| NodeRef::new(self.trove, id))
    }
}

impl fmt::Debug for MetatagRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetatagRef")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("owner", &self.owner)
            .finish()
    }
}

/// A comment and the node it belongs to.
#[derive(Clone, Copy)]
pub struct CommentRef<'t> {
    trove: &'t Trove,
    comment: Comment,
}

impl<'t> CommentRef<'t> {
    pub fn token(&self) -> TokenRef<'t> {
        TokenRef::new(self.trove, self.comment.token)
    }

    /// The comment as written, markers included.
    pub fn text(&self) -> &'t str {
        self.token().raw()
    }

    /// `None` for document comments.
    pub fn owner(&self) -> Option<NodeRef<'t>> {
        self.comment.owner.map(|id| NodeRef::new(self.trove, id))
    }
}

impl fmt::Debug for CommentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentRef")
            .field("text", &self.text())
            .field("owner", &self.comment.owner)
            .finish()
    }
}

/// Metatags and comments of one owner, shared by [`Trove`] and [`NodeRef`].
#[derive(Clone, Copy)]
pub(crate) struct Annotations<'t> {
    pub(crate) trove: &'t Trove,
    pub(crate) owner: Option<NodeId>,
    pub(crate) metatags: &'t [Metatag],
    pub(crate) comments: &'t [Comment],
}

impl<'t> Annotations<'t> {
    pub(crate) fn metatag(self, index: usize) -> Option<MetatagRef<'t>> {
        let metatag = *self.metatags.get(index)?;
        Some(MetatagRef { trove: self.trove, metatag, owner: self.owner })
    }

    pub(crate) fn metatags(self) -> impl Iterator<Item = MetatagRef<'t>> {
        self.metatags.iter().map(move |&metatag| MetatagRef {
            trove: self.trove,
            metatag,
            owner: self.owner,
        })
    }

    /// The value of the first metatag keyed `key`.
    pub(crate) fn metatag_value(self, key: &str) -> Option<&'t str> {
        self.metatags().find(|m| m.key() == key).and_then(|m| m.value())
    }

    pub(crate) fn metatags_with_value(self, value: &str) -> impl Iterator<Item = MetatagRef<'t>> {
        self.metatags().filter(move |m| m.value() == Some(value))
    }

    pub(crate) fn comment(self, index: usize) -> Option<CommentRef<'t>> {
        let comment = *self.comments.get(index)?;
        Some(CommentRef { trove: self.trove, comment })
    }

    pub(crate) fn comments(self) -> impl Iterator<Item = CommentRef<'t>> {
        self.comments.iter().map(move |&comment| CommentRef { trove: self.trove, comment })
    }

    pub(crate) fn comments_containing(self, text: &str) -> impl Iterator<Item = CommentRef<'t>> {
        self.comments().filter(move |c| c.text().contains(text))
    }
}
