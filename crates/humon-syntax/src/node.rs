use crate::arena::Key;
use crate::token::TokenId;

pub type NodeId = Key<Node>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    List,
    Dict,
    Value,
    /// A dict member whose key has been read but whose value has not.
    Pending,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Dict => "dict",
            Self::Value => "value",
            Self::Pending => "pending",
        }
    }

    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Dict)
    }
}

/// A comment token and the node it belongs to; `None` means the document.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Comment {
    pub token: TokenId,
    pub owner: Option<NodeId>,
}

/// An `@key:value` annotation. The value is missing when the input ended
/// or was malformed before it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Metatag {
    pub key: TokenId,
    pub value: Option<TokenId>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub index: NodeId,
    pub parent: Option<NodeId>,
    pub ordinal: u32,
    /// First token of the node, comments and metatags included.
    pub first_token: TokenId,
    /// Last token of the node, comments and metatags included.
    pub last_token: TokenId,
    pub key_token: Option<TokenId>,
    /// The word, or the opening bracket of a container.
    pub value_token: Option<TokenId>,
    /// The word, or the closing bracket of a container.
    pub last_value_token: Option<TokenId>,
    pub children: Vec<NodeId>,
    pub metatags: Vec<Metatag>,
    pub comments: Vec<Comment>,
    /// How many earlier siblings share this node's key.
    pub shared_key_index: u32,
}

impl Node {
    pub fn new(index: NodeId, kind: NodeKind, token: TokenId) -> Self {
        Self {
            kind,
            index,
            parent: None,
            ordinal: 0,
            first_token: token,
            last_token: token,
            key_token: None,
            value_token: None,
            last_value_token: None,
            children: Vec::new(),
            metatags: Vec::new(),
            comments: Vec::new(),
            shared_key_index: 0,
        }
    }

    /// Settles the kind of a pending member once its value is seen.
    #[track_caller]
    pub fn resolve(&mut self, kind: NodeKind) {
        debug_assert_eq!(self.kind, NodeKind::Pending, "node {:?} already resolved", self.index);
        debug_assert_ne!(kind, NodeKind::Pending);
        self.kind = kind;
    }

    /// Widens the node's token span to include `token`.
    pub fn contain(&mut self, token: TokenId) {
        self.first_token = self.first_token.min(token);
        self.last_token = self.last_token.max(token);
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_widens_both_ends() {
        let mut node = Node::new(NodeId::new(0), NodeKind::Value, TokenId::new(5));
        node.contain(TokenId::new(7));
        node.contain(TokenId::new(3));
        node.contain(TokenId::new(6));

        assert_eq!(node.first_token, TokenId::new(3));
        assert_eq!(node.last_token, TokenId::new(7));
    }

    #[test]
    fn pending_resolves_once() {
        let mut node = Node::new(NodeId::new(1), NodeKind::Pending, TokenId::new(0));
        node.resolve(NodeKind::Dict);
        assert_eq!(node.kind, NodeKind::Dict);
        assert!(node.kind.is_container());
    }
}
