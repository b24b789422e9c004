use drop_bomb::DropBomb;
use humon_errors::{Diagnostic, ErrorCode};
use humon_syntax::{
    Arena, Comment, Metatag, Node, NodeId, NodeKind, Token, TokenId, TokenKind,
};
use humon_tokenizer::Tokenized;
use rustc_hash::FxHashMap;

use crate::Parse;

/// What the grammar expects next. Used for tracing and error messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum State {
    Document,
    ExtraRoot,
    List,
    DictKeyOrEnd,
    MemberSeparator,
    MemberValue,
    MetatagStartOrKey,
    MetatagSeparator,
    MetatagValue,
    MetatagGroupKeyOrEnd,
    MetatagGroupSeparator,
    MetatagGroupValue,
}

impl State {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::ExtraRoot => "extraRoot",
            Self::List => "list",
            Self::DictKeyOrEnd => "dict-keyOrEnd",
            Self::MemberSeparator => "member-separator",
            Self::MemberValue => "member-value",
            Self::MetatagStartOrKey => "metatag-groupOrKey",
            Self::MetatagSeparator => "metatag-separator",
            Self::MetatagValue => "metatag-value",
            Self::MetatagGroupKeyOrEnd => "metatagGroup-keyOrEnd",
            Self::MetatagGroupSeparator => "metatagGroup-separator",
            Self::MetatagGroupValue => "metatagGroup-value",
        }
    }

    const fn expected(self) -> &'static str {
        match self {
            Self::Document | Self::MemberValue => "a value",
            Self::ExtraRoot => "a closing bracket",
            Self::List => "a value or `]`",
            Self::DictKeyOrEnd => "a key or `}`",
            Self::MemberSeparator | Self::MetatagSeparator | Self::MetatagGroupSeparator => "`:`",
            Self::MetatagStartOrKey => "a metatag key or `{`",
            Self::MetatagValue | Self::MetatagGroupValue => "a metatag value",
            Self::MetatagGroupKeyOrEnd => "a metatag key or `}`",
        }
    }
}

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokens: Arena<Token>,
    pos: u32,
    nodes: Arena<Node>,
    comments: Vec<Comment>,
    metatags: Vec<Metatag>,
    diagnostics: Vec<Diagnostic>,
    queued_comments: Vec<TokenId>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str, tokenized: Tokenized) -> Self {
        let Tokenized { tokens, diagnostics } = tokenized;
        Self {
            text,
            nodes: Arena::with_capacity(tokens.len() / 2),
            tokens,
            pos: 0,
            comments: Vec::new(),
            metatags: Vec::new(),
            diagnostics,
            queued_comments: Vec::new(),
        }
    }

    /// Consumes the next token. Returns `None` once the `EOF` token has been
    /// consumed, which unwinds every open state.
    pub(crate) fn next(&mut self, state: State, depth: u32) -> Option<(TokenId, TokenKind)> {
        let id = TokenId::new(self.pos);
        let kind = self.tokens.get(id)?.kind;
        self.pos += 1;

        tracing::trace!(token = id.index(), kind = kind.name(), depth, state = state.name());
        Some((id, kind))
    }

    /// Un-consumes the last token so an enclosing state can handle it.
    pub(crate) fn back_up(&mut self) {
        self.pos -= 1;
    }

    pub(crate) fn line(&self, token: TokenId) -> u32 {
        self.tokens[token].start.line
    }

    /// Whether the last token spanned by `node` ends on `line`.
    pub(crate) fn ends_on_line(&self, node: NodeId, line: u32) -> bool {
        self.tokens[self.nodes[node].last_token].end.line == line
    }

    pub(crate) fn alloc_node(&mut self, kind: NodeKind, token: TokenId) -> NodeId {
        let index = NodeId::new(self.nodes.len() as u32);
        let id = self.nodes.alloc(Node::new(index, kind, token));
        debug_assert_eq!(id, index);
        id
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let siblings = &mut self.nodes[parent].children;
        let ordinal = siblings.len() as u32;
        siblings.push(child);

        let child = &mut self.nodes[child];
        child.parent = Some(parent);
        child.ordinal = ordinal;
    }

    pub(crate) fn set_value(&mut self, node: NodeId, token: TokenId) {
        let node = &mut self.nodes[node];
        node.value_token = Some(token);
        node.contain(token);
    }

    pub(crate) fn set_last_value(&mut self, node: NodeId, token: TokenId) {
        let node = &mut self.nodes[node];
        node.last_value_token = Some(token);
        node.contain(token);
    }

    /// Widens `node`'s span to `token`. `None` is the document, which has no span.
    pub(crate) fn contain(&mut self, node: Option<NodeId>, token: TokenId) {
        if let Some(node) = node {
            self.nodes[node].contain(token);
        }
    }

    pub(crate) fn attach_comment(&mut self, owner: Option<NodeId>, token: TokenId) {
        let comment = Comment { token, owner };
        match owner {
            Some(node) => {
                let node = &mut self.nodes[node];
                node.comments.push(comment);
                node.contain(token);
            }
            None => self.comments.push(comment),
        }
    }

    pub(crate) fn queue_comment(&mut self, token: TokenId) {
        self.queued_comments.push(token);
    }

    /// Hands every queued comment to `owner`, widening its span back to the
    /// earliest of them.
    pub(crate) fn flush_comments(&mut self, owner: Option<NodeId>) {
        for token in std::mem::take(&mut self.queued_comments) {
            self.attach_comment(owner, token);
        }
    }

    pub(crate) fn add_metatag(&mut self, owner: Option<NodeId>, key: TokenId) {
        let metatag = Metatag { key, value: None };
        match owner {
            Some(node) => {
                let node = &mut self.nodes[node];
                node.metatags.push(metatag);
                node.contain(key);
            }
            None => self.metatags.push(metatag),
        }
    }

    pub(crate) fn set_metatag_value(&mut self, owner: Option<NodeId>, value: TokenId) {
        let metatags = match owner {
            Some(node) => {
                let node = &mut self.nodes[node];
                node.contain(value);
                &mut node.metatags
            }
            None => &mut self.metatags,
        };

        if let Some(metatag) = metatags.last_mut() {
            metatag.value = Some(value);
        }
    }

    pub(crate) fn start_member(&mut self, dict: NodeId, key: TokenId) -> PendingMember {
        let node = self.alloc_node(NodeKind::Pending, key);
        self.flush_comments(Some(node));
        self.nodes[node].key_token = Some(key);
        self.add_child(dict, node);
        PendingMember::new(node)
    }

    pub(crate) fn error(&mut self, code: ErrorCode, token: TokenId, message: impl Into<String>) {
        let diagnostic = Diagnostic::at_token(code, message, token, &self.tokens[token]);
        tracing::debug!(%diagnostic, "parse error");
        self.diagnostics.push(diagnostic);
    }

    /// Records `token` as invalid in `state`.
    pub(crate) fn unexpected(&mut self, token: TokenId, kind: TokenKind, state: State) {
        if kind == TokenKind::EOF {
            let message = format!("expected {}, found end of input", state.expected());
            self.error(ErrorCode::UnexpectedEof, token, message);
        } else {
            let raw = self.tokens[token].raw(self.text);
            let message = format!("expected {}, found `{raw}`", state.expected());
            self.error(ErrorCode::SyntaxError, token, message);
        }
    }

    pub(crate) fn finish(mut self) -> Parse {
        self.widen_spans();
        self.count_shared_keys();

        tracing::debug!(
            tokens = self.tokens.len(),
            nodes = self.nodes.len(),
            errors = self.diagnostics.len(),
            "parsed"
        );

        Parse {
            tokens: self.tokens,
            nodes: self.nodes,
            comments: self.comments,
            metatags: self.metatags,
            diagnostics: self.diagnostics,
        }
    }

    /// Children are always allocated after their parent, so one reverse pass
    /// carries every span up to the root.
    fn widen_spans(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let node = &self.nodes[NodeId::new(index as u32)];
            let Some(parent) = node.parent else { continue };
            let (first, last) = (node.first_token, node.last_token);

            let parent = &mut self.nodes[parent];
            parent.contain(first);
            parent.contain(last);
        }
    }

    fn count_shared_keys(&mut self) {
        let (text, tokens, nodes) = (self.text, &self.tokens, &mut self.nodes);
        let mut seen = FxHashMap::<(NodeId, &str), u32>::default();

        for node in nodes.iter_mut() {
            let (Some(parent), Some(key)) = (node.parent, node.key_token) else { continue };
            let count = seen.entry((parent, tokens[key].value(text))).or_default();
            node.shared_key_index = *count;
            *count += 1;
        }
    }
}

/// A dict member whose key has been read. Must end up resolved to a value
/// kind or explicitly abandoned as pending.
pub(crate) struct PendingMember {
    node: NodeId,
    bomb: DropBomb,
}

impl PendingMember {
    fn new(node: NodeId) -> Self {
        Self { node, bomb: DropBomb::new("PendingMember must be either resolved or abandoned") }
    }

    pub(crate) fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn resolve(mut self, p: &mut Parser<'_>, kind: NodeKind, token: TokenId) {
        self.bomb.defuse();
        p.nodes[self.node].resolve(kind);
        p.set_value(self.node, token);
    }

    /// Leaves the member pending; the input ended or broke off before its value.
    pub(crate) fn abandon(mut self) {
        self.bomb.defuse();
    }
}
