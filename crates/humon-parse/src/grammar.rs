use humon_errors::ErrorCode;
use humon_syntax::TokenKind::{self, *};
use humon_syntax::{NodeId, NodeKind, TokenId, TokenSet};

use crate::parser::{Parser, PendingMember, State};

mod metatags;

const VALUE_FIRST: TokenSet = TokenSet::new([LEFT_BRACKET, LEFT_BRACE, WORD]);

/// Remaining stack below which a container grows a fresh segment before
/// descending, so nesting depth is bounded by memory rather than the thread's stack.
const RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

pub(crate) fn document(p: &mut Parser<'_>) {
    let mut root = None;

    while let Some((token, kind)) = p.next(State::Document, 0) {
        match kind {
            EOF => break,
            COMMENT => match root {
                Some(node) if p.ends_on_line(node, p.line(token)) => {
                    p.attach_comment(Some(node), token);
                }
                _ => p.queue_comment(token),
            },
            AT => {
                if root.is_some() {
                    p.flush_comments(root);
                    p.contain(root, token);
                }
                metatags::metatag(p, root, 1);
            }
            _ if VALUE_FIRST.contains(kind) => match root {
                Some(_) => {
                    let message = "the document already has a root value";
                    p.error(ErrorCode::TooManyRoots, token, message);
                    skip_value(p, kind);
                }
                None => root = Some(element(p, None, token, kind, 0)),
            },
            _ => p.unexpected(token, kind, State::Document),
        }
    }

    p.flush_comments(None);
}

/// Allocates the node introduced by `token` and parses the rest of it.
fn element(
    p: &mut Parser<'_>,
    parent: Option<NodeId>,
    token: TokenId,
    kind: TokenKind,
    depth: u32,
) -> NodeId {
    let node = p.alloc_node(node_kind(kind), token);
    p.set_value(node, token);
    if let Some(parent) = parent {
        p.add_child(parent, node);
    }
    p.flush_comments(Some(node));

    body(p, node, token, kind, depth);
    node
}

fn body(p: &mut Parser<'_>, node: NodeId, token: TokenId, kind: TokenKind, depth: u32) {
    match kind {
        LEFT_BRACKET => stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || list(p, node, depth + 1)),
        LEFT_BRACE => stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || dict(p, node, depth + 1)),
        _ => p.set_last_value(node, token),
    }
}

fn node_kind(kind: TokenKind) -> NodeKind {
    match kind {
        LEFT_BRACKET => NodeKind::List,
        LEFT_BRACE => NodeKind::Dict,
        _ => NodeKind::Value,
    }
}

fn list(p: &mut Parser<'_>, list: NodeId, depth: u32) {
    let mut last = None;

    while let Some((token, kind)) = p.next(State::List, depth) {
        match kind {
            COMMENT => route_comment(p, last, list, token),
            AT => container_metatag(p, last.unwrap_or(list), token, depth),
            RIGHT_BRACKET => return close(p, list, token),
            RIGHT_BRACE => {
                p.error(ErrorCode::StartEndMismatch, token, "expected `]`, found `}`");
                return close(p, list, token);
            }
            _ if VALUE_FIRST.contains(kind) => {
                last = Some(element(p, Some(list), token, kind, depth));
            }
            _ => p.unexpected(token, kind, State::List),
        }
    }
}

fn dict(p: &mut Parser<'_>, dict: NodeId, depth: u32) {
    let mut last = None;

    while let Some((token, kind)) = p.next(State::DictKeyOrEnd, depth) {
        match kind {
            COMMENT => route_comment(p, last, dict, token),
            AT => container_metatag(p, last.unwrap_or(dict), token, depth),
            WORD => {
                let pending = p.start_member(dict, token);
                last = Some(pending.node());
                member(p, pending, depth + 1);
            }
            RIGHT_BRACE => return close(p, dict, token),
            RIGHT_BRACKET => {
                p.error(ErrorCode::StartEndMismatch, token, "expected `}`, found `]`");
                return close(p, dict, token);
            }
            _ => p.unexpected(token, kind, State::DictKeyOrEnd),
        }
    }
}

/// Reads the `:` after a member's key.
fn member(p: &mut Parser<'_>, pending: PendingMember, depth: u32) {
    let node = pending.node();

    while let Some((token, kind)) = p.next(State::MemberSeparator, depth) {
        match kind {
            COMMENT => p.attach_comment(Some(node), token),
            COLON => {
                p.contain(Some(node), token);
                return member_value(p, pending, depth + 1);
            }
            AT => {
                p.contain(Some(node), token);
                metatags::metatag(p, Some(node), depth + 1);
            }
            RIGHT_BRACE | RIGHT_BRACKET => {
                p.unexpected(token, kind, State::MemberSeparator);
                p.back_up();
                break;
            }
            _ => p.unexpected(token, kind, State::MemberSeparator),
        }
    }

    pending.abandon();
}

fn member_value(p: &mut Parser<'_>, pending: PendingMember, depth: u32) {
    let node = pending.node();

    while let Some((token, kind)) = p.next(State::MemberValue, depth) {
        match kind {
            COMMENT => p.attach_comment(Some(node), token),
            AT => {
                p.contain(Some(node), token);
                metatags::metatag(p, Some(node), depth + 1);
            }
            RIGHT_BRACE | RIGHT_BRACKET => {
                p.unexpected(token, kind, State::MemberValue);
                p.back_up();
                break;
            }
            _ if VALUE_FIRST.contains(kind) => {
                pending.resolve(p, node_kind(kind), token);
                return body(p, node, token, kind, depth);
            }
            _ => p.unexpected(token, kind, State::MemberValue),
        }
    }

    pending.abandon();
}

fn close(p: &mut Parser<'_>, container: NodeId, token: TokenId) {
    p.flush_comments(Some(container));
    p.set_last_value(container, token);
}

fn container_metatag(p: &mut Parser<'_>, target: NodeId, token: TokenId, depth: u32) {
    p.contain(Some(target), token);
    p.flush_comments(Some(target));
    metatags::metatag(p, Some(target), depth + 1);
}

/// Attaches a comment inside a container: to the node just finished if the
/// comment starts on the line that node ends on, else to the container under
/// the same test, else queues it for whatever comes next.
fn route_comment(p: &mut Parser<'_>, last: Option<NodeId>, container: NodeId, token: TokenId) {
    let line = p.line(token);
    let owner = match last {
        Some(node) if p.ends_on_line(node, line) => Some(node),
        _ if p.ends_on_line(container, line) => Some(container),
        _ => None,
    };

    match owner {
        Some(owner) => p.attach_comment(Some(owner), token),
        None => p.queue_comment(token),
    }
}

/// Skips a value that cannot be attached anywhere, keeping its comments on
/// the document.
fn skip_value(p: &mut Parser<'_>, kind: TokenKind) {
    let mut open = u32::from(matches!(kind, LEFT_BRACKET | LEFT_BRACE));

    while open > 0 {
        let Some((token, kind)) = p.next(State::ExtraRoot, open) else { return };
        match kind {
            LEFT_BRACKET | LEFT_BRACE => open += 1,
            RIGHT_BRACKET | RIGHT_BRACE => open -= 1,
            COMMENT => p.attach_comment(None, token),
            EOF => p.unexpected(token, kind, State::ExtraRoot),
            _ => {}
        }
    }
}
