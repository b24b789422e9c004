//! `@key:value` and `@{key:value ...}` annotations. `target` is the node the
//! metatags attach to, or `None` for the document.

use humon_syntax::TokenKind::{self, *};
use humon_syntax::{NodeId, TokenId};

use crate::parser::{Parser, State};

/// Parses what follows an `@`.
pub(super) fn metatag(p: &mut Parser<'_>, target: Option<NodeId>, depth: u32) {
    while let Some((token, kind)) = p.next(State::MetatagStartOrKey, depth) {
        match kind {
            COMMENT => p.attach_comment(target, token),
            LEFT_BRACE => {
                p.contain(target, token);
                return group(p, target, depth + 1);
            }
            WORD => {
                p.add_metatag(target, token);
                return separator(p, target, depth + 1, false);
            }
            _ => return give_back(p, token, kind, State::MetatagStartOrKey),
        }
    }
}

fn group(p: &mut Parser<'_>, target: Option<NodeId>, depth: u32) {
    while let Some((token, kind)) = p.next(State::MetatagGroupKeyOrEnd, depth) {
        match kind {
            COMMENT => p.attach_comment(target, token),
            WORD => {
                p.add_metatag(target, token);
                separator(p, target, depth + 1, true);
            }
            RIGHT_BRACE => return p.contain(target, token),
            RIGHT_BRACKET | EOF => return give_back(p, token, kind, State::MetatagGroupKeyOrEnd),
            _ => p.unexpected(token, kind, State::MetatagGroupKeyOrEnd),
        }
    }
}

fn separator(p: &mut Parser<'_>, target: Option<NodeId>, depth: u32, grouped: bool) {
    let state = if grouped { State::MetatagGroupSeparator } else { State::MetatagSeparator };

    while let Some((token, kind)) = p.next(state, depth) {
        match kind {
            COMMENT => p.attach_comment(target, token),
            COLON => {
                p.contain(target, token);
                return value(p, target, depth + 1, grouped);
            }
            _ => return give_back(p, token, kind, state),
        }
    }
}

fn value(p: &mut Parser<'_>, target: Option<NodeId>, depth: u32, grouped: bool) {
    let state = if grouped { State::MetatagGroupValue } else { State::MetatagValue };

    while let Some((token, kind)) = p.next(state, depth) {
        match kind {
            COMMENT => p.attach_comment(target, token),
            WORD => return p.set_metatag_value(target, token),
            _ => return give_back(p, token, kind, state),
        }
    }
}

/// Reports `token` and leaves it to the enclosing state. The metatag keeps
/// whatever was read so far.
fn give_back(p: &mut Parser<'_>, token: TokenId, kind: TokenKind, state: State) {
    p.unexpected(token, kind, state);
    if kind != EOF {
        p.back_up();
    }
}
