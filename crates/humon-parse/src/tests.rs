use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use humon_errors::ErrorCode;
use humon_syntax::{Comment, Metatag, NodeId, NodeKind, TokenId};

use crate::{Parse, parse};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "hu" {
                    let expected = path.with_extension("tree");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

fn dump(parse: &Parse, text: &str) -> String {
    let mut tree = String::new();
    if let Some(root) = parse.root() {
        dump_node(parse, text, root, 0, &mut tree);
    }
    if !parse.metatags.is_empty() || !parse.comments.is_empty() {
        tree.push_str("document\n");
        dump_annotations(parse, text, &parse.metatags, &parse.comments, 1, &mut tree);
    }

    let diagnostics =
        parse.diagnostics.iter().map(|d| format!("  {d}\n")).collect::<Vec<_>>().concat();
    format!("{tree}Errors:\n{diagnostics}")
}

fn dump_node(parse: &Parse, text: &str, id: NodeId, depth: usize, out: &mut String) {
    let node = &parse.nodes[id];
    let indent = "  ".repeat(depth);

    write!(
        out,
        "{indent}#{} {}[{}..{}]",
        id.index(),
        node.kind.name(),
        node.first_token.index(),
        node.last_token.index()
    )
    .unwrap();
    if let Some(key) = node.key_token {
        write!(out, " key {:?}", parse.tokens[key].value(text)).unwrap();
    }
    if node.shared_key_index > 0 {
        write!(out, " shared {}", node.shared_key_index).unwrap();
    }
    if let (NodeKind::Value, Some(value)) = (node.kind, node.value_token) {
        write!(out, " value {:?}", parse.tokens[value].value(text)).unwrap();
    }
    out.push('\n');

    dump_annotations(parse, text, &node.metatags, &node.comments, depth + 1, out);
    for &child in &node.children {
        dump_node(parse, text, child, depth + 1, out);
    }
}

fn dump_annotations(
    parse: &Parse,
    text: &str,
    metatags: &[Metatag],
    comments: &[Comment],
    depth: usize,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    for metatag in metatags {
        write!(out, "{indent}@{:?}", parse.tokens[metatag.key].value(text)).unwrap();
        if let Some(value) = metatag.value {
            write!(out, ": {:?}", parse.tokens[value].value(text)).unwrap();
        }
        out.push('\n');
    }
    for comment in comments {
        writeln!(out, "{indent}comment {:?}", parse.tokens[comment.token].raw(text)).unwrap();
    }
}

#[test]
fn parse_test_data() {
    for case in TestCase::list() {
        let parse = parse(&case.text, 4);
        let actual = dump(&parse, &case.text);
        expect_file![&case.expected].assert_eq(&actual);
    }
}

fn comment_owner(parse: &Parse, text: &str, comment: &str) -> Option<Option<NodeId>> {
    let owned = parse.nodes.iter().flat_map(|node| &node.comments);
    owned
        .chain(&parse.comments)
        .find(|c| parse.tokens[c.token].raw(text) == comment)
        .map(|c| c.owner)
}

#[test]
fn same_line_comment_prefers_finished_node() {
    let text = "[a // x\n]";
    let parse = parse(text, 4);

    assert_eq!(comment_owner(&parse, text, "// x"), Some(Some(NodeId::new(1))));
}

#[test]
fn same_line_comment_falls_back_to_container() {
    let text = "[ // x\n    a\n]";
    let parse = parse(text, 4);

    assert_eq!(comment_owner(&parse, text, "// x"), Some(Some(NodeId::new(0))));
}

#[test]
fn same_line_comment_after_closed_container_goes_to_it() {
    let text = "{\n    a: [x] // closed\n    b: y\n}";
    let parse = parse(text, 4);

    // `a` is the list that just closed on the comment's line.
    assert_eq!(comment_owner(&parse, text, "// closed"), Some(Some(NodeId::new(1))));
}

#[test]
fn queued_comments_go_to_next_node() {
    let text = "[\n    // before b\n    /* also */ b\n]";
    let parse = parse(text, 4);
    let b = &parse.nodes[NodeId::new(1)];

    assert_eq!(b.comments.len(), 2);
    assert_eq!(b.first_token, TokenId::new(1));
    assert_eq!(b.last_token, TokenId::new(3));
}

#[test]
fn queued_comments_before_close_go_to_container() {
    let text = "[\n    a\n    // trailing\n]";
    let parse = parse(text, 4);

    assert_eq!(comment_owner(&parse, text, "// trailing"), Some(Some(NodeId::new(0))));
}

#[test]
fn unterminated_dict_has_one_error() {
    let parse = parse("{", 4);

    assert_eq!(parse.nodes.len(), 1);
    assert_eq!(parse.nodes[NodeId::new(0)].kind, NodeKind::Dict);
    assert!(parse.nodes[NodeId::new(0)].children.is_empty());
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code(), ErrorCode::UnexpectedEof);
}

#[test]
fn missing_value_leaves_member_pending() {
    let parse = parse("{a: } b", 4);
    let codes: Vec<_> = parse.diagnostics.iter().map(|d| d.code()).collect();

    assert_eq!(parse.nodes[NodeId::new(1)].kind, NodeKind::Pending);
    assert_eq!(parse.nodes[NodeId::new(0)].last_value_token, Some(TokenId::new(3)));
    assert_eq!(codes, vec![ErrorCode::SyntaxError, ErrorCode::TooManyRoots]);
}

#[test]
fn missing_separator_closes_dict() {
    let parse = parse("{a}", 4);

    assert_eq!(parse.nodes.len(), 2);
    assert_eq!(parse.nodes[NodeId::new(1)].kind, NodeKind::Pending);
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code(), ErrorCode::SyntaxError);
    assert_eq!(parse.diagnostics[0].message(), "expected `:`, found `}`");
}

#[test]
fn cut_off_containers_still_span_children() {
    let parse = parse("[a [b c", 4);
    let root = &parse.nodes[NodeId::new(0)];
    let inner = &parse.nodes[NodeId::new(2)];

    assert_eq!((root.first_token, root.last_token), (TokenId::new(0), TokenId::new(4)));
    assert_eq!((inner.first_token, inner.last_token), (TokenId::new(2), TokenId::new(4)));
    assert_eq!(parse.diagnostics.len(), 1);
}

#[test]
fn node_tokens_are_ordered() {
    let text = "// c\n{ k: @m:v [x y] k: { z: 1 } @doc:tag }\n";
    let parse = parse(text, 4);

    for node in parse.nodes.iter() {
        let inner = [node.key_token, node.value_token, node.last_value_token];
        let mut previous = node.first_token;
        for token in inner.into_iter().flatten() {
            assert!(previous <= token, "{node:?}");
            previous = token;
        }
        assert!(previous <= node.last_token, "{node:?}");
    }
}

#[test]
fn empty_document_has_no_root() {
    let parse = parse("  // only a comment\n", 4);

    assert_eq!(parse.root(), None);
    assert_eq!(parse.comments.len(), 1);
    assert_eq!(parse.comments[0].owner, None);
    assert!(parse.diagnostics.is_empty());
}

#[test]
fn tokenizer_errors_come_first() {
    let parse = parse("[a 'b ]", 4);
    let codes: Vec<_> = parse.diagnostics.iter().map(|d| d.code()).collect();

    assert_eq!(codes, vec![ErrorCode::UnfinishedQuote, ErrorCode::UnexpectedEof]);
}

#[test]
fn deep_nesting_grows_the_stack() {
    let depth = 100_000;
    let text = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
    let parse = parse(&text, 4);

    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.nodes.len(), depth + 1);
    assert_eq!(parse.nodes[NodeId::new(0)].last_token, TokenId::new(2 * depth as u32));
}

#[test]
fn metatag_without_separator_gives_back_the_next_value() {
    let parse = parse("[a @t b c] ", 4);
    let codes: Vec<_> = parse.diagnostics.iter().map(|d| d.code()).collect();
    let a = &parse.nodes[NodeId::new(1)];

    assert_eq!(parse.nodes[NodeId::new(0)].children.len(), 3);
    assert_eq!(a.metatags.len(), 1);
    assert_eq!(a.metatags[0].value, None);
    assert_eq!(codes, vec![ErrorCode::SyntaxError]);
    assert_eq!(parse.diagnostics[0].message(), "expected `:`, found `b`");
}

#[test]
fn metatag_group_missing_value_ends_at_brace() {
    let parse = parse("[x @{k: } y]", 4);
    let x = &parse.nodes[NodeId::new(1)];

    assert_eq!(parse.nodes[NodeId::new(0)].children.len(), 2);
    assert_eq!(x.metatags.len(), 1);
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].message(), "expected a metatag value, found `}`");
}

#[test]
fn metatag_before_closing_bracket_leaves_it_to_the_list() {
    let parse = parse("{a: [x @k:] b: y}", 4);
    let codes: Vec<_> = parse.diagnostics.iter().map(|d| d.code()).collect();
    let root = &parse.nodes[NodeId::new(0)];

    assert_eq!(root.children.len(), 2);
    assert_eq!(parse.nodes[root.children[1]].kind, NodeKind::Value);
    assert_eq!(codes, vec![ErrorCode::SyntaxError]);
}
