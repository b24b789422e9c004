use humon::{MetatagRef, NodeRef, TokenKind, Trove};

/// Writes every token back out, keeping line breaks between tokens but
/// collapsing all other whitespace to one space.
pub fn reemit(trove: &Trove) -> String {
    let mut out = String::new();
    let mut line = 1;

    for token in trove.tokens() {
        if token.kind() == TokenKind::EOF {
            break;
        }

        let start = token.start().line;
        if start > line {
            out.extend(std::iter::repeat_n('\n', (start - line) as usize));
        } else if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token.raw());
        line = token.end().line;
    }

    out
}

/// Everything that makes two trees the same document, ignoring positions.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    kind: &'static str,
    key: Option<String>,
    value: Option<String>,
    metatags: Vec<(String, Option<String>)>,
    comments: Vec<String>,
    children: Vec<Shape>,
}

pub fn shape(node: NodeRef<'_>) -> Shape {
    Shape {
        kind: node.kind().name(),
        key: node.key().map(str::to_owned),
        value: node.value().map(str::to_owned),
        metatags: node.metatags().map(metatag).collect(),
        comments: node.comments().map(|c| c.text().to_owned()).collect(),
        children: node.children().map(shape).collect(),
    }
}

pub type DocumentShape = (Option<Shape>, Vec<String>, Vec<(String, Option<String>)>);

pub fn document_shape(trove: &Trove) -> DocumentShape {
    (
        trove.root().map(shape),
        trove.comments().map(|c| c.text().to_owned()).collect(),
        trove.metatags().map(metatag).collect(),
    )
}

fn metatag(metatag: MetatagRef<'_>) -> (String, Option<String>) {
    (metatag.key().to_owned(), metatag.value().map(str::to_owned))
}
