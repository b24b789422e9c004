//! `/`-delimited node paths.
//!
//! A segment is a child ordinal (`0`, `12`), a dict key, or `..` for the
//! parent. Keys that would read as anything else are quoted with `'`, `"` or
//! a backtick, whichever the key does not contain, or with a `^tag^` marker
//! when it contains all three.

use std::borrow::Cow;

use humon_syntax::Arena;
use humon_tokenizer::{is_whitespace, tag_marker};

use crate::{Error, NodeRef, Result, Trove};

const QUOTES: [char; 3] = ['\'', '"', '`'];

pub(crate) fn render(node: NodeRef<'_>) -> String {
    if node.is_root() {
        return "/".to_owned();
    }

    let mut measure = Arena::<u8>::counting();
    write_segments(node, &mut |part| measure.extend_from_slice(part.as_bytes()));

    let mut address = String::with_capacity(measure.len());
    write_segments(node, &mut |part| address.push_str(part));
    debug_assert_eq!(address.len(), measure.len());
    address
}

fn write_segments(node: NodeRef<'_>, out: &mut impl FnMut(&str)) {
    let mut path: Vec<_> = std::iter::successors(Some(node), NodeRef::parent).collect();
    path.pop();

    for node in path.into_iter().rev() {
        out("/");
        match node.key() {
            // Later siblings sharing a key are only reachable by ordinal.
            Some(key) if node.shared_key_index() == 0 => out(quote_key(key).as_ref()),
            _ => out(node.ordinal().to_string().as_str()),
        }
    }
}

/// Quotes `key` only as much as needed for it to read back as a key segment.
pub(crate) fn quote_key(key: &str) -> Cow<'_, str> {
    if is_bare(key) {
        return Cow::Borrowed(key);
    }

    if let Some(quote) = QUOTES.into_iter().find(|&q| !key.contains(q)) {
        let mut quoted = String::with_capacity(key.len() + 2);
        quoted.push(quote);
        for c in key.chars() {
            if c == '\\' {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push(quote);
        return Cow::Owned(quoted);
    }

    let mut marker = String::from("^^");
    while format!("{key}{marker}").find(&marker) != Some(key.len()) {
        marker.insert(1, '~');
    }
    Cow::Owned(format!("{marker}{key}{marker}"))
}

fn is_bare(key: &str) -> bool {
    !key.is_empty()
        && key != ".."
        && !key.bytes().all(|b| b.is_ascii_digit())
        && !key.starts_with(|c| QUOTES.contains(&c) || c == '^')
        && !key.contains(|c| is_whitespace(c) || is_delimiter(c) || c == '\\')
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '/' | '{' | '}' | '[' | ']' | ':' | '@' | '#')
}

struct Segment<'a> {
    text: Cow<'a, str>,
    quoted: bool,
}

/// Resolves `address` from `base`, or from the root when it starts with `/`.
/// Without a base the address must be absolute.
pub(crate) fn resolve<'t>(
    trove: &'t Trove,
    base: Option<NodeRef<'t>>,
    address: &str,
) -> Result<NodeRef<'t>> {
    let illegal = |reason| Error::IllegalAddress { address: address.to_owned(), reason };
    let not_found = || Error::NotFound { address: address.to_owned() };

    let mut rest = trim(address);
    let mut node = match rest.strip_prefix('/') {
        Some(after) => {
            rest = after;
            trove.root().ok_or_else(not_found)?
        }
        None => base.ok_or_else(|| illegal("address must start with `/`"))?,
    };

    loop {
        rest = trim(rest);
        if rest.is_empty() {
            return Ok(node);
        }
        if rest.starts_with('/') {
            return Err(illegal("empty segment"));
        }

        let (segment, after) = read_segment(rest).map_err(illegal)?;
        node = step(node, &segment).map_err(|reason| match reason {
            Some(reason) => illegal(reason),
            None => not_found(),
        })?;

        rest = trim(after);
        if rest.is_empty() {
            return Ok(node);
        }
        rest = rest.strip_prefix('/').ok_or_else(|| illegal("unexpected text after segment"))?;
    }
}

fn trim(text: &str) -> &str {
    text.trim_start_matches(is_whitespace)
}

/// Moves from `node` along one segment. `Err(None)` means no such node.
fn step<'t>(
    node: NodeRef<'t>,
    segment: &Segment<'_>,
) -> Result<NodeRef<'t>, Option<&'static str>> {
    let text = segment.text.as_ref();
    if segment.quoted {
        return node.child_by_key(text).ok_or(None);
    }

    if text == ".." {
        return node.parent().ok_or(Some("address goes above the root"));
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().and_then(|ordinal| node.child(ordinal)).ok_or(None);
    }
    node.child_by_key(text).ok_or(None)
}

fn read_segment(rest: &str) -> Result<(Segment<'_>, &str), &'static str> {
    let first = rest.chars().next().unwrap_or_default();

    if QUOTES.contains(&first) {
        let (text, after) = read_quoted(rest, first).ok_or("unfinished quote")?;
        return Ok((Segment { text, quoted: true }, after));
    }

    if let Some(marker) = tag_marker(rest) {
        let body = &rest[marker.len()..];
        let end = body.find(marker).ok_or("unfinished quote")?;
        let text = Cow::Borrowed(&body[..end]);
        return Ok((Segment { text, quoted: true }, &body[end + marker.len()..]));
    }

    let (text, after) = read_unquoted(rest);
    if text.is_empty() {
        return Err("unexpected character in address");
    }
    Ok((Segment { text, quoted: false }, after))
}

fn read_quoted(rest: &str, quote: char) -> Option<(Cow<'_, str>, &str)> {
    let body = &rest[quote.len_utf8()..];
    let mut unescaped: Option<String> = None;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let buf = unescaped.get_or_insert_with(|| body[..i].to_owned());
                buf.push(chars.next().map_or('\\', |(_, escaped)| escaped));
            }
            c if c == quote => {
                let text = unescaped.map_or(Cow::Borrowed(&body[..i]), Cow::Owned);
                return Some((text, &body[i + c.len_utf8()..]));
            }
            c => {
                if let Some(buf) = &mut unescaped {
                    buf.push(c);
                }
            }
        }
    }

    None
}

fn read_unquoted(rest: &str) -> (Cow<'_, str>, &str) {
    let mut unescaped: Option<String> = None;
    let mut chars = rest.char_indices();
    let mut end = rest.len();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let buf = unescaped.get_or_insert_with(|| rest[..i].to_owned());
                buf.push(chars.next().map_or('\\', |(_, escaped)| escaped));
            }
            c if is_whitespace(c) || is_delimiter(c) => {
                end = i;
                break;
            }
            c => {
                if let Some(buf) = &mut unescaped {
                    buf.push(c);
                }
            }
        }
    }

    let text = unescaped.map_or(Cow::Borrowed(&rest[..end]), Cow::Owned);
    (text, &rest[end..])
}
