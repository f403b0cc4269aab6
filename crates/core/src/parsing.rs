use chrono::{DateTime, NaiveDate, NaiveDateTime};
use roxmltree::{Document, Node};
use sha2::{Digest, Sha256};

use crate::error::DocumentError;

pub fn compute_sha256_hex(xml: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(xml.as_bytes());
    let bytes = hasher.finalize();
    hex::encode(bytes)
}

pub fn parse_document(xml: &str) -> Result<Document<'_>, DocumentError> {
    Ok(Document::parse(xml)?)
}

/// First element child of `node` with the given local name.
pub fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Element children of `node` with the given local name, in document order.
pub fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// Every element below `node` (excluding `node` itself) with the given local name.
pub fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

pub fn find_element<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    path: &[&str],
) -> Option<Node<'a, 'input>> {
    if path.is_empty() {
        return Some(node);
    }
    for child in node.children() {
        if child.is_element() && child.tag_name().name() == path[0] {
            if path.len() == 1 {
                return Some(child);
            }
            if let Some(found) = find_element(child, &path[1..]) {
                return Some(found);
            }
        }
    }
    None
}

/// Trimmed, non-empty text of the element at `path` below `node`.
pub fn text_at(node: Node, path: &[&str]) -> Option<String> {
    find_element(node, path).and_then(element_text)
}

pub fn element_text(node: Node) -> Option<String> {
    node.text()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a decimal amount; non-finite values are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole number, saturating at the `i64` bounds.
///
/// An integer literal too long for `i64` still has a sign and a magnitude
/// the range checks can act on, so it clamps instead of failing.
pub fn parse_whole_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Parse an ISO 8601 timestamp or bare date.
///
/// A bare date resolves to midnight. Values carrying a UTC offset are
/// normalised to UTC and the offset is dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
