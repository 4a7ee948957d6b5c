//! Arrowhead marker ids.
//!
//! Every drawn edge gets its own `<marker>` definition so that two edges never share (and never
//! overwrite) each other's arrowhead, even when they have the same color. Ids are derived from
//! the edge endpoints and must stay unique across the whole diagram.

use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use tether_core::Edge;

/// Writes `id` using only `[A-Za-z0-9_]`, so that `-` can serve as an unambiguous separator.
///
/// `_` is doubled and every other character becomes `_xx` (lowercase hex of its UTF-8 bytes).
/// The mapping is injective.
fn push_encoded(out: &mut String, id: &str) {
    for ch in id.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch == '_' {
            out.push_str("__");
        } else {
            let mut buf = [0u8; 4];
            for b in ch.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "_{b:02x}");
            }
        }
    }
}

/// Marker id for the `occurrence`-th edge (0-based) between `from` and `to`.
///
/// The first occurrence is `<prefix>-<from>-<to>`; repeats append `-<occurrence>`.
pub fn marker_id(prefix: &str, from: &str, to: &str, occurrence: usize) -> String {
    let mut out = String::with_capacity(prefix.len() + from.len() + to.len() + 4);
    out.push_str(prefix);
    out.push('-');
    push_encoded(&mut out, from);
    out.push('-');
    push_encoded(&mut out, to);
    if occurrence > 0 {
        let _ = write!(&mut out, "-{occurrence}");
    }
    out
}

/// Marker ids for `edges`, index-aligned with the slice.
pub fn marker_ids(prefix: &str, edges: &[Edge]) -> Vec<String> {
    let mut seen: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    edges
        .iter()
        .map(|e| {
            let n = seen.entry((e.from.as_str(), e.to.as_str())).or_insert(0);
            let id = marker_id(prefix, &e.from, &e.to, *n);
            *n += 1;
            id
        })
        .collect()
}

/// Prefix used for marker ids. An overlay with its own root id scopes markers under it.
pub fn marker_prefix(svg_id: Option<&str>, prefix: &str) -> String {
    match svg_id {
        Some(id) if !id.is_empty() => {
            let mut out = String::with_capacity(id.len() + prefix.len() + 1);
            push_encoded(&mut out, id);
            out.push('-');
            out.push_str(prefix);
            out
        }
        _ => prefix.to_string(),
    }
}
