//! Generic structural rendering of a decoded tree.

use std::fmt::Write;

use super::{Asn1Tree, AsnNode, TagClass, tags};
use crate::text::hex_plain;

/// Renders `node` and its descendants one element per line, two spaces per
/// nesting level. Used wherever no typed formatter applies.
///
/// ```text
/// SEQUENCE
///   OBJECT IDENTIFIER : 1.3.6.1.5.5.7.3.1
///   BOOLEAN : TRUE
///   [0]
///     IA5String : 'example.com'
/// ```
pub fn structure_string(tree: &Asn1Tree<'_>, node: &AsnNode<'_>) -> String {
    let mut out = String::new();
    write_node(tree, node, 0, &mut out);
    out
}

fn write_node(tree: &Asn1Tree<'_>, node: &AsnNode<'_>, depth: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    let _ = write!(out, "{}", node.tag);

    if node.is_constructed() {
        for child in tree.elements(node) {
            write_node(tree, child, depth + 1, out);
        }
        return;
    }

    let summary = describe_primitive(node);
    if !summary.is_empty() {
        out.push_str(" : ");
        out.push_str(&summary);
    }
}

fn describe_primitive(node: &AsnNode<'_>) -> String {
    if node.tag.class != TagClass::Universal {
        return hex_plain(node.value);
    }
    match node.tag.number {
        tags::BOOLEAN => match node.value {
            [0] => "FALSE".to_string(),
            [_] => "TRUE".to_string(),
            other => hex_plain(other),
        },
        tags::INTEGER | tags::ENUMERATED => match super::unsigned_be(node.value) {
            Some(v) if !node.value.is_empty() => v.to_string(),
            _ => hex_plain(node.value),
        },
        tags::NULL => String::new(),
        tags::OID => node
            .as_oid("value")
            .map(|oid| oid.to_string())
            .unwrap_or_else(|_| hex_plain(node.value)),
        tags::UTC_TIME | tags::GENERALIZED_TIME => String::from_utf8_lossy(node.value).into_owned(),
        _ if node.is_string() => match node.as_string("value") {
            Ok(s) => format!("'{s}'"),
            Err(_) => hex_plain(node.value),
        },
        _ => hex_plain(node.value),
    }
}
