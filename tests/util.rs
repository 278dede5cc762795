#![allow(dead_code)]

use std::path::PathBuf;

use certview::ParsedDocument;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Reads a PEM fixture from `tests/data`.
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// Parses a PEM fixture, panicking on failure.
pub fn parse_fixture(name: &str) -> ParsedDocument {
    certview::parse(&fixture(name)).unwrap_or_else(|e| panic!("failed to parse {name}: {e}"))
}

/// Lines of `text` that start with `prefix` after leading spaces are removed.
pub fn lines_starting_with<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
    text.lines()
        .filter(|line| line.trim_start().starts_with(prefix))
        .collect()
}

/// DER encoding of a single TLV with a short or long form length.
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xFF {
        out.extend_from_slice(&[0x81, len as u8]);
    } else {
        out.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(content);
    out
}

/// `depth` SEQUENCEs nested inside one another around an empty SEQUENCE.
pub fn nested_sequences(depth: usize) -> Vec<u8> {
    (0..depth).fold(vec![0x30, 0x00], |inner, _| tlv(0x30, &inner))
}
