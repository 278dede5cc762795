//! ASN.1 TLV decoder.

use tracing::trace;

use super::{Asn1Tree, AsnNode, NodeId, Tag, TagClass};
use crate::config::DecodeLimits;
use crate::error::DecodeError;

/// Decodes `input` as exactly one TLV element.
///
/// Fails with [`DecodeError::TrailingData`] if bytes remain after it.
pub fn decode<'a>(input: &'a [u8], limits: &DecodeLimits) -> Result<Asn1Tree<'a>, DecodeError> {
    let (tree, consumed) = decode_prefix(input, limits)?;
    if consumed != input.len() {
        return Err(DecodeError::TrailingData {
            consumed,
            total: input.len(),
        });
    }
    Ok(tree)
}

/// Decodes the first TLV element of `input` and returns it with the number
/// of bytes it occupies.
pub fn decode_prefix<'a>(
    input: &'a [u8],
    limits: &DecodeLimits,
) -> Result<(Asn1Tree<'a>, usize), DecodeError> {
    let mut decoder = Decoder {
        data: input,
        limits: *limits,
        nodes: Vec::new(),
    };
    let (root, end) = decoder.read_node(0, input.len(), 0)?;
    trace!(nodes = decoder.nodes.len(), bytes = end, "decoded ASN.1 tree");
    Ok((
        Asn1Tree {
            nodes: decoder.nodes,
            root,
        },
        end,
    ))
}

struct Decoder<'a> {
    data: &'a [u8],
    limits: DecodeLimits,
    nodes: Vec<AsnNode<'a>>,
}

impl<'a> Decoder<'a> {
    /// Reads one element starting at `pos` that must end no later than `limit`.
    /// Returns the new node and the offset just past it.
    fn read_node(
        &mut self,
        pos: usize,
        limit: usize,
        depth: usize,
    ) -> Result<(NodeId, usize), DecodeError> {
        if depth > self.limits.max_depth {
            return Err(DecodeError::DepthExceeded {
                max: self.limits.max_depth,
            });
        }
        if self.nodes.len() >= self.limits.max_nodes {
            return Err(DecodeError::TooManyNodes {
                max: self.limits.max_nodes,
            });
        }

        let (tag, tag_len) = read_tag(&self.data[pos..limit], pos)?;
        let len_pos = pos + tag_len;
        let (length, len_len) = read_length(&self.data[len_pos..limit], len_pos)?;

        let start = len_pos + len_len;
        let available = limit - start;
        if length > available {
            return Err(DecodeError::Truncated {
                offset: pos,
                needed: length,
                available,
            });
        }
        let end = start + length;

        let id = NodeId(self.nodes.len());
        self.nodes.push(AsnNode {
            tag,
            offset: pos,
            value: &self.data[start..end],
            children: Vec::new(),
        });

        if tag.constructed {
            let mut children = Vec::new();
            let mut cursor = start;
            while cursor < end {
                let (child, child_end) = self.read_node(cursor, end, depth + 1)?;
                children.push(child);
                cursor = child_end;
            }
            self.nodes[id.0].children = children;
        }

        Ok((id, end))
    }
}

/// Parses a tag from the front of `input`. Returns the tag and octets consumed.
fn read_tag(input: &[u8], offset: usize) -> Result<(Tag, usize), DecodeError> {
    let Some(&first) = input.first() else {
        return Err(DecodeError::Truncated {
            offset,
            needed: 1,
            available: 0,
        });
    };

    let class = match first >> 6 {
        0 => TagClass::Universal,
        1 => TagClass::Application,
        2 => TagClass::ContextSpecific,
        _ => TagClass::Private,
    };
    let constructed = first & 0x20 != 0;

    let low_bits = first & 0x1F;
    if low_bits < 0x1F {
        return Ok((
            Tag {
                class,
                constructed,
                number: u32::from(low_bits),
            },
            1,
        ));
    }

    // Long form: base-128, high bit set on every octet but the last.
    let mut number: u32 = 0;
    let mut i = 1;
    loop {
        let Some(&byte) = input.get(i) else {
            return Err(DecodeError::InvalidTag { offset });
        };
        if number > u32::MAX >> 7 {
            return Err(DecodeError::InvalidTag { offset });
        }
        number = (number << 7) | u32::from(byte & 0x7F);
        i += 1;
        if byte & 0x80 == 0 {
            break;
        }
    }
    Ok((
        Tag {
            class,
            constructed,
            number,
        },
        i,
    ))
}

/// Parses a definite length from the front of `input`. Returns the length and
/// octets consumed.
fn read_length(input: &[u8], offset: usize) -> Result<(usize, usize), DecodeError> {
    let Some(&first) = input.first() else {
        return Err(DecodeError::Truncated {
            offset,
            needed: 1,
            available: 0,
        });
    };

    if first < 0x80 {
        return Ok((usize::from(first), 1));
    }
    if first == 0x80 {
        return Err(DecodeError::InvalidLength {
            offset,
            reason: "indefinite length is not supported",
        });
    }
    if first == 0xFF {
        return Err(DecodeError::InvalidLength {
            offset,
            reason: "reserved length octet",
        });
    }

    let count = usize::from(first & 0x7F);
    if count > std::mem::size_of::<usize>().min(4) {
        return Err(DecodeError::InvalidLength {
            offset,
            reason: "length does not fit in four octets",
        });
    }
    let Some(octets) = input.get(1..1 + count) else {
        return Err(DecodeError::Truncated {
            offset,
            needed: count,
            available: input.len() - 1,
        });
    };
    let length = octets
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    Ok((length, 1 + count))
}
