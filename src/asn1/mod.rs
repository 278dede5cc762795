//! Generic ASN.1 BER/DER tree decoding.
//!
//! [`decode`] turns a byte buffer into an [`Asn1Tree`]: an arena of
//! [`AsnNode`]s addressed by [`NodeId`], where every constructed node owns the
//! ids of its children in encoding order. Nodes borrow their value bytes from
//! the input buffer.

mod debug;
mod decoder;
mod value;

use std::fmt;

pub use debug::structure_string;
pub use decoder::{decode, decode_prefix};
pub(crate) use value::unsigned_be;

use crate::error::SchemaError;

/// Universal tag numbers used by certificates and CSRs.
pub mod tags {
    pub const BOOLEAN: u32 = 0x01;
    pub const INTEGER: u32 = 0x02;
    pub const BIT_STRING: u32 = 0x03;
    pub const OCTET_STRING: u32 = 0x04;
    pub const NULL: u32 = 0x05;
    pub const OID: u32 = 0x06;
    pub const ENUMERATED: u32 = 0x0A;
    pub const UTF8_STRING: u32 = 0x0C;
    pub const SEQUENCE: u32 = 0x10;
    pub const SET: u32 = 0x11;
    pub const NUMERIC_STRING: u32 = 0x12;
    pub const PRINTABLE_STRING: u32 = 0x13;
    pub const T61_STRING: u32 = 0x14;
    pub const IA5_STRING: u32 = 0x16;
    pub const UTC_TIME: u32 = 0x17;
    pub const GENERALIZED_TIME: u32 = 0x18;
    pub const VISIBLE_STRING: u32 = 0x1A;
    pub const UNIVERSAL_STRING: u32 = 0x1C;
    pub const BMP_STRING: u32 = 0x1E;

    /// Display name of a universal tag number.
    pub fn name(number: u32) -> Option<&'static str> {
        Some(match number {
            BOOLEAN => "BOOLEAN",
            INTEGER => "INTEGER",
            BIT_STRING => "BIT STRING",
            OCTET_STRING => "OCTET STRING",
            NULL => "NULL",
            OID => "OBJECT IDENTIFIER",
            ENUMERATED => "ENUMERATED",
            UTF8_STRING => "UTF8String",
            SEQUENCE => "SEQUENCE",
            SET => "SET",
            NUMERIC_STRING => "NumericString",
            PRINTABLE_STRING => "PrintableString",
            T61_STRING => "TeletexString",
            IA5_STRING => "IA5String",
            UTC_TIME => "UTCTime",
            GENERALIZED_TIME => "GeneralizedTime",
            VISIBLE_STRING => "VisibleString",
            UNIVERSAL_STRING => "UniversalString",
            BMP_STRING => "BMPString",
            _ => return None,
        })
    }
}

/// ASN.1 tag class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// A parsed ASN.1 tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    /// True for the given universal tag number, regardless of the constructed bit.
    pub fn is_universal(&self, number: u32) -> bool {
        self.class == TagClass::Universal && self.number == number
    }

    /// True for the given context-specific tag number.
    pub fn is_context(&self, number: u32) -> bool {
        self.class == TagClass::ContextSpecific && self.number == number
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TagClass::Universal => match tags::name(self.number) {
                Some(name) => f.write_str(name),
                None => write!(f, "[UNIVERSAL {}]", self.number),
            },
            TagClass::Application => write!(f, "[APPLICATION {}]", self.number),
            TagClass::ContextSpecific => write!(f, "[{}]", self.number),
            TagClass::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

/// Index of a node inside its [`Asn1Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One decoded TLV element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsnNode<'a> {
    pub tag: Tag,
    /// Offset of the tag octet within the decoded buffer.
    pub offset: usize,
    /// Value octets. For constructed nodes this is the encoding of the children.
    pub value: &'a [u8],
    children: Vec<NodeId>,
}

impl AsnNode<'_> {
    pub fn is_constructed(&self) -> bool {
        self.tag.constructed
    }

    /// Child ids in encoding order; empty for primitive nodes.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena holding every node decoded from one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1Tree<'a> {
    nodes: Vec<AsnNode<'a>>,
    root: NodeId,
}

impl<'a> Asn1Tree<'a> {
    pub fn root(&self) -> &AsnNode<'a> {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: NodeId) -> &AsnNode<'a> {
        &self.nodes[id.0]
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates the children of `node`.
    pub fn elements<'t>(&'t self, node: &'t AsnNode<'a>) -> Elements<'t, 'a> {
        Elements {
            tree: self,
            ids: node.children(),
            pos: 0,
        }
    }

    /// Children of a universal SEQUENCE.
    pub fn sequence<'t>(
        &'t self,
        node: &'t AsnNode<'a>,
        field: &'static str,
    ) -> Result<Elements<'t, 'a>, SchemaError> {
        node.expect_universal(field, tags::SEQUENCE)?;
        Ok(self.elements(node))
    }

    /// Children of a universal SET.
    pub fn set<'t>(
        &'t self,
        node: &'t AsnNode<'a>,
        field: &'static str,
    ) -> Result<Elements<'t, 'a>, SchemaError> {
        node.expect_universal(field, tags::SET)?;
        Ok(self.elements(node))
    }
}

/// Cursor over the children of a constructed node.
#[derive(Debug, Clone)]
pub struct Elements<'t, 'a> {
    tree: &'t Asn1Tree<'a>,
    ids: &'t [NodeId],
    pos: usize,
}

impl<'t, 'a> Elements<'t, 'a> {
    /// The next element without consuming it.
    pub fn peek(&self) -> Option<&'t AsnNode<'a>> {
        self.ids.get(self.pos).map(|id| self.tree.node(*id))
    }

    /// Consumes the next element, failing with `MissingField` when exhausted.
    pub fn required(&mut self, field: &'static str) -> Result<&'t AsnNode<'a>, SchemaError> {
        self.next().ok_or(SchemaError::MissingField(field))
    }

    /// Consumes the next element only if its tag satisfies `accept`.
    pub fn next_if(&mut self, accept: impl FnOnce(&Tag) -> bool) -> Option<&'t AsnNode<'a>> {
        match self.peek() {
            Some(node) if accept(&node.tag) => {
                self.pos += 1;
                Some(node)
            }
            _ => None,
        }
    }

    /// Fails with `UnexpectedTag` if any element is left unconsumed.
    pub fn finish(&self, field: &'static str) -> Result<(), SchemaError> {
        match self.peek() {
            Some(extra) => Err(SchemaError::UnexpectedTag {
                field,
                expected: "end of SEQUENCE",
                found: extra.tag.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl<'t, 'a> Iterator for Elements<'t, 'a> {
    type Item = &'t AsnNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.peek()?;
        self.pos += 1;
        Some(node)
    }
}
