use const_oid::ObjectIdentifier;
use tracing::warn;

use crate::asn1::{Asn1Tree, AsnNode};
use crate::error::SchemaError;
use crate::oid;
use crate::text::hex_plain;

/// One attribute of a distinguished name.
///
/// # Fields
/// * `oid` - The attribute type.
/// * `label` - Registry label for `oid`, or the dotted OID when unregistered.
/// * `value` - The attribute value as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameAttribute {
    pub oid: ObjectIdentifier,
    pub label: String,
    pub value: String,
}

/// A subject or issuer name.
///
/// Attributes keep their encoding order across all RDNs; duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName(pub Vec<NameAttribute>);

impl DistinguishedName {
    pub fn iter(&self) -> impl Iterator<Item = &NameAttribute> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values of every attribute with the given type, in order.
    pub fn values_of<'s>(&'s self, oid: &'s ObjectIdentifier) -> impl Iterator<Item = &'s str> {
        self.0
            .iter()
            .filter(move |attr| attr.oid == *oid)
            .map(|attr| attr.value.as_str())
    }

    /// `Label=value` pairs joined with `, `.
    pub fn to_one_line(&self) -> String {
        self.0
            .iter()
            .map(|attr| format!("{}={}", attr.label, attr.value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Decodes `Name ::= SEQUENCE OF RelativeDistinguishedName`.
    pub(crate) fn decode<'a>(
        tree: &Asn1Tree<'a>,
        node: &AsnNode<'a>,
        field: &'static str,
    ) -> Result<Self, SchemaError> {
        let mut attributes = Vec::new();
        for rdn in tree.sequence(node, field)? {
            for atv in tree.set(rdn, "RelativeDistinguishedName")? {
                let mut pair = tree.sequence(atv, "AttributeTypeAndValue")?;
                let oid = pair.required("AttributeType")?.as_oid("AttributeType")?;
                let value_node = pair.required("AttributeValue")?;
                let value = if value_node.is_string() {
                    value_node
                        .as_string("AttributeValue")
                        .unwrap_or_else(|err| {
                            warn!(%oid, error = %err, "name value is not valid text");
                            String::from_utf8_lossy(value_node.value).into_owned()
                        })
                } else {
                    format!("#{}", hex_plain(value_node.value))
                };
                attributes.push(NameAttribute {
                    label: oid::label_or_dotted(oid::dn_label(&oid), &oid),
                    oid,
                    value,
                });
            }
        }
        Ok(Self(attributes))
    }
}
