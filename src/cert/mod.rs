//! Typed views of certificates and certification requests.
//!
//! [`bind`] maps a decoded [`Asn1Tree`] onto the X.509 `Certificate` or the
//! PKCS#10 `CertificationRequest` schema.

pub mod extensions;
pub mod name;
pub mod public_key;

use const_oid::ObjectIdentifier;
use time::OffsetDateTime;
use tracing::debug;

use crate::asn1::{Asn1Tree, AsnNode, structure_string};
use crate::config::DecodeLimits;
use crate::error::SchemaError;
use crate::oid;

pub use extensions::{Extension, ExtensionValue};
pub use name::{DistinguishedName, NameAttribute};
pub use public_key::{AlgorithmIdentifier, PublicKey, RsaPublicKey, SubjectPublicKeyInfo};

/// Which schema a DER buffer is bound against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Certificate,
    CertificationRequest,
}

impl DocumentKind {
    /// The PEM label for this kind of document.
    pub fn pem_label(&self) -> &'static str {
        match self {
            Self::Certificate => "CERTIFICATE",
            Self::CertificationRequest => "CERTIFICATE REQUEST",
        }
    }
}

/// Certificate validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    fn decode<'a>(tree: &Asn1Tree<'a>, node: &AsnNode<'a>) -> Result<Self, SchemaError> {
        let mut seq = tree.sequence(node, "validity")?;
        let not_before = seq.required("notBefore")?.as_time("notBefore")?;
        let not_after = seq.required("notAfter")?.as_time("notAfter")?;
        seq.finish("validity")?;
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// A decoded X.509 certificate.
///
/// # Fields
/// * `version` - The encoded version value; `2` for a v3 certificate, `0` when absent.
/// * `serial_number` - INTEGER content octets, sign octet included.
/// * `signature_algorithm` - The outer signature algorithm.
/// * `extensions` - Extensions in encoding order; empty when the `[3]` field is absent.
/// * `signature_value` - Signature BIT STRING content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub version: u64,
    pub serial_number: Vec<u8>,
    pub signature_algorithm: AlgorithmIdentifier,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub public_key_info: SubjectPublicKeyInfo,
    pub extensions: Vec<Extension>,
    pub signature_value: Vec<u8>,
}

impl Certificate {
    fn decode(tree: &Asn1Tree<'_>, limits: &DecodeLimits) -> Result<Self, SchemaError> {
        let mut outer = tree.sequence(tree.root(), "Certificate")?;
        let tbs = outer.required("tbsCertificate")?;
        let signature_algorithm = AlgorithmIdentifier::decode(
            tree,
            outer.required("signatureAlgorithm")?,
            "signatureAlgorithm",
        )?;
        let (_, signature_value) = outer
            .required("signatureValue")?
            .as_bit_string("signatureValue")?;
        outer.finish("Certificate")?;

        let mut fields = tree.sequence(tbs, "tbsCertificate")?;
        let version = match fields.next_if(|t| t.is_context(0)) {
            Some(explicit) => tree
                .elements(explicit)
                .next()
                .ok_or(SchemaError::MissingField("version"))?
                .as_u64("version")?,
            None => 0,
        };
        let serial_number = fields
            .required("serialNumber")?
            .as_integer_bytes("serialNumber")?;
        AlgorithmIdentifier::decode(tree, fields.required("signature")?, "signature")?;
        let issuer = DistinguishedName::decode(tree, fields.required("issuer")?, "issuer")?;
        let validity = Validity::decode(tree, fields.required("validity")?)?;
        let subject = DistinguishedName::decode(tree, fields.required("subject")?, "subject")?;
        let public_key_info =
            SubjectPublicKeyInfo::decode(tree, fields.required("subjectPublicKeyInfo")?, limits)?;

        // issuerUniqueID and subjectUniqueID are not displayed
        fields.next_if(|t| t.is_context(1));
        fields.next_if(|t| t.is_context(2));

        let extensions = match fields.next_if(|t| t.is_context(3)) {
            Some(explicit) => {
                let list = tree
                    .elements(explicit)
                    .next()
                    .ok_or(SchemaError::MissingField("extensions"))?;
                Extension::decode_all(tree, list, limits)?
            }
            None => Vec::new(),
        };
        fields.finish("tbsCertificate")?;

        Ok(Self {
            version,
            serial_number: serial_number.to_vec(),
            signature_algorithm,
            issuer,
            validity,
            subject,
            public_key_info,
            extensions,
            signature_value: signature_value.to_vec(),
        })
    }
}

/// A CSR attribute other than `extensionRequest`.
///
/// # Fields
/// * `oid` - The attribute type.
/// * `name` - Registry name for `oid`, or the dotted OID.
/// * `values` - Each value as text; non-string values are rendered structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub oid: ObjectIdentifier,
    pub name: String,
    pub values: Vec<String>,
}

/// A decoded PKCS#10 certification request.
///
/// # Fields
/// * `version` - The encoded version value, normally `0`.
/// * `attributes` - Attributes other than `extensionRequest`, in encoding order.
/// * `requested_extensions` - Extensions carried in the `extensionRequest` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequest {
    pub version: u64,
    pub subject: DistinguishedName,
    pub public_key_info: SubjectPublicKeyInfo,
    pub attributes: Vec<Attribute>,
    pub requested_extensions: Vec<Extension>,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: Vec<u8>,
}

impl CertificationRequest {
    fn decode(tree: &Asn1Tree<'_>, limits: &DecodeLimits) -> Result<Self, SchemaError> {
        let mut outer = tree.sequence(tree.root(), "CertificationRequest")?;
        let info = outer.required("certificationRequestInfo")?;
        let signature_algorithm = AlgorithmIdentifier::decode(
            tree,
            outer.required("signatureAlgorithm")?,
            "signatureAlgorithm",
        )?;
        let (_, signature_value) = outer.required("signature")?.as_bit_string("signature")?;
        outer.finish("CertificationRequest")?;

        let mut fields = tree.sequence(info, "certificationRequestInfo")?;
        let version = fields.required("version")?.as_u64("version")?;
        let subject = DistinguishedName::decode(tree, fields.required("subject")?, "subject")?;
        let public_key_info =
            SubjectPublicKeyInfo::decode(tree, fields.required("subjectPKInfo")?, limits)?;

        let mut attributes = Vec::new();
        let mut requested_extensions = Vec::new();
        // attributes [0] IMPLICIT SET OF Attribute; tolerated when missing
        if let Some(set) = fields.next_if(|t| t.is_context(0)) {
            for attr in tree.elements(set) {
                let mut seq = tree.sequence(attr, "Attribute")?;
                let attr_type = seq.required("type")?.as_oid("type")?;
                let values = tree.set(seq.required("values")?, "values")?;
                seq.finish("Attribute")?;
                if attr_type == oid::EXTENSION_REQUEST {
                    for list in values {
                        requested_extensions.extend(Extension::decode_all(tree, list, limits)?);
                    }
                } else {
                    attributes.push(Attribute {
                        name: oid::label_or_dotted(oid::attribute_name(&attr_type), &attr_type),
                        oid: attr_type,
                        values: values.map(|v| attribute_text(tree, v)).collect(),
                    });
                }
            }
        }
        fields.finish("certificationRequestInfo")?;

        Ok(Self {
            version,
            subject,
            public_key_info,
            attributes,
            requested_extensions,
            signature_algorithm,
            signature_value: signature_value.to_vec(),
        })
    }
}

fn attribute_text(tree: &Asn1Tree<'_>, node: &AsnNode<'_>) -> String {
    if node.is_string() {
        if let Ok(text) = node.as_string("AttributeValue") {
            return text;
        }
    }
    structure_string(tree, node)
}

/// A decoded certificate or certification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Certificate(Certificate),
    CertificationRequest(CertificationRequest),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Certificate(_) => DocumentKind::Certificate,
            Self::CertificationRequest(_) => DocumentKind::CertificationRequest,
        }
    }

    pub fn subject(&self) -> &DistinguishedName {
        match self {
            Self::Certificate(cert) => &cert.subject,
            Self::CertificationRequest(csr) => &csr.subject,
        }
    }

    pub fn public_key_info(&self) -> &SubjectPublicKeyInfo {
        match self {
            Self::Certificate(cert) => &cert.public_key_info,
            Self::CertificationRequest(csr) => &csr.public_key_info,
        }
    }

    /// Certificate extensions, or the extensions requested by a CSR.
    pub fn extensions(&self) -> &[Extension] {
        match self {
            Self::Certificate(cert) => &cert.extensions,
            Self::CertificationRequest(csr) => &csr.requested_extensions,
        }
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        match self {
            Self::Certificate(cert) => &cert.signature_algorithm,
            Self::CertificationRequest(csr) => &csr.signature_algorithm,
        }
    }

    pub fn signature_value(&self) -> &[u8] {
        match self {
            Self::Certificate(cert) => &cert.signature_value,
            Self::CertificationRequest(csr) => &csr.signature_value,
        }
    }
}

/// Binds a decoded tree to the schema selected by `kind`.
///
/// Extension values never fail the bind; a malformed schema element does.
pub fn bind(
    tree: &Asn1Tree<'_>,
    kind: DocumentKind,
    limits: &DecodeLimits,
) -> Result<Document, SchemaError> {
    let document = match kind {
        DocumentKind::Certificate => Document::Certificate(Certificate::decode(tree, limits)?),
        DocumentKind::CertificationRequest => {
            Document::CertificationRequest(CertificationRequest::decode(tree, limits)?)
        }
    };
    debug!(
        ?kind,
        extensions = document.extensions().len(),
        "bound document"
    );
    Ok(document)
}
