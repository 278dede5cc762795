use std::fmt;

use const_oid::ObjectIdentifier;
use tracing::warn;

use crate::asn1::{self, Asn1Tree, AsnNode, TagClass, structure_string, tags};
use crate::config::DecodeLimits;
use crate::error::{ExtensionFormatError, SchemaError};
use crate::oid;
use crate::text::{hex_colon, hex_plain};

use super::name::DistinguishedName;

/// Trait for interpreting the value octets of an X.509 extension.
///
/// # Example
/// ```
/// use certview::cert::extensions::{BasicConstraints, FromExtensionValue};
/// use certview::config::DecodeLimits;
/// // SEQUENCE { BOOLEAN TRUE, INTEGER 0 }
/// let raw = [0x30, 0x06, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x00];
/// let bc = BasicConstraints::from_extension_value(&raw, &DecodeLimits::default()).unwrap();
/// assert_eq!(bc.to_string(), "CA: Yes, Path Length: 0");
/// ```
pub trait FromExtensionValue: Sized {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Decodes the extension from its DER-encoded value octets.
    fn from_extension_value(raw: &[u8], limits: &DecodeLimits)
    -> Result<Self, ExtensionFormatError>;
}

/// One choice of a `GeneralName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    Email(String),
    Dns(String),
    Uri(String),
    /// iPAddress octets; 4 for IPv4, 16 for IPv6.
    Ip(Vec<u8>),
    DirectoryName(DistinguishedName),
    /// Any other choice, keyed by its context tag number.
    Other { tag: u32, value: String },
}

impl GeneralName {
    fn decode<'a>(tree: &Asn1Tree<'a>, node: &AsnNode<'a>) -> Result<Self, SchemaError> {
        if node.tag.class != TagClass::ContextSpecific {
            return Err(SchemaError::UnexpectedTag {
                field: "GeneralName",
                expected: "context-specific tag",
                found: node.tag.to_string(),
            });
        }
        let text = || String::from_utf8_lossy(node.value).into_owned();
        Ok(match node.tag.number {
            1 => Self::Email(text()),
            2 => Self::Dns(text()),
            6 => Self::Uri(text()),
            7 => Self::Ip(node.value.to_vec()),
            4 if node.is_constructed() => {
                let name = tree
                    .elements(node)
                    .next()
                    .ok_or(SchemaError::MissingField("directoryName"))?;
                Self::DirectoryName(DistinguishedName::decode(tree, name, "directoryName")?)
            }
            tag => {
                let printable = !node.is_constructed()
                    && !node.value.is_empty()
                    && node.value.iter().all(|b| b.is_ascii_graphic() || *b == b' ');
                let value = if printable { text() } else { hex_plain(node.value) };
                Self::Other { tag, value }
            }
        })
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(v) => write!(f, "Email:{v}"),
            Self::Dns(v) => write!(f, "DNS:{v}"),
            Self::Uri(v) => write!(f, "URI:{v}"),
            Self::Ip(octets) => match octets.as_slice() {
                [a, b, c, d] => write!(f, "IP:{a}.{b}.{c}.{d}"),
                v6 if v6.len() == 16 => {
                    let groups: Vec<String> = v6
                        .chunks_exact(2)
                        .map(|pair| format!("{:02x}{:02x}", pair[0], pair[1]))
                        .collect();
                    write!(f, "IP:{}", groups.join(":"))
                }
                other => write!(f, "IP:{}", hex_plain(other)),
            },
            Self::DirectoryName(dn) => write!(f, "4:{}", dn.to_one_line()),
            Self::Other { tag, value } => write!(f, "{tag}:{value}"),
        }
    }
}

/// Represents the Subject Alternative Name (SAN) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl FromExtensionValue for SubjectAltName {
    const OID: ObjectIdentifier = oid::SUBJECT_ALT_NAME;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let names = tree
            .sequence(tree.root(), "SubjectAltName")?
            .map(|node| GeneralName::decode(&tree, node))
            .collect::<Result<Vec<_>, _>>()?;
        if names.is_empty() {
            return Err(ExtensionFormatError::Empty);
        }
        Ok(Self { names })
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.names.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(", "))
    }
}

/// Represents the Key Usage extension.
///
/// Bit 0 of the BIT STRING (`digitalSignature`) is the most significant bit
/// of the inner `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    const FLAGS: [(u16, &'static str); 9] = [
        (0x8000, "Digital Signature"),
        (0x4000, "Non Repudiation"),
        (0x2000, "Key Encipherment"),
        (0x1000, "Data Encipherment"),
        (0x0800, "Key Agreement"),
        (0x0400, "Certificate Signing"),
        (0x0200, "CRL Signing"),
        (0x0100, "Encipher Only"),
        (0x0080, "Decipher Only"),
    ];

    /// Names of the set flags, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        Self::FLAGS
            .iter()
            .filter(|(mask, _)| self.0 & mask != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl FromExtensionValue for KeyUsage {
    const OID: ObjectIdentifier = oid::KEY_USAGE;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let (_, bits) = tree.root().as_bit_string("KeyUsage")?;
        let first = bits.first().copied().unwrap_or(0);
        let second = bits.get(1).copied().unwrap_or(0);
        Ok(Self(u16::from_be_bytes([first, second])))
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The path length constraint, when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u64>,
}

impl FromExtensionValue for BasicConstraints {
    const OID: ObjectIdentifier = oid::BASIC_CONSTRAINTS;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let mut seq = tree.sequence(tree.root(), "BasicConstraints")?;
        let is_ca = match seq.next_if(|t| t.is_universal(tags::BOOLEAN)) {
            Some(node) => node.as_boolean("cA")?,
            None => false,
        };
        let max_path_length = seq
            .next()
            .map(|node| node.as_u64("pathLenConstraint"))
            .transpose()?;
        Ok(Self {
            is_ca,
            max_path_length,
        })
    }
}

impl fmt::Display for BasicConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CA: {}", if self.is_ca { "Yes" } else { "No" })?;
        if let Some(len) = self.max_path_length {
            write!(f, ", Path Length: {len}")?;
        }
        Ok(())
    }
}

/// Represents the Extended Key Usage extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub usage: Vec<ObjectIdentifier>,
}

impl FromExtensionValue for ExtendedKeyUsage {
    const OID: ObjectIdentifier = oid::EXTENDED_KEY_USAGE;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let usage = tree
            .sequence(tree.root(), "ExtKeyUsageSyntax")?
            .map(|node| node.as_oid("KeyPurposeId"))
            .collect::<Result<Vec<_>, _>>()?;
        if usage.is_empty() {
            return Err(ExtensionFormatError::Empty);
        }
        Ok(Self { usage })
    }
}

impl fmt::Display for ExtendedKeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let purposes: Vec<String> = self
            .usage
            .iter()
            .map(|purpose| oid::label_or_dotted(oid::key_purpose_name(purpose), purpose))
            .collect();
        f.write_str(&purposes.join(", "))
    }
}

/// Represents the Subject Key Identifier extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl FromExtensionValue for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = oid::SUBJECT_KEY_IDENTIFIER;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let id = tree.root().as_octet_string("SubjectKeyIdentifier")?;
        Ok(Self(id.to_vec()))
    }
}

impl fmt::Display for SubjectKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_colon(&self.0))
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// # Fields
/// * `key_identifier` - The `[0]` keyIdentifier, when present.
/// * `structure` - Structural rendering of the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub structure: String,
}

impl FromExtensionValue for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = oid::AUTHORITY_KEY_IDENTIFIER;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        let key_identifier = tree
            .sequence(tree.root(), "AuthorityKeyIdentifier")?
            .find(|node| node.tag.is_context(0) && !node.is_constructed())
            .map(|node| node.value.to_vec());
        Ok(Self {
            key_identifier,
            structure: structure_string(&tree, tree.root()),
        })
    }
}

impl fmt::Display for AuthorityKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key_identifier {
            Some(id) => write!(f, "KeyID: {}", hex_colon(id)),
            None => f.write_str(&self.structure),
        }
    }
}

/// The 3GPP NF Types extension, kept as a structural rendering of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfTypes(pub String);

impl FromExtensionValue for NfTypes {
    const OID: ObjectIdentifier = oid::NF_TYPES;

    fn from_extension_value(
        raw: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, ExtensionFormatError> {
        let tree = asn1::decode(raw, limits)?;
        Ok(Self(structure_string(&tree, tree.root())))
    }
}

/// The interpreted value of an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
    SubjectAltName(SubjectAltName),
    KeyUsage(KeyUsage),
    BasicConstraints(BasicConstraints),
    ExtendedKeyUsage(ExtendedKeyUsage),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// Generic structural rendering of a decoded value.
    Structural(String),
    /// Undecoded value octets.
    Raw(Vec<u8>),
}

impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubjectAltName(v) => v.fmt(f),
            Self::KeyUsage(v) => v.fmt(f),
            Self::BasicConstraints(v) => v.fmt(f),
            Self::ExtendedKeyUsage(v) => v.fmt(f),
            Self::SubjectKeyIdentifier(v) => v.fmt(f),
            Self::AuthorityKeyIdentifier(v) => v.fmt(f),
            Self::Structural(s) => f.write_str(s),
            Self::Raw(bytes) => write!(f, "Raw Value (Hex): {}", hex_plain(bytes)),
        }
    }
}

impl From<SubjectAltName> for ExtensionValue {
    fn from(value: SubjectAltName) -> Self {
        Self::SubjectAltName(value)
    }
}

impl From<BasicConstraints> for ExtensionValue {
    fn from(value: BasicConstraints) -> Self {
        Self::BasicConstraints(value)
    }
}

impl From<ExtendedKeyUsage> for ExtensionValue {
    fn from(value: ExtendedKeyUsage) -> Self {
        Self::ExtendedKeyUsage(value)
    }
}

impl From<SubjectKeyIdentifier> for ExtensionValue {
    fn from(value: SubjectKeyIdentifier) -> Self {
        Self::SubjectKeyIdentifier(value)
    }
}

impl From<AuthorityKeyIdentifier> for ExtensionValue {
    fn from(value: AuthorityKeyIdentifier) -> Self {
        Self::AuthorityKeyIdentifier(value)
    }
}

impl From<NfTypes> for ExtensionValue {
    fn from(value: NfTypes) -> Self {
        Self::Structural(value.0)
    }
}

type Interpreter = fn(&[u8], &DecodeLimits) -> Result<ExtensionValue, ExtensionFormatError>;

const INTERPRETERS: &[(ObjectIdentifier, Interpreter)] = &[
    (SubjectAltName::OID, typed::<SubjectAltName>),
    (KeyUsage::OID, interpret_key_usage),
    (BasicConstraints::OID, typed::<BasicConstraints>),
    (ExtendedKeyUsage::OID, typed::<ExtendedKeyUsage>),
    (SubjectKeyIdentifier::OID, typed::<SubjectKeyIdentifier>),
    (AuthorityKeyIdentifier::OID, typed::<AuthorityKeyIdentifier>),
    (NfTypes::OID, typed::<NfTypes>),
];

fn typed<T>(raw: &[u8], limits: &DecodeLimits) -> Result<ExtensionValue, ExtensionFormatError>
where
    T: FromExtensionValue,
    ExtensionValue: From<T>,
{
    T::from_extension_value(raw, limits).map(ExtensionValue::from)
}

/// A key usage with no flags set renders as the structure of the BIT STRING.
fn interpret_key_usage(
    raw: &[u8],
    limits: &DecodeLimits,
) -> Result<ExtensionValue, ExtensionFormatError> {
    let usage = KeyUsage::from_extension_value(raw, limits)?;
    if usage.is_empty() {
        let tree = asn1::decode(raw, limits)?;
        return Ok(ExtensionValue::Structural(structure_string(&tree, tree.root())));
    }
    Ok(ExtensionValue::KeyUsage(usage))
}

/// Interprets extension value octets by OID.
///
/// Never fails: unknown OIDs and values that do not decode come back as
/// [`ExtensionValue::Raw`].
pub fn interpret(oid: &ObjectIdentifier, raw: &[u8], limits: &DecodeLimits) -> ExtensionValue {
    let Some((_, interpreter)) = INTERPRETERS.iter().find(|(known, _)| known == oid) else {
        return ExtensionValue::Raw(raw.to_vec());
    };
    match interpreter(raw, limits) {
        Ok(value) => value,
        Err(err) => {
            warn!(%oid, error = %err, "extension value not understood, showing raw octets");
            ExtensionValue::Raw(raw.to_vec())
        }
    }
}

/// Display string for an extension value, using the default decode limits.
///
/// ```
/// use certview::cert::extensions::format_extension;
/// let oid = "1.2.3.4".parse().unwrap();
/// assert_eq!(format_extension(&oid, &[0xDE, 0xAD]), "Raw Value (Hex): dead");
/// ```
pub fn format_extension(oid: &ObjectIdentifier, raw: &[u8]) -> String {
    interpret(oid, raw, &DecodeLimits::default()).to_string()
}

/// A decoded `Extension` record.
///
/// # Fields
/// * `oid` - The extnID.
/// * `name` - Registry name for `oid`, or the dotted OID.
/// * `critical` - The critical flag, `false` when absent.
/// * `raw_value` - The extnValue octets.
/// * `value` - The interpreted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub oid: ObjectIdentifier,
    pub name: String,
    pub critical: bool,
    pub raw_value: Vec<u8>,
    pub value: ExtensionValue,
}

impl Extension {
    /// The display string of the value.
    pub fn formatted_value(&self) -> String {
        self.value.to_string()
    }

    /// Decodes `Extension ::= SEQUENCE { extnID, critical BOOLEAN DEFAULT FALSE, extnValue }`.
    pub(crate) fn decode<'a>(
        tree: &Asn1Tree<'a>,
        node: &AsnNode<'a>,
        limits: &DecodeLimits,
    ) -> Result<Self, SchemaError> {
        let mut seq = tree.sequence(node, "Extension")?;
        let oid = seq.required("extnID")?.as_oid("extnID")?;
        let critical = match seq.next_if(|t| t.is_universal(tags::BOOLEAN)) {
            Some(node) => node.as_boolean("critical")?,
            None => false,
        };
        let raw_value = seq.required("extnValue")?.as_octet_string("extnValue")?;
        seq.finish("Extension")?;
        Ok(Self {
            name: oid::label_or_dotted(oid::extension_name(&oid), &oid),
            critical,
            value: interpret(&oid, raw_value, limits),
            raw_value: raw_value.to_vec(),
            oid,
        })
    }

    /// Decodes `Extensions ::= SEQUENCE OF Extension`.
    pub(crate) fn decode_all<'a>(
        tree: &Asn1Tree<'a>,
        node: &AsnNode<'a>,
        limits: &DecodeLimits,
    ) -> Result<Vec<Self>, SchemaError> {
        tree.sequence(node, "extensions")?
            .map(|ext| Self::decode(tree, ext, limits))
            .collect()
    }
}
