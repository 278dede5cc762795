//! # CertView - A Pure Rust X.509 Certificate and CSR Decoder
//!
//! CertView turns PEM text into a structured view of an X.509 certificate or a
//! PKCS#10 certificate signing request, together with a deterministic,
//! OpenSSL-style text dump. It decodes and presents; it does not verify
//! signatures, build chains or check revocation.
//!
//! ## Pipeline
//!
//! 1. **Normalization** ([`pem_utils::normalize`]): strips PEM armour, unwraps
//!    Base64-encoded PEM and picks certificate or CSR from the header.
//! 2. **TLV decoding** ([`asn1::decode`]): builds a bounded arena tree of
//!    ASN.1 nodes from the DER bytes.
//! 3. **Schema mapping** ([`cert::bind`]): binds the tree to a
//!    [`cert::Certificate`] or [`cert::CertificationRequest`].
//! 4. **Extension formatting** ([`cert::extensions`]): renders each extension
//!    value; a value that cannot be interpreted falls back to a hex dump.
//! 5. **Text rendering** ([`text::to_text`]): produces the canonical dump.
//!
//! ## Supported Input
//!
//! - **PEM**: `-----BEGIN CERTIFICATE-----` or `-----BEGIN CERTIFICATE REQUEST-----`
//! - **Base64-wrapped PEM**: an entire PEM document encoded once more as Base64
//! - **Bare Base64**: the DER body without armour (treated as a certificate)
//!
//! ## Quick Start
//!
//! ### Parsing a Certificate
//!
//! ```rust,no_run
//! use certview::cert::Document;
//!
//! # fn main() -> Result<(), certview::error::CertViewError> {
//! let pem = std::fs::read_to_string("server.pem").unwrap_or_default();
//! let parsed = certview::parse(&pem)?;
//!
//! if let Document::Certificate(cert) = &parsed.document {
//!     println!("Subject: {}", cert.subject.to_one_line());
//!     println!("Not After: {}", cert.validity.not_after);
//! }
//! println!("{}", parsed.raw_output);
//! # Ok(())
//! # }
//! ```
//!
//! ### Producing Display JSON
//!
//! ```rust
//! use certview::output::ParseOutput;
//!
//! let output = ParseOutput::from(certview::parse("not a certificate"));
//! let json = output.to_json().unwrap();
//! assert!(json.starts_with("{\"error\":"));
//! ```
//!
//! ### Tightening Decode Limits
//!
//! ```rust
//! use certview::config::DecodeLimits;
//! use certview::error::{CertViewError, DecodeError};
//!
//! let limits = DecodeLimits::builder().max_depth(1).build();
//! // SEQUENCE { SEQUENCE { SEQUENCE {} } }
//! let err = certview::parse_with_limits("MAQwAjAA", &limits).unwrap_err();
//! assert_eq!(err, CertViewError::Decode(DecodeError::DepthExceeded { max: 1 }));
//! ```
//!
//! ## Error Handling
//!
//! Framing, TLV and schema failures abort the parse with a [`error::CertViewError`].
//! Extension values never do: an extension whose value cannot be interpreted is
//! shown as `Raw Value (Hex): ...`.
//!
//! ## Module Organization
//!
//! - [`asn1`]: TLV decoding into an arena tree and structural debug rendering
//! - [`cert`]: Certificate and CSR schema mapping, names, keys and extensions
//! - [`config`]: Decode limits
//! - [`error`]: Error types for each pipeline stage
//! - [`fingerprint`]: SHA-1 and SHA-256 fingerprints
//! - [`oid`]: OID registries used for display labels
//! - [`output`]: Serializable display result
//! - [`pem_utils`]: Input normalization and PEM encoding
//! - [`text`]: Canonical text rendering

pub mod asn1;
pub mod cert;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod oid;
pub mod output;
pub mod pem_utils;
pub mod text;

use tracing::debug;

use cert::{Document, DocumentKind};
use config::DecodeLimits;
use error::CertViewError;
use fingerprint::Fingerprints;

/// A fully decoded certificate or CSR.
///
/// # Fields
/// * `document` - The typed document.
/// * `raw_output` - Canonical text dump of `document`.
/// * `decoded_pem` - The effective PEM text after normalization.
/// * `der` - The decoded DER bytes.
/// * `fingerprints` - Digests of `der`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document: Document,
    pub raw_output: String,
    pub decoded_pem: String,
    pub der: Vec<u8>,
    pub fingerprints: Fingerprints,
}

impl ParsedDocument {
    pub fn kind(&self) -> DocumentKind {
        self.document.kind()
    }

    /// Canonical PEM for the decoded DER.
    pub fn to_pem(&self) -> String {
        pem_utils::der_to_pem(&self.der, self.kind().pem_label())
    }
}

/// Parses PEM (or Base64-wrapped PEM) text with the default decode limits.
pub fn parse(input: &str) -> Result<ParsedDocument, CertViewError> {
    parse_with_limits(input, &DecodeLimits::default())
}

/// Parses PEM (or Base64-wrapped PEM) text with explicit decode limits.
pub fn parse_with_limits(
    input: &str,
    limits: &DecodeLimits,
) -> Result<ParsedDocument, CertViewError> {
    let normalized = pem_utils::normalize(input)?;
    let document = decode_der(&normalized.der, normalized.kind, limits)?;
    Ok(ParsedDocument {
        raw_output: text::to_text(&document),
        fingerprints: Fingerprints::of(&normalized.der),
        decoded_pem: normalized.pem,
        der: normalized.der,
        document,
    })
}

/// Decodes a DER buffer as the given kind of document.
pub fn decode_der(
    der: &[u8],
    kind: DocumentKind,
    limits: &DecodeLimits,
) -> Result<Document, CertViewError> {
    let tree = asn1::decode(der, limits)?;
    debug!(nodes = tree.len(), ?kind, "decoded TLV tree");
    Ok(cert::bind(&tree, kind, limits)?)
}
