use std::sync::LazyLock;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use tracing::debug;

use crate::cert::DocumentKind;
use crate::error::FramingError;

/// Standard alphabet, padding optional, like a browser's `atob`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static PEM_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"-----(?:BEGIN|END) [^-]+-----").ok());

/// User text reduced to the bytes handed to the TLV decoder.
///
/// # Fields
/// * `pem` - The effective PEM text, after unwrapping a Base64-encoded PEM.
/// * `kind` - `CertificationRequest` when the text mentions `REQUEST`.
/// * `der` - The decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub pem: String,
    pub kind: DocumentKind,
    pub der: Vec<u8>,
}

/// Normalizes PEM, Base64-wrapped PEM, or bare Base64 text.
///
/// ```
/// use certview::cert::DocumentKind;
/// use certview::pem_utils::normalize;
/// let input = "-----BEGIN CERTIFICATE REQUEST-----\nMAA=\n-----END CERTIFICATE REQUEST-----";
/// let normalized = normalize(input).unwrap();
/// assert_eq!(normalized.kind, DocumentKind::CertificationRequest);
/// assert_eq!(normalized.der, vec![0x30, 0x00]);
/// ```
pub fn normalize(input: &str) -> Result<NormalizedInput, FramingError> {
    let mut pem = input.trim().to_string();
    if !pem.contains("-----BEGIN") {
        if let Some(inner) = unwrap_base64_pem(&pem) {
            debug!("input was Base64-encoded PEM");
            pem = inner;
        }
    }

    let kind = if pem.contains("REQUEST") {
        DocumentKind::CertificationRequest
    } else {
        DocumentKind::Certificate
    };

    let body: String = strip_markers(&pem)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if body.is_empty() {
        return Err(FramingError::EmptyPayload);
    }
    let der = LENIENT_BASE64.decode(body.as_bytes())?;
    if der.is_empty() {
        return Err(FramingError::EmptyPayload);
    }

    debug!(?kind, bytes = der.len(), "normalized input");
    Ok(NormalizedInput { pem, kind, der })
}

/// Decodes `text` as Base64 and returns it if the result is PEM text.
fn unwrap_base64_pem(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = LENIENT_BASE64.decode(compact.as_bytes()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    decoded.contains("-----BEGIN").then_some(decoded)
}

fn strip_markers(text: &str) -> String {
    match PEM_MARKER.as_ref() {
        Some(marker) => marker.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Convert DER-encoded data into a PEM-encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT_PEM: &str = include_str!("../tests/data/rsa_server.pem");
    const CSR_PEM: &str = include_str!("../tests/data/csr_with_ext.pem");

    #[test]
    fn test_kind_from_header() {
        assert_eq!(normalize(CERT_PEM).unwrap().kind, DocumentKind::Certificate);
        assert_eq!(
            normalize(CSR_PEM).unwrap().kind,
            DocumentKind::CertificationRequest
        );
    }

    #[test]
    fn test_clean_pem_is_idempotent() {
        let first = normalize(CERT_PEM).unwrap();
        let second = normalize(&first.pem).unwrap();
        assert_eq!(first.der, second.der);
        assert_eq!(first.pem, CERT_PEM.trim());
        assert_eq!(first.der, include_bytes!("../tests/data/rsa_server.der"));
    }

    #[test]
    fn test_base64_wrapped_pem() {
        let wrapped = LENIENT_BASE64.encode(CSR_PEM);
        let normalized = normalize(&wrapped).unwrap();
        assert_eq!(normalized.pem, CSR_PEM);
        assert_eq!(normalized.kind, DocumentKind::CertificationRequest);
        assert_eq!(normalized.der, normalize(CSR_PEM).unwrap().der);
    }

    #[test]
    fn test_bare_base64_body() {
        let normalized = normalize("  MAA=  ").unwrap();
        assert_eq!(normalized.pem, "MAA=");
        assert_eq!(normalized.kind, DocumentKind::Certificate);
        assert_eq!(normalized.der, vec![0x30, 0x00]);
    }

    #[test]
    fn test_unpadded_body() {
        assert_eq!(normalize("MAA").unwrap().der, vec![0x30, 0x00]);
    }

    #[test]
    fn test_framing_errors() {
        assert_eq!(normalize("   ").unwrap_err(), FramingError::EmptyPayload);
        assert_eq!(
            normalize("-----BEGIN CERTIFICATE-----\n-----END CERTIFICATE-----").unwrap_err(),
            FramingError::EmptyPayload
        );
        assert!(matches!(
            normalize("-----BEGIN CERTIFICATE-----\n!!!\n-----END CERTIFICATE-----"),
            Err(FramingError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_der_to_pem_round_trip() {
        let der = normalize(CERT_PEM).unwrap().der;
        let pem = der_to_pem(&der, DocumentKind::Certificate.pem_label());
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(normalize(&pem).unwrap().der, der);
    }
}
