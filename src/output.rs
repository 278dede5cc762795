//! Serializable display result.
//!
//! Successful parses serialize with a `type` tag of `certificate` or `csr`;
//! failures serialize as `{ "error": "<message>" }`.

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::ParsedDocument;
use crate::cert::{Document, Extension};
use crate::cert::name::DistinguishedName;
use crate::error::CertViewError;
use crate::fingerprint::Fingerprints;
use crate::text::hex_colon;

/// One distinguished name attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamePart {
    pub label: String,
    pub value: String,
}

/// One extension with its display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionOutput {
    pub oid: String,
    pub name: String,
    pub critical: bool,
    pub value: String,
}

/// RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityOutput {
    pub not_before: String,
    pub not_after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateOutput {
    pub subject: Vec<NamePart>,
    pub issuer: Vec<NamePart>,
    pub serial_number: String,
    pub validity: ValidityOutput,
    pub extensions: Vec<ExtensionOutput>,
    pub fingerprints: Fingerprints,
    pub raw_output: String,
    pub decoded_pem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrOutput {
    pub subject: Vec<NamePart>,
    pub extensions: Vec<ExtensionOutput>,
    pub fingerprints: Fingerprints,
    pub raw_output: String,
    pub decoded_pem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DocumentOutput {
    #[serde(rename = "certificate")]
    Certificate(CertificateOutput),
    #[serde(rename = "csr")]
    Csr(CsrOutput),
}

/// The result of a parse, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParseOutput {
    Success(DocumentOutput),
    Failure { error: String },
}

impl ParseOutput {
    /// Compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&ParsedDocument> for ParseOutput {
    fn from(parsed: &ParsedDocument) -> Self {
        let raw_output = parsed.raw_output.clone();
        let decoded_pem = parsed.decoded_pem.clone();
        let fingerprints = parsed.fingerprints.clone();
        let output = match &parsed.document {
            Document::Certificate(cert) => DocumentOutput::Certificate(CertificateOutput {
                subject: name_parts(&cert.subject),
                issuer: name_parts(&cert.issuer),
                serial_number: hex_colon(&cert.serial_number),
                validity: ValidityOutput {
                    not_before: rfc3339(&cert.validity.not_before),
                    not_after: rfc3339(&cert.validity.not_after),
                },
                extensions: extension_outputs(&cert.extensions),
                fingerprints,
                raw_output,
                decoded_pem,
            }),
            Document::CertificationRequest(csr) => DocumentOutput::Csr(CsrOutput {
                subject: name_parts(&csr.subject),
                extensions: extension_outputs(&csr.requested_extensions),
                fingerprints,
                raw_output,
                decoded_pem,
            }),
        };
        Self::Success(output)
    }
}

impl From<&CertViewError> for ParseOutput {
    fn from(err: &CertViewError) -> Self {
        Self::Failure {
            error: err.to_string(),
        }
    }
}

impl From<Result<ParsedDocument, CertViewError>> for ParseOutput {
    fn from(result: Result<ParsedDocument, CertViewError>) -> Self {
        match &result {
            Ok(parsed) => parsed.into(),
            Err(err) => err.into(),
        }
    }
}

fn name_parts(name: &DistinguishedName) -> Vec<NamePart> {
    name.iter()
        .map(|attr| NamePart {
            label: attr.label.clone(),
            value: attr.value.clone(),
        })
        .collect()
}

fn extension_outputs(extensions: &[Extension]) -> Vec<ExtensionOutput> {
    extensions
        .iter()
        .map(|ext| ExtensionOutput {
            oid: ext.oid.to_string(),
            name: ext.name.clone(),
            critical: ext.critical,
            value: ext.formatted_value(),
        })
        .collect()
}

fn rfc3339(time: &OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| time.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, FramingError};

    #[test]
    fn test_failure_shape() {
        let output = ParseOutput::from(&CertViewError::from(FramingError::EmptyPayload));
        assert_eq!(
            output.to_json().unwrap(),
            r#"{"error":"No certificate data found in input"}"#
        );

        let err = CertViewError::from(DecodeError::DepthExceeded { max: 100 });
        let json: serde_json::Value =
            serde_json::from_str(&ParseOutput::from(&err).to_json().unwrap()).unwrap();
        assert_eq!(json["error"], "ASN.1 nesting exceeds maximum depth of 100");
    }

    #[test]
    fn test_certificate_shape() {
        let parsed = crate::parse(include_str!("../tests/data/rsa_server.pem")).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&ParseOutput::from(&parsed).to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "certificate");
        assert_eq!(json["serialNumber"], "00:f1:e2:d3:c4:b5:a6:97:88:79:6a:5b:4c:3d:2e:1f:10");
        assert_eq!(json["validity"]["notBefore"], "2024-01-01T00:00:00Z");
        assert_eq!(json["validity"]["notAfter"], "2050-06-15T12:00:00Z");
        assert_eq!(json["subject"][0]["label"], "Country");
        assert_eq!(json["issuer"][2]["value"], "Example Root CA");
        assert_eq!(json["extensions"][0]["name"], "Basic Constraints");
        assert_eq!(json["extensions"][0]["critical"], true);
        assert!(json["rawOutput"].as_str().unwrap().starts_with("Certificate:\n"));
        assert!(json["decodedPem"].as_str().unwrap().starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn test_csr_shape() {
        let parsed = crate::parse(include_str!("../tests/data/csr_with_ext.pem")).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&ParseOutput::from(&parsed).to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "csr");
        assert!(json.get("issuer").is_none());
        assert_eq!(json["extensions"].as_array().unwrap().len(), 3);
        assert_eq!(json["extensions"][1]["value"], "Digital Signature, Key Encipherment");
    }
}
