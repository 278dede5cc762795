//! Canonical text rendering of decoded documents.
//!
//! The layout mirrors `openssl x509 -text`: four spaces per indentation level,
//! colon-separated lowercase hex for byte strings, and one block per extension.
//! Output depends only on the decoded document, so identical input always
//! renders to identical text.

use std::fmt::Write;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::cert::{
    Attribute, Certificate, CertificationRequest, Document, Extension, PublicKey,
    SubjectPublicKeyInfo,
};

const INDENT: &str = "    ";

/// Bytes per line for serial numbers, moduli and raw keys.
const BYTES_PER_LINE: usize = 15;

/// Bytes per line for the trailing signature block.
const SIGNATURE_BYTES_PER_LINE: usize = 18;

/// Lowercase hex with no separators.
pub fn hex_plain(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Lowercase hex octets joined with `:`.
pub fn hex_colon(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Colon hex wrapped at `per_line` octets, each line prefixed by `indent`.
///
/// Every line except the last ends with a trailing `:`; no final newline.
pub fn hex_multiline(bytes: &[u8], indent: &str, per_line: usize) -> String {
    let per_line = per_line.max(1);
    bytes
        .chunks(per_line)
        .map(|chunk| format!("{indent}{}", hex_colon(chunk)))
        .collect::<Vec<_>>()
        .join(":\n")
}

/// `Tue, 01 Jan 2030 00:00:00 GMT`.
pub fn format_time(time: &OffsetDateTime) -> String {
    time.format(format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    ))
    .unwrap_or_else(|_| time.unix_timestamp().to_string())
}

/// Renders a decoded document as canonical text.
pub fn to_text(document: &Document) -> String {
    match document {
        Document::Certificate(cert) => certificate_text(cert),
        Document::CertificationRequest(csr) => request_text(csr),
    }
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

fn certificate_text(cert: &Certificate) -> String {
    let (i1, i2, i3) = (indent(1), indent(2), indent(3));
    let mut out = String::from("Certificate:\n");
    let _ = writeln!(out, "{i1}Data:");
    let _ = writeln!(
        out,
        "{i2}Version: {} (0x{:x})",
        cert.version.saturating_add(1),
        cert.version
    );
    let _ = writeln!(out, "{i2}Serial Number:");
    let _ = writeln!(
        out,
        "{}",
        hex_multiline(&cert.serial_number, &i3, BYTES_PER_LINE)
    );
    let _ = writeln!(
        out,
        "{i2}Signature Algorithm: {}",
        cert.signature_algorithm.name()
    );
    let _ = writeln!(out, "{i2}Issuer: {}", cert.issuer.to_one_line());
    let _ = writeln!(out, "{i2}Validity");
    let _ = writeln!(
        out,
        "{i3}Not Before: {}",
        format_time(&cert.validity.not_before)
    );
    let _ = writeln!(
        out,
        "{i3}Not After : {}",
        format_time(&cert.validity.not_after)
    );
    let _ = writeln!(out, "{i2}Subject: {}", cert.subject.to_one_line());
    write_public_key(&mut out, &cert.public_key_info);

    if !cert.extensions.is_empty() {
        let _ = writeln!(out, "{i2}X509v3 extensions:");
        write_extensions(&mut out, &cert.extensions, 3);
    }

    write_signature(&mut out, cert.signature_algorithm.name(), &cert.signature_value);
    out
}

fn request_text(csr: &CertificationRequest) -> String {
    let (i1, i2, i3) = (indent(1), indent(2), indent(3));
    let mut out = String::from("Certificate Request:\n");
    let _ = writeln!(out, "{i1}Data:");
    let _ = writeln!(out, "{i2}Version: {} (0x{:x})", csr.version, csr.version);
    let _ = writeln!(out, "{i2}Subject: {}", csr.subject.to_one_line());
    write_public_key(&mut out, &csr.public_key_info);

    let _ = writeln!(out, "{i2}Attributes:");
    if csr.attributes.is_empty() && csr.requested_extensions.is_empty() {
        let _ = writeln!(out, "{i3}(None)");
    }
    write_attributes(&mut out, &csr.attributes);
    if !csr.requested_extensions.is_empty() {
        let _ = writeln!(out, "{i3}Requested Extensions:");
        write_extensions(&mut out, &csr.requested_extensions, 4);
    }

    write_signature(&mut out, csr.signature_algorithm.name(), &csr.signature_value);
    out
}

fn write_public_key(out: &mut String, info: &SubjectPublicKeyInfo) {
    let (i2, i3, i4, i5) = (indent(2), indent(3), indent(4), indent(5));
    let _ = writeln!(out, "{i2}Subject Public Key Info:");
    let _ = writeln!(out, "{i3}Public Key Algorithm: {}", info.algorithm.name());
    match &info.public_key {
        PublicKey::Rsa(rsa) => {
            let _ = writeln!(out, "{i4}Public-Key: ({} bit)", rsa.bits());
            let _ = writeln!(out, "{i4}Modulus:");
            let _ = writeln!(out, "{}", hex_multiline(&rsa.modulus, &i5, BYTES_PER_LINE));
            match rsa.exponent() {
                Some(e) => {
                    let _ = writeln!(out, "{i4}Exponent: {e} (0x{e:x})");
                }
                None => {
                    let _ = writeln!(out, "{i4}Exponent: 0x{}", hex_plain(&rsa.public_exponent));
                }
            }
        }
        PublicKey::Raw(key) => {
            let _ = writeln!(out, "{i4}Public-Key:");
            let _ = writeln!(out, "{}", hex_multiline(key, &i5, BYTES_PER_LINE));
        }
    }
}

fn write_attributes(out: &mut String, attributes: &[Attribute]) {
    let i3 = indent(3);
    for attr in attributes {
        let _ = writeln!(out, "{i3}{}: {}", attr.name, attr.values.join(", "));
    }
}

/// Writes one block per extension: the header at `level`, value lines one level
/// deeper, then a blank line.
fn write_extensions(out: &mut String, extensions: &[Extension], level: usize) {
    let header = indent(level);
    let body = indent(level + 1);
    for ext in extensions {
        let critical = if ext.critical { " critical" } else { "" };
        let _ = writeln!(out, "{header}{}:{critical}", ext.name);
        let value = ext.formatted_value();
        if value.is_empty() {
            let _ = writeln!(out, "{body}");
        }
        for line in value.lines() {
            let _ = writeln!(out, "{body}{line}");
        }
        out.push('\n');
    }
}

fn write_signature(out: &mut String, algorithm: String, signature: &[u8]) {
    let _ = writeln!(out, "{}Signature Algorithm: {algorithm}", indent(1));
    let _ = writeln!(out, "{}Signature Value:", indent(1));
    out.push_str(&hex_multiline(
        signature,
        &format!("{} ", indent(2)),
        SIGNATURE_BYTES_PER_LINE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_hex_helpers() {
        assert_eq!(hex_plain(&[0xDE, 0xAD, 0x01]), "dead01");
        assert_eq!(hex_colon(&[0xDE, 0xAD, 0x01]), "de:ad:01");
        assert_eq!(hex_colon(&[]), "");
    }

    #[test]
    fn test_hex_multiline_wraps() {
        let bytes: Vec<u8> = (0..5).collect();
        assert_eq!(
            hex_multiline(&bytes, "  ", 2),
            "  00:01:\n  02:03:\n  04"
        );
        assert_eq!(hex_multiline(&bytes, "", 15), "00:01:02:03:04");
        assert_eq!(hex_multiline(&[], "  ", 15), "");
    }

    #[test]
    fn test_empty_extension_value_keeps_its_line() {
        // SubjectKeyIdentifier over an empty OCTET STRING
        let ext = Extension {
            oid: crate::oid::SUBJECT_KEY_IDENTIFIER,
            name: "Subject Key Identifier".to_string(),
            critical: false,
            raw_value: vec![0x04, 0x00],
            value: crate::cert::extensions::interpret(
                &crate::oid::SUBJECT_KEY_IDENTIFIER,
                &[0x04, 0x00],
                &crate::config::DecodeLimits::default(),
            ),
        };
        assert_eq!(ext.formatted_value(), "");

        let mut out = String::new();
        write_extensions(&mut out, &[ext], 3);
        assert_eq!(out, "            Subject Key Identifier:\n                \n\n");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(
            format_time(&datetime!(2030-01-01 00:00:00 UTC)),
            "Tue, 01 Jan 2030 00:00:00 GMT"
        );
        assert_eq!(
            format_time(&datetime!(2050-06-15 12:00:00 UTC)),
            "Wed, 15 Jun 2050 12:00:00 GMT"
        );
    }
}
