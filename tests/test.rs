mod util;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use certview::cert::{Document, DocumentKind, PublicKey};
use certview::error::{CertViewError, DecodeError, FramingError, SchemaError};
use certview::output::ParseOutput;

/// Full text dump of the RSA server certificate, checked section by section.
#[test]
fn certificate_text_dump() {
    let parsed = util::parse_fixture("rsa_server.pem");
    let text = &parsed.raw_output;

    assert!(text.starts_with(
        "Certificate:
    Data:
        Version: 3 (0x2)
        Serial Number:
            00:f1:e2:d3:c4:b5:a6:97:88:79:6a:5b:4c:3d:2e:
            1f:10
        Signature Algorithm: sha256WithRSAEncryption
        Issuer: Country=US, Organization=Example Corp, Common Name=Example Root CA
        Validity
            Not Before: Mon, 01 Jan 2024 00:00:00 GMT
            Not After : Wed, 15 Jun 2050 12:00:00 GMT
        Subject: Country=US, State=California, City=San Francisco, Organization=Example Corp, Organization Unit=Web, Organization Unit=Ops, Common Name=example.com
        Subject Public Key Info:
            Public Key Algorithm: rsaEncryption
                Public-Key: (2048 bit)
                Modulus:
                    00:d1:b1:35:24:12:00:4e:1b:0b:9a:ac:2b:48:ea:
                    d6:a6:19:a7:93:ec:e9:a2:1e:5d:64:a4:7a:da:83:
"
    ));

    assert!(text.contains(
        "                    8e:27
                Exponent: 65537 (0x10001)
        X509v3 extensions:
            Basic Constraints: critical
                CA: No

            Key Usage: critical
                Digital Signature, Key Encipherment

            Extended Key Usage:
                Server Auth, Client Auth, 1.2.3.4.5

            Subject Alternative Name:
                DNS:example.com, DNS:www.example.com, IP:192.168.1.1, IP:2001:0db8:0000:0000:0000:0000:0000:0001, Email:admin@example.com, URI:https://example.com/

            Subject Key Identifier:
                db:d1:ef:43:21:45:fb:b7:3e:a5:9f:5e:f5:6b:76:a4:c2:5a:72:24

            Authority Key Identifier:
                KeyID: fe:6b:a1:ae:d1:a2:e4:08:9a:01:9e:c0:34:bc:f4:06:cf:fb:b2:19

            NF Types:
                SEQUENCE
                  IA5String : 'AMF'
                  IA5String : 'SMF'

            1.2.3.4.5.6:
                Raw Value (Hex): dead

    Signature Algorithm: sha256WithRSAEncryption
    Signature Value:
         5b:55:e4:05:f2:9f:70:7d:96:1d:07:ff:f3:26:fe:78:0f:f6:
         1a:8f:46:5e:3f:38:c0:4e:a4:29:54:21:3d:1d:ad:b8:49:bd:
"
    ));

    // 256 signature bytes at 18 per line
    let signature_lines: Vec<_> = text
        .lines()
        .skip_while(|line| *line != "    Signature Value:")
        .skip(1)
        .collect();
    assert_eq!(signature_lines.len(), 15);
    assert_eq!(signature_lines[14], "         e7:87:1b:8e");
    assert!(!text.ends_with('\n'));
}

#[test]
fn certificate_fields() {
    let parsed = util::parse_fixture("rsa_server.pem");
    assert_eq!(parsed.kind(), DocumentKind::Certificate);

    let Document::Certificate(cert) = &parsed.document else {
        panic!("expected a certificate");
    };
    let ous: Vec<_> = cert
        .subject
        .values_of(&certview::oid::ORGANIZATION_UNIT)
        .collect();
    assert_eq!(ous, ["Web", "Ops"]);

    let critical: Vec<_> = cert
        .extensions
        .iter()
        .filter(|ext| ext.critical)
        .map(|ext| ext.name.as_str())
        .collect();
    assert_eq!(critical, ["Basic Constraints", "Key Usage"]);

    assert_eq!(
        parsed.fingerprints.sha256,
        "32:89:43:8a:9f:16:32:23:9b:ce:7d:61:b3:b5:19:1a:14:ae:b7:06:14:65:c6:de:9e:03:01:f1:69:d5:5e:68"
    );
    assert_eq!(
        parsed.fingerprints.sha1,
        "57:02:14:e2:bc:fb:32:f8:ec:94:4f:1f:30:bd:ea:9a:80:12:9e:f6"
    );
}

#[test]
fn certificate_without_extensions() {
    let parsed = util::parse_fixture("ec_noext.pem");
    let text = &parsed.raw_output;

    assert!(!text.contains("X509v3 extensions:"));
    assert!(text.contains("        Serial Number:\n            10:00\n"));
    assert!(text.contains("            Not Before: Tue, 01 Jan 2030 00:00:00 GMT\n"));
    assert!(text.contains("            Not After : Wed, 01 Jan 2031 00:00:00 GMT\n"));
    assert!(text.contains(
        "            Public Key Algorithm: ecPublicKey
                Public-Key:
                    04:6e:19:22:1d:82:5c:42:eb:e1:5a:f8:db:91:b8:
"
    ));
    assert_eq!(
        util::lines_starting_with(text, "Signature Algorithm:"),
        [
            "        Signature Algorithm: ecdsa-with-SHA256",
            "    Signature Algorithm: ecdsa-with-SHA256",
        ]
    );
    assert!(matches!(
        parsed.document.public_key_info().public_key,
        PublicKey::Raw(ref key) if key.len() == 65
    ));
}

#[test]
fn csr_with_requested_extensions() {
    let parsed = util::parse_fixture("csr_with_ext.pem");
    assert_eq!(parsed.kind(), DocumentKind::CertificationRequest);
    let text = &parsed.raw_output;

    assert!(text.starts_with(
        "Certificate Request:
    Data:
        Version: 0 (0x0)
        Subject: Country=DE, Organization=Example GmbH, Common Name=api.example.de
        Subject Public Key Info:
            Public Key Algorithm: rsaEncryption
                Public-Key: (2048 bit)
                Modulus:
                    00:92:24:af:80:73:11:3f:db:a7:90:a9:b3:6a:8b:
"
    ));
    assert!(text.contains(
        "                Exponent: 65537 (0x10001)
        Attributes:
            challengePassword: s3cret
            Requested Extensions:
                Subject Alternative Name:
                    DNS:api.example.de, IP:10.0.0.1

                Key Usage: critical
                    Digital Signature, Key Encipherment

                Basic Constraints:
                    CA: No

    Signature Algorithm: sha256WithRSAEncryption
    Signature Value:
         8e:77:a0:48:41:d3:fe:83:fe:62:39:43:e1:ae:43:48:25:0b:
"
    ));
}

#[test]
fn csr_without_attributes() {
    let parsed = util::parse_fixture("csr_plain.pem");
    assert!(parsed.raw_output.contains(
        "        Attributes:
            (None)
    Signature Algorithm: ecdsa-with-SHA256
"
    ));
    assert!(parsed.document.extensions().is_empty());
}

#[test]
fn parsing_is_deterministic() {
    for name in ["rsa_server.pem", "ec_noext.pem", "csr_with_ext.pem", "csr_plain.pem"] {
        let first = util::parse_fixture(name);
        let second = util::parse_fixture(name);
        assert_eq!(first, second, "{name}");
        assert_eq!(first.raw_output, second.raw_output, "{name}");
    }
}

#[test]
fn base64_wrapped_pem() {
    let pem = util::fixture("csr_with_ext.pem");
    let parsed = certview::parse(&STANDARD.encode(&pem)).unwrap();
    assert_eq!(parsed.kind(), DocumentKind::CertificationRequest);
    assert_eq!(parsed.decoded_pem, pem);
    assert_eq!(parsed.document, util::parse_fixture("csr_with_ext.pem").document);
}

#[test]
fn canonical_pem_round_trip() {
    let parsed = util::parse_fixture("rsa_server.pem");
    assert_eq!(parsed.to_pem().trim(), util::fixture("rsa_server.pem").trim());
    assert_eq!(
        parsed.der,
        std::fs::read(util::fixture_path("rsa_server.der")).unwrap()
    );
}

#[test]
fn truncated_input_is_decode_error() {
    let der = std::fs::read(util::fixture_path("rsa_server.der")).unwrap();
    let err = certview::parse(&STANDARD.encode(&der[..100])).unwrap_err();
    assert!(matches!(
        err,
        CertViewError::Decode(DecodeError::Truncated { .. })
    ));
    assert!(!err.to_string().is_empty());
}

#[test]
fn trailing_bytes_are_decode_error() {
    let mut der = std::fs::read(util::fixture_path("rsa_server.der")).unwrap();
    let total = der.len() + 2;
    der.extend_from_slice(&[0x05, 0x00]);
    assert_eq!(
        certview::parse(&STANDARD.encode(&der)).unwrap_err(),
        CertViewError::Decode(DecodeError::TrailingData {
            consumed: total - 2,
            total,
        })
    );
}

#[test]
fn deep_nesting_is_bounded() {
    let bomb = util::nested_sequences(150);
    let err = certview::parse(&STANDARD.encode(&bomb)).unwrap_err();
    assert_eq!(
        err,
        CertViewError::Decode(DecodeError::DepthExceeded { max: 100 })
    );
}

#[test]
fn framing_errors() {
    assert_eq!(
        certview::parse("").unwrap_err(),
        CertViewError::Framing(FramingError::EmptyPayload)
    );
    assert!(matches!(
        certview::parse("-----BEGIN CERTIFICATE-----\n@@@@\n-----END CERTIFICATE-----"),
        Err(CertViewError::Framing(FramingError::InvalidBase64(_)))
    ));
}

#[test]
fn mislabelled_document_is_schema_error() {
    let pem = util::fixture("rsa_server.pem").replace("CERTIFICATE", "CERTIFICATE REQUEST");
    let err = certview::parse(&pem).unwrap_err();
    assert!(matches!(err, CertViewError::Schema(SchemaError::UnexpectedTag { .. })));
}

#[test]
fn display_output_for_failures() {
    let output = ParseOutput::from(certview::parse("MAQwAjAA"));
    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
    assert!(json["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    assert!(json.get("type").is_none());
}
