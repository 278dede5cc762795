//! Object identifiers and the fixed label registries used for display.

use const_oid::ObjectIdentifier;
use const_oid::db::rfc5912;

// Distinguished name attributes
pub const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
pub const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
pub const LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
pub const STATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
pub const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
pub const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
pub const ORGANIZATION_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
pub const POSTAL_CODE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.17");
pub const USER_ID: ObjectIdentifier = ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.1");

// Extensions
pub const SUBJECT_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.14");
pub const KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");
pub const SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");
pub const BASIC_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");
pub const CRL_DISTRIBUTION_POINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.31");
pub const CERTIFICATE_POLICIES: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.32");
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.35");
pub const EXTENDED_KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37");
pub const AUTHORITY_INFO_ACCESS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.1.1");
/// 3GPP NF Types (TS 33.310).
pub const NF_TYPES: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.1.34");

// PKCS#9 attributes
pub const EXTENSION_REQUEST: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.14");
pub const CHALLENGE_PASSWORD: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.7");
pub const UNSTRUCTURED_NAME: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.2");

// Algorithms
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
pub const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const SHA384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const ECDSA_WITH_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
const ECDSA_WITH_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.4");

/// Display label for a distinguished name attribute type.
pub fn dn_label(oid: &ObjectIdentifier) -> Option<&'static str> {
    Some(match *oid {
        COMMON_NAME => "Common Name",
        COUNTRY => "Country",
        STATE => "State",
        LOCALITY => "City",
        ORGANIZATION => "Organization",
        ORGANIZATION_UNIT => "Organization Unit",
        STREET_ADDRESS => "Address",
        POSTAL_CODE => "Postal Code",
        USER_ID => "User ID",
        _ => return None,
    })
}

/// Display name for an extension.
pub fn extension_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    Some(match *oid {
        SUBJECT_KEY_IDENTIFIER => "Subject Key Identifier",
        KEY_USAGE => "Key Usage",
        SUBJECT_ALT_NAME => "Subject Alternative Name",
        BASIC_CONSTRAINTS => "Basic Constraints",
        CRL_DISTRIBUTION_POINTS => "CRL Distribution Points",
        CERTIFICATE_POLICIES => "Certificate Policies",
        AUTHORITY_KEY_IDENTIFIER => "Authority Key Identifier",
        EXTENDED_KEY_USAGE => "Extended Key Usage",
        AUTHORITY_INFO_ACCESS => "Authority Info Access",
        NF_TYPES => "NF Types",
        _ => return None,
    })
}

/// Display name for an extended key usage purpose.
pub fn key_purpose_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    Some(match *oid {
        rfc5912::ID_KP_SERVER_AUTH => "Server Auth",
        rfc5912::ID_KP_CLIENT_AUTH => "Client Auth",
        rfc5912::ID_KP_CODE_SIGNING => "Code Signing",
        rfc5912::ID_KP_EMAIL_PROTECTION => "Email Protection",
        rfc5912::ID_KP_TIME_STAMPING => "Time Stamping",
        rfc5912::ID_KP_OCSP_SIGNING => "OCSP Signing",
        _ => return None,
    })
}

/// Display name for a CSR attribute type.
pub fn attribute_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    Some(match *oid {
        CHALLENGE_PASSWORD => "challengePassword",
        UNSTRUCTURED_NAME => "unstructuredName",
        EXTENSION_REQUEST => "Requested Extensions",
        _ => return None,
    })
}

/// Display name for a signature or public key algorithm.
///
/// Falls back to the `const-oid` database and finally to the dotted form.
pub fn algorithm_name(oid: &ObjectIdentifier) -> String {
    let known = match *oid {
        RSA_ENCRYPTION => Some("rsaEncryption"),
        EC_PUBLIC_KEY => Some("ecPublicKey"),
        ED25519 => Some("Ed25519"),
        SHA1_WITH_RSA => Some("sha1WithRSAEncryption"),
        rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Some("sha256WithRSAEncryption"),
        SHA384_WITH_RSA => Some("sha384WithRSAEncryption"),
        SHA512_WITH_RSA => Some("sha512WithRSAEncryption"),
        RSASSA_PSS => Some("RSASSA-PSS"),
        rfc5912::ECDSA_WITH_SHA_256 => Some("ecdsa-with-SHA256"),
        ECDSA_WITH_SHA384 => Some("ecdsa-with-SHA384"),
        ECDSA_WITH_SHA512 => Some("ecdsa-with-SHA512"),
        _ => None,
    };
    known
        .or_else(|| const_oid::db::DB.by_oid(oid))
        .map(str::to_string)
        .unwrap_or_else(|| oid.to_string())
}

/// `label` if known, otherwise the dotted OID.
pub(crate) fn label_or_dotted(label: Option<&'static str>, oid: &ObjectIdentifier) -> String {
    label.map(str::to_string).unwrap_or_else(|| oid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registries() {
        assert_eq!(dn_label(&COMMON_NAME), Some("Common Name"));
        assert_eq!(dn_label(&LOCALITY), Some("City"));
        assert_eq!(extension_name(&NF_TYPES), Some("NF Types"));
        assert_eq!(
            key_purpose_name(&ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.1")),
            Some("Server Auth")
        );
        assert_eq!(
            key_purpose_name(&ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.9")),
            Some("OCSP Signing")
        );
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(algorithm_name(&RSA_ENCRYPTION), "rsaEncryption");
        assert_eq!(
            algorithm_name(&ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11")),
            "sha256WithRSAEncryption"
        );
        assert_eq!(
            algorithm_name(&ObjectIdentifier::new_unwrap("1.2.3.4.5.6.7")),
            "1.2.3.4.5.6.7"
        );
    }

    #[test]
    fn test_unknown_label_falls_back_to_dotted() {
        let oid = ObjectIdentifier::new_unwrap("2.5.4.42");
        assert_eq!(label_or_dotted(dn_label(&oid), &oid), "2.5.4.42");
    }
}
