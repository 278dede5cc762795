use serde::Serialize;
use sha1::Sha1;
use sha2::Sha256;

use crate::text::hex_colon;

/// Digests of the decoded DER, as colon-separated lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub sha1: String,
    pub sha256: String,
}

impl Fingerprints {
    pub fn of(der: &[u8]) -> Self {
        let sha1 = <Sha1 as sha1::Digest>::digest(der);
        let sha256 = <Sha256 as sha2::Digest>::digest(der);
        Self {
            sha1: hex_colon(&sha1),
            sha256: hex_colon(&sha256),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_digests() {
        let fp = Fingerprints::of(&[]);
        assert_eq!(
            fp.sha1,
            "da:39:a3:ee:5e:6b:4b:0d:32:55:bf:ef:95:60:18:90:af:d8:07:09"
        );
        assert!(fp.sha256.starts_with("e3:b0:c4:42:98:fc:1c:14"));
        assert_eq!(fp.sha256.len(), 32 * 3 - 1);
    }
}
