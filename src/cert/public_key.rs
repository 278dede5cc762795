use const_oid::ObjectIdentifier;
use tracing::{debug, warn};

use crate::asn1::{self, Asn1Tree, AsnNode};
use crate::config::DecodeLimits;
use crate::error::SchemaError;
use crate::oid;

/// An `AlgorithmIdentifier`; parameters are not interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub oid: ObjectIdentifier,
}

impl AlgorithmIdentifier {
    /// Human-readable algorithm name, or the dotted OID.
    pub fn name(&self) -> String {
        oid::algorithm_name(&self.oid)
    }

    pub(crate) fn decode<'a>(
        tree: &Asn1Tree<'a>,
        node: &AsnNode<'a>,
        field: &'static str,
    ) -> Result<Self, SchemaError> {
        let mut seq = tree.sequence(node, field)?;
        let oid = seq.required("algorithm")?.as_oid("algorithm")?;
        Ok(Self { oid })
    }
}

/// RSA public key components, as encoded.
///
/// # Fields
/// * `modulus` - INTEGER content octets, including any leading zero octet.
/// * `public_exponent` - INTEGER content octets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub modulus: Vec<u8>,
    pub public_exponent: Vec<u8>,
}

impl RsaPublicKey {
    /// Bit length of the modulus, ignoring leading zero octets.
    pub fn bits(&self) -> usize {
        match self.modulus.iter().position(|b| *b != 0) {
            Some(i) => {
                let significant = self.modulus.len() - i;
                (significant - 1) * 8 + (8 - self.modulus[i].leading_zeros() as usize)
            }
            None => 0,
        }
    }

    /// The public exponent, if it fits in 64 bits.
    pub fn exponent(&self) -> Option<u64> {
        asn1::unsigned_be(&self.public_exponent)
    }

    /// Decodes `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`.
    pub fn from_der(der: &[u8], limits: &DecodeLimits) -> Result<Self, SchemaError> {
        let tree = asn1::decode(der, limits).map_err(|e| SchemaError::InvalidValue {
            field: "subjectPublicKey",
            reason: e.to_string(),
        })?;
        let mut seq = tree.sequence(tree.root(), "RSAPublicKey")?;
        let modulus = seq.required("modulus")?.as_integer_bytes("modulus")?;
        let public_exponent = seq
            .required("publicExponent")?
            .as_integer_bytes("publicExponent")?;
        Ok(Self {
            modulus: modulus.to_vec(),
            public_exponent: public_exponent.to_vec(),
        })
    }
}

/// Subject public key material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// `rsaEncryption` key split into modulus and exponent.
    Rsa(RsaPublicKey),
    /// Any other key, or an RSA key that failed to decode, as raw octets.
    Raw(Vec<u8>),
}

/// Splits the key material for algorithms that have a known structure.
///
/// Only RSA is decomposed; every other algorithm yields `UnsupportedKeyAlgorithm`.
pub fn decompose(
    algorithm: &ObjectIdentifier,
    key: &[u8],
    limits: &DecodeLimits,
) -> Result<RsaPublicKey, SchemaError> {
    if *algorithm != oid::RSA_ENCRYPTION {
        return Err(SchemaError::UnsupportedKeyAlgorithm(algorithm.to_string()));
    }
    RsaPublicKey::from_der(key, limits)
}

/// A decoded `SubjectPublicKeyInfo`.
///
/// # Fields
/// * `algorithm` - The key algorithm.
/// * `key_bytes` - The subjectPublicKey BIT STRING content, unused-bits octet removed.
/// * `public_key` - The decomposed key when the algorithm is understood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    pub key_bytes: Vec<u8>,
    pub public_key: PublicKey,
}

impl SubjectPublicKeyInfo {
    pub(crate) fn decode<'a>(
        tree: &Asn1Tree<'a>,
        node: &AsnNode<'a>,
        limits: &DecodeLimits,
    ) -> Result<Self, SchemaError> {
        let mut seq = tree.sequence(node, "subjectPublicKeyInfo")?;
        let algorithm = AlgorithmIdentifier::decode(tree, seq.required("algorithm")?, "algorithm")?;
        let (_, key) = seq
            .required("subjectPublicKey")?
            .as_bit_string("subjectPublicKey")?;

        let public_key = match decompose(&algorithm.oid, key, limits) {
            Ok(rsa) => PublicKey::Rsa(rsa),
            Err(SchemaError::UnsupportedKeyAlgorithm(alg)) => {
                debug!(algorithm = %alg, "public key kept as raw octets");
                PublicKey::Raw(key.to_vec())
            }
            Err(err) => {
                warn!(error = %err, "RSA public key could not be decomposed");
                PublicKey::Raw(key.to_vec())
            }
        };

        Ok(Self {
            algorithm,
            key_bytes: key.to_vec(),
            public_key,
        })
    }
}
