//! Typed readers for primitive node values.

use const_oid::ObjectIdentifier;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

use super::{AsnNode, tags};
use crate::error::SchemaError;

impl<'a> AsnNode<'a> {
    /// Fails with `UnexpectedTag` unless this node carries the universal tag `number`.
    pub fn expect_universal(&self, field: &'static str, number: u32) -> Result<(), SchemaError> {
        if self.tag.is_universal(number) {
            Ok(())
        } else {
            Err(SchemaError::UnexpectedTag {
                field,
                expected: tags::name(number).unwrap_or("universal tag"),
                found: self.tag.to_string(),
            })
        }
    }

    pub fn as_oid(&self, field: &'static str) -> Result<ObjectIdentifier, SchemaError> {
        self.expect_universal(field, tags::OID)?;
        ObjectIdentifier::from_bytes(self.value).map_err(|e| invalid(field, e))
    }

    pub fn as_boolean(&self, field: &'static str) -> Result<bool, SchemaError> {
        self.expect_universal(field, tags::BOOLEAN)?;
        match self.value {
            [b] => Ok(*b != 0),
            _ => Err(invalid(field, "BOOLEAN must be one octet")),
        }
    }

    /// INTEGER content octets exactly as encoded, sign octet included.
    pub fn as_integer_bytes(&self, field: &'static str) -> Result<&'a [u8], SchemaError> {
        self.expect_universal(field, tags::INTEGER)?;
        if self.value.is_empty() {
            return Err(invalid(field, "empty INTEGER"));
        }
        Ok(self.value)
    }

    /// A non-negative INTEGER that fits in 64 bits.
    pub fn as_u64(&self, field: &'static str) -> Result<u64, SchemaError> {
        let bytes = self.as_integer_bytes(field)?;
        unsigned_be(bytes).ok_or_else(|| invalid(field, "INTEGER is negative or too large"))
    }

    /// BIT STRING as (unused bit count, content octets).
    pub fn as_bit_string(&self, field: &'static str) -> Result<(u8, &'a [u8]), SchemaError> {
        self.expect_universal(field, tags::BIT_STRING)?;
        match self.value.split_first() {
            Some((&unused, bits)) if unused < 8 => Ok((unused, bits)),
            Some(_) => Err(invalid(field, "unused bit count above 7")),
            None => Err(invalid(field, "empty BIT STRING")),
        }
    }

    pub fn as_octet_string(&self, field: &'static str) -> Result<&'a [u8], SchemaError> {
        self.expect_universal(field, tags::OCTET_STRING)?;
        Ok(self.value)
    }

    /// True if this node holds one of the character string types.
    pub fn is_string(&self) -> bool {
        self.tag.class == super::TagClass::Universal
            && matches!(
                self.tag.number,
                tags::UTF8_STRING
                    | tags::NUMERIC_STRING
                    | tags::PRINTABLE_STRING
                    | tags::T61_STRING
                    | tags::IA5_STRING
                    | tags::VISIBLE_STRING
                    | tags::UNIVERSAL_STRING
                    | tags::BMP_STRING
            )
    }

    /// Decodes any character string type into a Rust `String`.
    pub fn as_string(&self, field: &'static str) -> Result<String, SchemaError> {
        if !self.is_string() {
            return Err(SchemaError::UnexpectedTag {
                field,
                expected: "string",
                found: self.tag.to_string(),
            });
        }
        match self.tag.number {
            // TeletexString: treat as Latin-1
            tags::T61_STRING => Ok(self.value.iter().map(|&b| char::from(b)).collect()),
            tags::BMP_STRING => {
                if self.value.len() % 2 != 0 {
                    return Err(invalid(field, "odd BMPString length"));
                }
                let units: Vec<u16> = self
                    .value
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| invalid(field, e))
            }
            tags::UNIVERSAL_STRING => {
                if self.value.len() % 4 != 0 {
                    return Err(invalid(field, "UniversalString length not a multiple of 4"));
                }
                self.value
                    .chunks_exact(4)
                    .map(|c| {
                        char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                            .ok_or_else(|| invalid(field, "invalid UniversalString code point"))
                    })
                    .collect()
            }
            _ => String::from_utf8(self.value.to_vec()).map_err(|e| invalid(field, e)),
        }
    }

    /// UTCTime or GeneralizedTime as a UTC timestamp.
    pub fn as_time(&self, field: &'static str) -> Result<OffsetDateTime, SchemaError> {
        let generalized = if self.tag.is_universal(tags::UTC_TIME) {
            false
        } else if self.tag.is_universal(tags::GENERALIZED_TIME) {
            true
        } else {
            return Err(SchemaError::UnexpectedTag {
                field,
                expected: "UTCTime or GeneralizedTime",
                found: self.tag.to_string(),
            });
        };
        let text = std::str::from_utf8(self.value).map_err(|e| invalid(field, e))?;
        parse_time(text, generalized).map_err(|reason| invalid(field, reason))
    }
}

/// Big-endian unsigned value of INTEGER content octets, if it fits in a `u64`.
pub(crate) fn unsigned_be(bytes: &[u8]) -> Option<u64> {
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        return None;
    }
    let significant: &[u8] = match bytes.iter().position(|b| *b != 0) {
        Some(i) => &bytes[i..],
        None => &[],
    };
    if significant.len() > 8 {
        return None;
    }
    Some(
        significant
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
    )
}

fn invalid(field: &'static str, reason: impl ToString) -> SchemaError {
    SchemaError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

/// Parses "YYMMDDHHMMSSZ" (UTCTime) or "YYYYMMDDHHMMSS[.fff]Z" (GeneralizedTime).
/// UTCTime years 00-49 map to 20xx, 50-99 to 19xx.
fn parse_time(text: &str, generalized: bool) -> Result<OffsetDateTime, String> {
    let body = text
        .strip_suffix('Z')
        .ok_or_else(|| format!("time '{text}' is not in UTC"))?;
    let body = match body.split_once('.') {
        Some((whole, fraction))
            if generalized && !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            whole
        }
        Some(_) => return Err(format!("malformed fractional seconds in '{text}'")),
        None => body,
    };

    let expected_len = if generalized { 14 } else { 12 };
    if body.len() != expected_len || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("malformed time '{text}'"));
    }

    let digits = body.as_bytes();
    let num = |range: std::ops::Range<usize>| {
        digits[range]
            .iter()
            .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'))
    };

    let (year, rest) = if generalized {
        (num(0..4) as i32, 4)
    } else {
        let yy = num(0..2);
        ((if yy < 50 { 2000 + yy } else { 1900 + yy }) as i32, 2)
    };
    let month = Month::try_from(num(rest..rest + 2) as u8).map_err(|e| e.to_string())?;
    let day = num(rest + 2..rest + 4) as u8;
    let hour = num(rest + 4..rest + 6) as u8;
    let minute = num(rest + 6..rest + 8) as u8;
    let second = num(rest + 8..rest + 10) as u8;

    let date = Date::from_calendar_date(year, month, day).map_err(|e| e.to_string())?;
    let time = Time::from_hms(hour, minute, second).map_err(|e| e.to_string())?;
    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::decode;
    use crate::config::DecodeLimits;
    use time::macros::datetime;

    fn with_node<R>(data: &[u8], f: impl FnOnce(&AsnNode<'_>) -> R) -> R {
        let tree = decode(data, &DecodeLimits::default()).unwrap();
        f(tree.root())
    }

    #[test]
    fn test_oid() {
        // 2.5.29.17
        let oid = with_node(&[0x06, 0x03, 0x55, 0x1D, 0x11], |n| n.as_oid("oid").unwrap());
        assert_eq!(oid.to_string(), "2.5.29.17");
    }

    #[test]
    fn test_wrong_tag_reports_field() {
        let err = with_node(&[0x02, 0x01, 0x01], |n| n.as_oid("extnID").unwrap_err());
        assert_eq!(
            err,
            SchemaError::UnexpectedTag {
                field: "extnID",
                expected: "OBJECT IDENTIFIER",
                found: "INTEGER".to_string(),
            }
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            with_node(&[0x02, 0x03, 0x01, 0x00, 0x01], |n| n.as_u64("e").unwrap()),
            65537
        );
        assert_eq!(
            with_node(&[0x02, 0x02, 0x00, 0xFF], |n| n.as_u64("e").unwrap()),
            255
        );
        assert!(with_node(&[0x02, 0x01, 0x80], |n| n.as_u64("e").is_err()));
        assert!(unsigned_be(&[0x00; 12]).is_some());
        assert!(unsigned_be(&[0x01; 9]).is_none());
    }

    #[test]
    fn test_bit_string() {
        let (unused, bits) =
            with_node(&[0x03, 0x02, 0x05, 0xA0], |n| {
                let (u, b) = n.as_bit_string("ku").unwrap();
                (u, b.to_vec())
            });
        assert_eq!(unused, 5);
        assert_eq!(bits, vec![0xA0]);
        assert!(with_node(&[0x03, 0x00], |n| n.as_bit_string("ku").is_err()));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            with_node(&[0x13, 0x02, b'U', b'S'], |n| n.as_string("c").unwrap()),
            "US"
        );
        // BMPString "Hi"
        assert_eq!(
            with_node(&[0x1E, 0x04, 0x00, b'H', 0x00, b'i'], |n| n
                .as_string("cn")
                .unwrap()),
            "Hi"
        );
        // TeletexString with a Latin-1 octet
        assert_eq!(
            with_node(&[0x14, 0x01, 0xE9], |n| n.as_string("cn").unwrap()),
            "\u{e9}"
        );
        assert!(with_node(&[0x04, 0x01, 0x41], |n| n.as_string("cn").is_err()));
    }

    #[test]
    fn test_utc_time() {
        let t = with_node(b"\x17\x0d300101000000Z", |n| n.as_time("notBefore").unwrap());
        assert_eq!(t, datetime!(2030-01-01 00:00:00 UTC));
        let t = with_node(b"\x17\x0d991231235959Z", |n| n.as_time("notBefore").unwrap());
        assert_eq!(t, datetime!(1999-12-31 23:59:59 UTC));
    }

    #[test]
    fn test_generalized_time() {
        let t = with_node(b"\x18\x0f20500615120000Z", |n| n.as_time("notAfter").unwrap());
        assert_eq!(t, datetime!(2050-06-15 12:00:00 UTC));
        let t = with_node(b"\x18\x1220500615120000.25Z", |n| n.as_time("notAfter").unwrap());
        assert_eq!(t, datetime!(2050-06-15 12:00:00 UTC));
    }

    #[test]
    fn test_bad_times() {
        assert!(with_node(b"\x17\x0d301301000000Z", |n| n.as_time("t").is_err()));
        assert!(with_node(b"\x17\x0c300101000000", |n| n.as_time("t").is_err()));
        assert!(with_node(b"\x17\x0b3001010000Z", |n| n.as_time("t").is_err()));
    }
}
