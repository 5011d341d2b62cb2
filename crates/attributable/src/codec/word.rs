//! Record <-> word conversion driven by a [`Schema`].

use alloy_primitives::U256;

use crate::codec::primitives::{WordReader, WordWriter};
use crate::error::{DecodeError, EncodeError};
use crate::model::{AttributeRecord, FieldKind, FieldValue, Word};
use crate::schema::Schema;

// =============================================================================
// ENCODING
// =============================================================================

/// Packs a record into a word.
///
/// Missing fields are written as zero and the version tag is always stamped
/// with the schema's version. Each value is masked to its field width, so an
/// oversized value silently loses its high bits; use
/// [`crate::validate::validate_record`] first if that is not wanted.
pub fn encode(schema: &Schema, record: &AttributeRecord) -> Result<Word, EncodeError> {
    for (name, _) in record.iter() {
        if schema.field(name).is_none() {
            return Err(EncodeError::UnknownField { name: name.to_string() });
        }
    }

    check_version_tag(schema, record)?;

    let mut writer = WordWriter::new();
    writer.put(schema.version_field(), U256::from(schema.version()));

    for field in &schema.fields()[1..] {
        let Some(value) = record.get(field.name()) else {
            continue;
        };
        if !value.matches(field.kind()) {
            return Err(EncodeError::TypeMismatch {
                field: field.name().to_string(),
                expected: field.kind(),
            });
        }
        if let (FieldValue::Bytes(bytes), FieldKind::Bytes(width)) = (value, field.kind()) {
            if bytes.len() < (width / 8) as usize {
                return Err(EncodeError::TypeMismatch {
                    field: field.name().to_string(),
                    expected: field.kind(),
                });
            }
        }
        writer.put(field, value.to_raw());
    }

    Ok(writer.finish())
}

/// Checks an explicit version tag in `record` against the schema version.
///
/// The tag is masked to its width before comparing, like any other field.
pub(crate) fn check_version_tag(schema: &Schema, record: &AttributeRecord) -> Result<(), EncodeError> {
    let field = schema.version_field();
    let Some(value) = record.get(field.name()) else {
        return Ok(());
    };
    if !value.matches(field.kind()) {
        return Err(EncodeError::TypeMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
        });
    }
    let found = value.to_raw() & field.mask();
    if found != U256::from(schema.version()) {
        return Err(EncodeError::VersionMismatch {
            expected: schema.version(),
            found: found.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Unpacks a word into a record holding every schema field.
///
/// The zero word is the state of a slot that was never written and decodes
/// to [`Schema::default_record`]. Any other word must carry the schema's
/// version tag and have no bits set outside the declared fields.
pub fn decode(schema: &Schema, word: Word) -> Result<AttributeRecord, DecodeError> {
    if word.is_zero() {
        return Ok(schema.default_record());
    }

    let reader = WordReader::new(word);
    let found = reader.get(schema.version_field()).to::<u8>();
    if found != schema.version() {
        return Err(DecodeError::VersionMismatch { expected: schema.version(), found });
    }

    if word & !schema.used_mask() != U256::ZERO {
        return Err(DecodeError::UnusedBitsSet);
    }

    Ok(schema
        .fields()
        .iter()
        .map(|f| (f.name().to_string(), FieldValue::from_raw(f.kind(), reader.get(f))))
        .collect())
}

/// Unpacks a word into `"<type> <name>:<value>"` entries joined by `;`.
///
/// Meant for display and debugging; the output is not parsed back.
pub fn decode_to_string(schema: &Schema, word: Word) -> Result<String, DecodeError> {
    let record = decode(schema, word)?;
    let parts: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| {
            let value = record
                .get(f.name())
                .cloned()
                .unwrap_or_else(|| FieldValue::zero(f.kind()));
            format!("{} {}:{}", f.kind(), f.name(), value)
        })
        .collect();
    Ok(parts.join(";"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_address;

    const WINNER: &str = "0x426eb88af949cd5bd8a272031badc2f80330e766";
    const PLAYER_WORD: &str = "106752917089902064595775439782685550631690247383499200986087937";

    fn player_schema() -> Schema {
        Schema::builder(1)
            .field("level", FieldKind::UInt(8))
            .field("stamina", FieldKind::UInt(32))
            .field("winner", FieldKind::Address)
            .build()
            .unwrap()
    }

    fn player_record() -> AttributeRecord {
        AttributeRecord::new()
            .with("version", 1u64)
            .with("level", 2u64)
            .with("stamina", 123432u64)
            .with("winner", parse_address(WINNER).unwrap())
    }

    #[test]
    fn test_player_word() {
        let word = encode(&player_schema(), &player_record()).unwrap();
        assert_eq!(word, U256::from_str_radix(PLAYER_WORD, 10).unwrap());
    }

    #[test]
    fn test_player_roundtrip() {
        let schema = player_schema();
        let record = player_record();
        let word = encode(&schema, &record).unwrap();
        assert_eq!(decode(&schema, word).unwrap(), record);
    }

    #[test]
    fn test_player_string() {
        let schema = player_schema();
        let word = encode(&schema, &player_record()).unwrap();
        assert_eq!(
            decode_to_string(&schema, word).unwrap(),
            "uint8 version:1;uint8 level:2;uint32 stamina:123432;address winner:0x426eb88af949cd5bd8a272031badc2f80330e766"
        );
    }

    #[test]
    fn test_version_is_stamped() {
        let schema = player_schema();
        let record = AttributeRecord::new().with("level", 7u64);
        let word = encode(&schema, &record).unwrap();
        let decoded = decode(&schema, word).unwrap();
        assert_eq!(decoded.get("version"), Some(&FieldValue::uint(1)));
        assert_eq!(decoded.get("level"), Some(&FieldValue::uint(7)));
        assert_eq!(decoded.get("stamina"), Some(&FieldValue::uint(0)));
    }

    #[test]
    fn test_truncation() {
        let schema = player_schema();
        let wide = encode(&schema, &AttributeRecord::new().with("level", 0x1ffu64)).unwrap();
        let narrow = encode(&schema, &AttributeRecord::new().with("level", 0xffu64)).unwrap();
        assert_eq!(wide, narrow);
        // The overflow did not leak into stamina
        let decoded = decode(&schema, wide).unwrap();
        assert_eq!(decoded.get("stamina"), Some(&FieldValue::uint(0)));
    }

    #[test]
    fn test_version_tag_is_truncated() {
        let schema = player_schema();
        let wide = encode(&schema, &AttributeRecord::new().with("version", 257u64).with("level", 2u64));
        let exact = encode(&schema, &AttributeRecord::new().with("version", 1u64).with("level", 2u64));
        assert_eq!(wide, exact);
        assert!(wide.is_ok());
    }

    #[test]
    fn test_short_bytes_rejected() {
        let schema = Schema::builder(1).field("tag", FieldKind::Bytes(32)).build().unwrap();
        let result = encode(&schema, &AttributeRecord::new().with("tag", FieldValue::Bytes(vec![0xab])));
        assert!(matches!(
            result,
            Err(EncodeError::TypeMismatch { expected: FieldKind::Bytes(32), .. })
        ));
    }

    #[test]
    fn test_long_bytes_keep_low_bytes() {
        let schema = Schema::builder(1).field("tag", FieldKind::Bytes(16)).build().unwrap();
        let long = AttributeRecord::new().with("tag", FieldValue::Bytes(vec![0x01, 0xbe, 0xef]));
        let exact = AttributeRecord::new().with("tag", FieldValue::Bytes(vec![0xbe, 0xef]));
        assert_eq!(encode(&schema, &long).unwrap(), encode(&schema, &exact).unwrap());
    }

    #[test]
    fn test_zero_word_decodes_to_default() {
        let schema = player_schema();
        assert_eq!(decode(&schema, U256::ZERO).unwrap(), schema.default_record());
        assert_eq!(
            decode_to_string(&schema, U256::ZERO).unwrap(),
            "uint8 version:0;uint8 level:0;uint32 stamina:0;address winner:0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_unknown_field() {
        let result = encode(&player_schema(), &AttributeRecord::new().with("mana", 1u64));
        assert_eq!(result, Err(EncodeError::UnknownField { name: "mana".to_string() }));
    }

    #[test]
    fn test_type_mismatch() {
        let result = encode(&player_schema(), &AttributeRecord::new().with("winner", 5u64));
        assert!(matches!(
            result,
            Err(EncodeError::TypeMismatch { expected: FieldKind::Address, .. })
        ));
    }

    #[test]
    fn test_record_version_mismatch() {
        let result = encode(&player_schema(), &AttributeRecord::new().with("version", 2u64));
        assert!(matches!(result, Err(EncodeError::VersionMismatch { expected: 1, .. })));

        let result = encode(&player_schema(), &AttributeRecord::new().with("version", true));
        assert!(matches!(result, Err(EncodeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_decode_version_mismatch() {
        let v1 = player_schema();
        let v2 = Schema::builder(2)
            .field("level", FieldKind::UInt(8))
            .build()
            .unwrap();
        let word = encode(&v1, &player_record()).unwrap();
        assert_eq!(
            decode(&v2, word),
            Err(DecodeError::VersionMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_decode_rejects_unused_bits() {
        let schema = player_schema();
        let word = encode(&schema, &player_record()).unwrap() | (U256::from(1u8) << 255usize);
        assert_eq!(decode(&schema, word), Err(DecodeError::UnusedBitsSet));
    }

    #[test]
    fn test_bool_and_bytes_fields() {
        let schema = Schema::builder(4)
            .field("alive", FieldKind::Bool)
            .field("tag", FieldKind::Bytes(32))
            .build()
            .unwrap();
        let record = AttributeRecord::new()
            .with("version", 4u64)
            .with("alive", true)
            .with("tag", FieldValue::Bytes(vec![0xca, 0xfe, 0xba, 0xbe]));
        let word = encode(&schema, &record).unwrap();
        assert_eq!(decode(&schema, word).unwrap(), record);
        assert_eq!(
            decode_to_string(&schema, word).unwrap(),
            "uint8 version:4;bool alive:true;bytes4 tag:0xcafebabe"
        );
    }

    #[test]
    fn test_full_width_uint() {
        let schema = Schema::builder(1)
            .field("big", FieldKind::UInt(248))
            .build()
            .unwrap();
        let max = (U256::from(1u8) << 248usize) - U256::from(1u8);
        let record = AttributeRecord::new().with("version", 1u64).with("big", max);
        let word = encode(&schema, &record).unwrap();
        assert_eq!(word, (max << 8usize) | U256::from(1u8));
        assert_eq!(decode(&schema, word).unwrap(), record);
    }
}
