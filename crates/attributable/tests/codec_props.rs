//! Property tests for the codec laws.

use attributable::{decode, encode, Address, AttributeRecord, EncodeError, FieldKind, FieldValue, Schema, U256};
use proptest::prelude::*;

fn mask(width: u16) -> U256 {
    if width >= 256 {
        U256::MAX
    } else {
        (U256::from(1u8) << width as usize) - U256::from(1u8)
    }
}

fn arb_u256() -> impl Strategy<Value = U256> {
    any::<[u64; 4]>().prop_map(U256::from_limbs)
}

fn arb_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Bool),
        Just(FieldKind::Address),
        (1u16..=64).prop_map(FieldKind::UInt),
        (1u16..=8).prop_map(|n| FieldKind::Bytes(n * 8)),
    ]
}

/// Schemas whose fields fit in what is left after the version tag.
fn arb_schema() -> impl Strategy<Value = Schema> {
    (1u8..=255, prop::collection::vec(arb_kind(), 0..6)).prop_map(|(version, kinds)| {
        let mut builder = Schema::builder(version);
        let mut used = 8u16;
        for (i, kind) in kinds.into_iter().enumerate() {
            if used + kind.width() > 256 {
                break;
            }
            used += kind.width();
            builder = builder.field(format!("f{i}"), kind);
        }
        builder.build().unwrap()
    })
}

/// A value of `kind` that fits its width.
fn in_range_value(kind: FieldKind, raw: U256, bytes: &[u8]) -> FieldValue {
    match kind {
        FieldKind::Bool => FieldValue::Bool(raw.bit(0)),
        FieldKind::UInt(w) => FieldValue::UInt(raw & mask(w)),
        FieldKind::Address => FieldValue::Address(Address::from_slice(&bytes[..20])),
        FieldKind::Bytes(w) => FieldValue::Bytes(bytes[..(w / 8) as usize].to_vec()),
    }
}

fn arb_schema_and_record() -> impl Strategy<Value = (Schema, AttributeRecord)> {
    arb_schema().prop_flat_map(|schema| {
        let n = schema.fields().len();
        (
            Just(schema),
            prop::collection::vec(arb_u256(), n),
            prop::collection::vec(any::<[u8; 32]>(), n),
        )
            .prop_map(|(schema, raws, bytes)| {
                let mut record = AttributeRecord::new().with("version", schema.version() as u64);
                for (i, f) in schema.fields().iter().enumerate().skip(1) {
                    record.set(f.name(), in_range_value(f.kind(), raws[i], &bytes[i]));
                }
                (schema, record)
            })
    })
}

proptest! {
    #[test]
    fn prop_roundtrip((schema, record) in arb_schema_and_record()) {
        let word = encode(&schema, &record).unwrap();
        prop_assert_eq!(decode(&schema, word).unwrap(), record);
    }

    #[test]
    fn prop_truncation(width in 1u16..=248, value in arb_u256()) {
        let schema = Schema::builder(1).field("x", FieldKind::UInt(width)).build().unwrap();
        let wide = encode(&schema, &AttributeRecord::new().with("x", value)).unwrap();
        let narrow = encode(&schema, &AttributeRecord::new().with("x", value & mask(width))).unwrap();
        prop_assert_eq!(wide, narrow);
    }

    #[test]
    fn prop_encoded_word_stays_in_layout((schema, record) in arb_schema_and_record()) {
        let word = encode(&schema, &record).unwrap();
        prop_assert_eq!(word & !schema.used_mask(), U256::ZERO);
    }

    #[test]
    fn prop_short_bytes_rejected(len in 1u16..=31, bytes in any::<[u8; 32]>(), short in 0usize..32) {
        let short = short % len as usize;
        let schema = Schema::builder(1).field("tag", FieldKind::Bytes(len * 8)).build().unwrap();
        let record = AttributeRecord::new().with("tag", FieldValue::Bytes(bytes[..short].to_vec()));
        let is_type_mismatch = matches!(encode(&schema, &record), Err(EncodeError::TypeMismatch { .. }));
        prop_assert!(is_type_mismatch);
    }

    #[test]
    fn prop_long_bytes_truncate_to_tail(len in 1u16..=31, bytes in any::<[u8; 32]>()) {
        let schema = Schema::builder(1).field("tag", FieldKind::Bytes(len * 8)).build().unwrap();
        let n = len as usize;
        let long = encode(&schema, &AttributeRecord::new().with("tag", FieldValue::Bytes(bytes.to_vec())));
        let tail = encode(&schema, &AttributeRecord::new().with("tag", FieldValue::Bytes(bytes[32 - n..].to_vec())));
        prop_assert_eq!(long, tail);
    }

    #[test]
    fn prop_zero_word_is_default(schema in arb_schema()) {
        prop_assert_eq!(decode(&schema, U256::ZERO).unwrap(), schema.default_record());
    }
}
