//! Strict validation of records before encoding.
//!
//! Encoding truncates oversized values on purpose. Callers that would rather
//! reject them run [`validate_record`] first.

use alloy_primitives::U256;

use crate::codec;
use crate::error::{EncodeError, ValidationError};
use crate::model::{AttributeRecord, FieldKind, FieldValue};
use crate::schema::Schema;

/// Checks that every value in the record names a schema field, has the
/// field's kind, and fits in the field's width without truncation. An
/// explicit version tag must also equal the schema version.
pub fn validate_record(schema: &Schema, record: &AttributeRecord) -> Result<(), ValidationError> {
    for (name, value) in record.iter() {
        let field = schema
            .field(name)
            .ok_or_else(|| EncodeError::UnknownField { name: name.to_string() })?;

        if !value.matches(field.kind()) {
            return Err(EncodeError::TypeMismatch {
                field: name.to_string(),
                expected: field.kind(),
            }
            .into());
        }

        match (value, field.kind()) {
            (FieldValue::UInt(v), FieldKind::UInt(width)) => {
                if !fits(*v, width) {
                    return Err(ValidationError::ValueOutOfRange {
                        field: name.to_string(),
                        width,
                    });
                }
            }
            (FieldValue::Bytes(bytes), FieldKind::Bytes(width)) => {
                let expected = (width / 8) as usize;
                if bytes.len() != expected {
                    return Err(ValidationError::BytesLength {
                        field: name.to_string(),
                        expected,
                        actual: bytes.len(),
                    });
                }
            }
            _ => {}
        }
    }
    codec::word::check_version_tag(schema, record)?;
    Ok(())
}

fn fits(value: U256, width: u16) -> bool {
    value.bit_len() <= width as usize
}
