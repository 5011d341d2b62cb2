//! Attribute schemas.
//!
//! A schema is an ordered list of typed fields, each owning a contiguous run
//! of bits in the packed word. The version tag is always the first field.
//! Offsets are computed once, here, and both the encoder and the decoder read
//! them from the [`FieldDescriptor`]s.

mod def;

pub use def::{FieldDef, SchemaDef};

use std::collections::HashSet;
use std::fmt::Write as _;

use alloy_primitives::U256;

use crate::error::SchemaError;
use crate::limits::{MAX_FIELD_NAME_LEN, VERSION_BITS, VERSION_FIELD, WORD_BITS};
use crate::model::{AttributeRecord, FieldKind, FieldValue};

/// A field with its resolved position in the word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    offset: u16,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn width(&self) -> u16 {
        self.kind.width()
    }

    /// Bit offset of the field's least significant bit.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// First bit past the field.
    pub fn end(&self) -> u16 {
        self.offset + self.width()
    }

    /// Mask covering the field's width, not shifted.
    pub fn mask(&self) -> U256 {
        width_mask(self.width())
    }
}

/// Returns `(1 << width) - 1`, saturating at a full word.
pub(crate) fn width_mask(width: u16) -> U256 {
    if width >= WORD_BITS {
        U256::MAX
    } else {
        (U256::from(1u8) << width as usize) - U256::from(1u8)
    }
}

/// An immutable, validated field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    version: u8,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Starts a schema with the given version tag.
    pub fn builder(version: u8) -> SchemaBuilder {
        SchemaBuilder::new(version)
    }

    /// Parses and validates a JSON schema definition.
    pub fn from_json(json: &str) -> Result<Schema, SchemaError> {
        let def: SchemaDef = serde_json::from_str(json).map_err(|e| SchemaError::Json(e.to_string()))?;
        Schema::try_from(def)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// All fields in declaration order, version tag first.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The version tag descriptor.
    pub fn version_field(&self) -> &FieldDescriptor {
        &self.fields[0]
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn width_of(&self, name: &str) -> Option<u16> {
        self.field(name).map(FieldDescriptor::width)
    }

    pub fn offset_of(&self, name: &str) -> Option<u16> {
        self.field(name).map(FieldDescriptor::offset)
    }

    /// Highest bit used by any field.
    pub fn total_bits(&self) -> u16 {
        self.fields.iter().map(FieldDescriptor::end).max().unwrap_or(0)
    }

    /// Mask of every bit owned by some field.
    pub fn used_mask(&self) -> U256 {
        self.fields
            .iter()
            .fold(U256::ZERO, |acc, f| acc | (f.mask() << f.offset() as usize))
    }

    /// The record every unwritten slot decodes to: all fields zero.
    pub fn default_record(&self) -> AttributeRecord {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), FieldValue::zero(f.kind)))
            .collect()
    }

    /// Renders the layout as one line per field: `[start..end) type name`.
    pub fn layout(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "schema v{} ({} of {} bits)", self.version, self.total_bits(), WORD_BITS);
        for f in &self.fields {
            let _ = writeln!(out, "  [{:>3}..{:>3}) {} {}", f.offset, f.end(), f.kind, f.name);
        }
        out
    }
}

/// Incrementally declares fields and validates the result.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    version: u8,
    fields: Vec<(String, FieldKind, Option<u16>)>,
}

impl SchemaBuilder {
    pub fn new(version: u8) -> Self {
        Self { version, fields: Vec::new() }
    }

    /// Appends a field packed directly after the previous one.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), kind, None));
        self
    }

    /// Appends a field at an explicit bit offset.
    ///
    /// The offset must not fall inside the previous field.
    pub fn field_at(mut self, name: impl Into<String>, kind: FieldKind, offset: u16) -> Self {
        self.fields.push((name.into(), kind, Some(offset)));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.version == 0 {
            return Err(SchemaError::ZeroVersion);
        }

        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push(FieldDescriptor {
            name: VERSION_FIELD.to_string(),
            kind: FieldKind::UInt(VERSION_BITS),
            offset: 0,
        });

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(VERSION_FIELD.to_string());
        let mut cursor: u16 = VERSION_BITS;

        for (name, kind, offset) in self.fields {
            validate_field_name(&name)?;
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateField { name });
            }
            if !kind.is_valid_width() {
                return Err(SchemaError::InvalidWidth { name, width: kind.width() });
            }

            let offset = match offset {
                Some(o) if o < cursor => {
                    return Err(SchemaError::OverlappingField { name, offset: o, previous_end: cursor });
                }
                Some(o) => o,
                None => cursor,
            };

            let end = offset as u32 + kind.width() as u32;
            if end > WORD_BITS as u32 {
                return Err(SchemaError::SchemaOverflow { field: name, end, max: WORD_BITS });
            }

            cursor = end as u16;
            fields.push(FieldDescriptor { name, kind, offset });
        }

        Ok(Schema { version: self.version, fields })
    }
}

/// Field names are ASCII identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_field_name(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = name.len() <= MAX_FIELD_NAME_LEN
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidFieldName { name: name.to_string() })
    }
}
