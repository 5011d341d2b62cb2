//! Serializable schema definitions.
//!
//! ```json
//! {
//!   "version": 1,
//!   "fields": [
//!     { "name": "level", "type": "uint8" },
//!     { "name": "winner", "type": "address", "offset": 48 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::model::FieldKind;
use crate::schema::{Schema, SchemaBuilder};

/// A schema as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub version: u8,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// One declared field. The version tag is implicit and must not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u16>,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        let mut builder = SchemaBuilder::new(def.version);
        for field in def.fields {
            let kind: FieldKind = field.ty.parse().map_err(|ty| SchemaError::UnknownType { ty })?;
            builder = match field.offset {
                Some(offset) => builder.field_at(field.name, kind, offset),
                None => builder.field(field.name, kind),
            };
        }
        builder.build()
    }
}

impl From<&Schema> for SchemaDef {
    /// Offsets are only written out for fields that are not densely packed.
    fn from(schema: &Schema) -> Self {
        let mut cursor = schema.version_field().end();
        let mut fields = Vec::new();
        for f in schema.fields().iter().skip(1) {
            let offset = (f.offset() != cursor).then_some(f.offset());
            cursor = f.end();
            fields.push(FieldDef { name: f.name().to_string(), ty: f.kind().to_string(), offset });
        }
        SchemaDef { version: schema.version(), fields }
    }
}
