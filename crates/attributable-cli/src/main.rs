//! `attrs`: off-chain tooling for packed attribute words.
//!
//! Schemas and records are JSON files:
//!
//! ```text
//! attrs layout player.json
//! attrs encode player.json record.json --strict
//! attrs decode player.json 106752917089902064595775439782685550631690247383499200986087937
//! attrs interface-id
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::hex;
use anyhow::{anyhow, bail, Context, Result};
use attributable::capability::{ATTRIBUTE_STORE, ATTRIBUTE_WRITER, ERC165};
use attributable::{
    decode, decode_to_string, encode, parse_address, selector, validate_record, AttributeRecord, FieldKind,
    FieldValue, InterfaceId, Schema, U256,
};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value as Json};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "attrs", version, about = "Inspect, encode and decode packed attribute words")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bit layout of a schema
    Layout {
        schema: PathBuf,
    },
    /// Pack a JSON record into a word
    Encode {
        schema: PathBuf,
        record: PathBuf,
        /// Reject values that would be truncated
        #[arg(long)]
        strict: bool,
    },
    /// Unpack a word (decimal or 0x-hex)
    Decode {
        schema: PathBuf,
        word: String,
        /// Print the record as JSON instead of the `type name:value` form
        #[arg(long)]
        json: bool,
    },
    /// Print the interface ids of the published surfaces
    InterfaceId,
    /// Print the 4-byte selector of a method signature
    Selector {
        signature: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Layout { schema } => {
            let schema = load_schema(&schema)?;
            print!("{}", schema.layout());
        }
        Command::Encode { schema, record, strict } => {
            let schema = load_schema(&schema)?;
            let json = fs::read_to_string(&record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let record = record_from_json(&schema, &serde_json::from_str(&json)?)?;
            if strict {
                validate_record(&schema, &record)?;
            }
            let word = encode(&schema, &record)?;
            println!("{word}");
            println!("{word:#x}");
        }
        Command::Decode { schema, word, json } => {
            let schema = load_schema(&schema)?;
            let word = parse_word(&word)?;
            if json {
                let record = decode(&schema, word)?;
                println!("{}", serde_json::to_string_pretty(&record_to_json(&schema, &record))?);
            } else {
                println!("{}", decode_to_string(&schema, word)?);
            }
        }
        Command::InterfaceId => {
            println!("erc165           {}", *ERC165);
            println!("attribute-store  {}", *ATTRIBUTE_STORE);
            println!("attribute-writer {}", *ATTRIBUTE_WRITER);
        }
        Command::Selector { signature } => {
            println!("{}", InterfaceId(selector(&signature)));
        }
    }

    Ok(())
}

fn load_schema(path: &Path) -> Result<Schema> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let schema = Schema::from_json(&json).with_context(|| format!("invalid schema {}", path.display()))?;
    debug!(version = schema.version(), bits = schema.total_bits(), "schema loaded");
    Ok(schema)
}

fn parse_word(s: &str) -> Result<U256> {
    let word = match s.strip_prefix("0x") {
        Some(digits) => U256::from_str_radix(digits, 16),
        None => U256::from_str_radix(s, 10),
    };
    word.map_err(|e| anyhow!("invalid word '{s}': {e}"))
}

/// Reads a JSON object into a record, typing each value by its schema field.
fn record_from_json(schema: &Schema, json: &Json) -> Result<AttributeRecord> {
    let object = json.as_object().ok_or_else(|| anyhow!("record must be a JSON object"))?;
    let mut record = AttributeRecord::new();
    for (name, value) in object {
        let field = schema
            .field(name)
            .ok_or_else(|| anyhow!("field '{name}' is not in the schema"))?;
        let value = match (field.kind(), value) {
            (FieldKind::Bool, Json::Bool(b)) => FieldValue::Bool(*b),
            (FieldKind::UInt(_), Json::Number(n)) => {
                let n = n
                    .as_u64()
                    .ok_or_else(|| anyhow!("field '{name}' must be a non-negative integer"))?;
                FieldValue::uint(n)
            }
            (FieldKind::UInt(_), Json::String(s)) => FieldValue::UInt(parse_word(s)?),
            (FieldKind::Address, Json::String(s)) => {
                FieldValue::Address(parse_address(s).ok_or_else(|| anyhow!("invalid address '{s}'"))?)
            }
            (FieldKind::Bytes(_), Json::String(s)) => {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                FieldValue::Bytes(hex::decode(digits).with_context(|| format!("invalid bytes '{s}'"))?)
            }
            (kind, other) => bail!("field '{name}' expects {kind}, got {other}"),
        };
        record.set(name.as_str(), value);
    }
    Ok(record)
}

/// Writes a record as a JSON object in schema order. Integers that do not fit
/// in a u64 are emitted as decimal strings.
fn record_to_json(schema: &Schema, record: &AttributeRecord) -> Json {
    let mut object = Map::new();
    for field in schema.fields() {
        let value = match record.get(field.name()) {
            Some(FieldValue::Bool(b)) => Json::Bool(*b),
            Some(FieldValue::UInt(v)) => match u64::try_from(*v) {
                Ok(small) => Json::from(small),
                Err(_) => Json::String(v.to_string()),
            },
            Some(other) => Json::String(other.to_string()),
            None => Json::Null,
        };
        object.insert(field.name().to_string(), value);
    }
    Json::Object(object)
}
