//! Decoding of fetched JSON into content blocks.
//!
//! The payload must be an array of objects, each with a string `type`.
//! Anything else is a [`DecodeError`]. Inside that shape decoding is lenient:
//! unknown types become [`ContentBlock::Extension`]. Optional fields of the
//! wrong shape are dropped, and a recognised type whose required fields do
//! not fit is demoted to an extension. Both are reported as a
//! [`DecodeWarning`] instead of failing the whole guide. Headings are never
//! demoted.

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{CalloutTone, ContentBlock, heading_kind, heading_level_of};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of blocks, got {0}")]
    NotAnArray(&'static str),
    #[error("block {index} is not an object with a string `type` field")]
    MissingType { index: usize },
}

/// A block that decoded with problems: some fields were ignored, or the
/// whole block was kept as opaque data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeWarning {
    pub index: usize,
    pub kind: String,
    pub reason: String,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} (`{}`): {}", self.index, self.kind, self.reason)
    }
}

/// A decoded block sequence, in document order.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub blocks: Vec<ContentBlock>,
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a JSON value holding an array of blocks.
pub fn decode_blocks(value: Value) -> Result<Decoded, DecodeError> {
    let elements = match value {
        Value::Array(elements) => elements,
        other => return Err(DecodeError::NotAnArray(json_kind(&other))),
    };

    let mut decoded = Decoded {
        blocks: Vec::with_capacity(elements.len()),
        warnings: Vec::new(),
    };
    for (index, element) in elements.into_iter().enumerate() {
        let Value::Object(fields) = element else {
            return Err(DecodeError::MissingType { index });
        };
        let Some((block, notes)) = decode_object(fields) else {
            return Err(DecodeError::MissingType { index });
        };
        decoded
            .warnings
            .extend(notes.into_iter().map(|reason| DecodeWarning {
                index,
                kind: block.kind().to_string(),
                reason,
            }));
        decoded.blocks.push(block);
    }
    Ok(decoded)
}

/// Parse and decode a JSON document.
pub fn decode_str(json: &str) -> Result<Decoded, DecodeError> {
    decode_blocks(serde_json::from_str(json)?)
}

// ---------------------------------------------------------------------------
// Per-block decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TextFields {
    text: String,
}

#[derive(Deserialize)]
struct ListFields {
    items: Vec<String>,
}

#[derive(Deserialize)]
struct ImageFields {
    src: String,
    alt: String,
}

/// Problems that cost a block some of its fields but not its type.
type Notes = Vec<String>;

/// Decode one object. Returns `None` when there is no string `type`.
fn decode_object(mut fields: Map<String, Value>) -> Option<(ContentBlock, Notes)> {
    let kind = match fields.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        _ => return None,
    };
    let mut notes = Notes::new();

    let typed = match (heading_level_of(&kind), kind.as_str()) {
        (Some(level), _) => Ok(decode_heading(level, &fields, &mut notes)),
        (None, "paragraph") => typed::<TextFields>(&fields).map(|t| ContentBlock::Paragraph { text: t.text }),
        (None, "note") => typed::<TextFields>(&fields).map(|t| ContentBlock::Note { text: t.text }),
        (None, "callout") => typed::<TextFields>(&fields).map(|t| ContentBlock::Callout {
            text: t.text,
            title: optional_string(&fields, "title", &mut notes),
            tone: optional_tone(&fields, &mut notes),
            icon: optional_string(&fields, "icon", &mut notes),
        }),
        (None, "list") => typed::<ListFields>(&fields).map(|l| ContentBlock::List { items: l.items }),
        (None, "number-list") => {
            typed::<ListFields>(&fields).map(|l| ContentBlock::NumberList { items: l.items })
        }
        (None, "image") => typed::<ImageFields>(&fields).map(|i| ContentBlock::Image {
            src: i.src,
            alt: i.alt,
            caption: optional_string(&fields, "caption", &mut notes),
        }),
        (None, _) => {
            fields.remove("type");
            return Some((ContentBlock::Extension { kind, fields }, notes));
        }
    };

    match typed {
        Ok(block) => Some((block, notes)),
        Err(err) => {
            fields.remove("type");
            let reason = format!("kept as opaque data: {}", err);
            Some((ContentBlock::Extension { kind, fields }, vec![reason]))
        }
    }
}

/// Headings always stay headings, so a damaged one still delimits its section.
fn decode_heading(level: u8, fields: &Map<String, Value>, notes: &mut Notes) -> ContentBlock {
    let text = match fields.get("text") {
        Some(Value::String(text)) => text.clone(),
        other => {
            notes.push(format!(
                "`text` is {}, heading kept with an empty title",
                other.map_or("missing", json_kind)
            ));
            String::new()
        }
    };
    ContentBlock::Heading {
        level,
        text,
        id: optional_string(fields, "id", notes),
    }
}

fn optional_string(fields: &Map<String, Value>, key: &str, notes: &mut Notes) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(other) => {
            notes.push(format!("`{}` is {}, ignored", key, json_kind(other)));
            None
        }
    }
}

fn optional_tone(fields: &Map<String, Value>, notes: &mut Notes) -> Option<CalloutTone> {
    let value = fields.get("tone").filter(|value| !value.is_null())?;
    match CalloutTone::deserialize(value) {
        Ok(tone) => Some(tone),
        Err(_) => {
            notes.push(format!("unknown tone {}, ignored", value));
            None
        }
    }
}

fn typed<T: DeserializeOwned>(fields: &Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(fields.clone()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// serde
// ---------------------------------------------------------------------------

impl Serialize for ContentBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            ContentBlock::Heading { level, text, id } => {
                map.serialize_entry("type", heading_kind(*level))?;
                map.serialize_entry("text", text)?;
                if let Some(id) = id {
                    map.serialize_entry("id", id)?;
                }
            }
            ContentBlock::Paragraph { text } | ContentBlock::Note { text } => {
                map.serialize_entry("type", self.kind())?;
                map.serialize_entry("text", text)?;
            }
            ContentBlock::Callout {
                text,
                title,
                tone,
                icon,
            } => {
                map.serialize_entry("type", "callout")?;
                map.serialize_entry("text", text)?;
                if let Some(title) = title {
                    map.serialize_entry("title", title)?;
                }
                if let Some(tone) = tone {
                    map.serialize_entry("tone", tone)?;
                }
                if let Some(icon) = icon {
                    map.serialize_entry("icon", icon)?;
                }
            }
            ContentBlock::List { items } | ContentBlock::NumberList { items } => {
                map.serialize_entry("type", self.kind())?;
                map.serialize_entry("items", items)?;
            }
            ContentBlock::Image { src, alt, caption } => {
                map.serialize_entry("type", "image")?;
                map.serialize_entry("src", src)?;
                map.serialize_entry("alt", alt)?;
                if let Some(caption) = caption {
                    map.serialize_entry("caption", caption)?;
                }
            }
            ContentBlock::Extension { kind, fields } => {
                map.serialize_entry("type", kind)?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        decode_object(fields)
            .map(|(block, _)| block)
            .ok_or_else(|| de::Error::missing_field("type"))
    }
}
