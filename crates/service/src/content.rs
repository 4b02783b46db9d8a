//! Filename and content validation.
//!
//! Every supported file type is a [`ContentKind`] variant; the variant owns
//! the parser used to reject malformed content.

use std::{fmt, path::Path};

use serde::{
    de::{self, EnumAccess, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Json,
    Yaml,
}

impl ContentKind {
    /// Map a bare extension (no leading dot) to a kind. Matching is exact.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Result<Self, ServiceError> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ServiceError::UnsupportedType(filename.to_string()))
    }

    pub fn validate(self, content: &str) -> Result<(), ServiceError> {
        match self {
            Self::Text => Ok(()),
            Self::Json => serde_json::from_str::<serde_json::Value>(content)
                .map(|_| ())
                .map_err(|e| ServiceError::MalformedContent(format!("invalid JSON: {e}"))),
            Self::Yaml => validate_yaml(content),
        }
    }
}

/// Safe-load style YAML check: duplicate keys are allowed (last one wins),
/// application-specific tags such as `!custom` or `!!python/object` are not.
fn validate_yaml(content: &str) -> Result<(), ServiceError> {
    if content.trim().is_empty() {
        return Ok(());
    }
    serde_yaml::from_str::<SafeYaml>(content)
        .map(|_| ())
        .map_err(|e| ServiceError::MalformedContent(format!("invalid YAML: {e}")))
}

/// Walks a YAML document without building it, so mapping keys are never
/// compared. Tagged nodes reach `visit_enum` and are refused.
struct SafeYaml;

impl<'de> Deserialize<'de> for SafeYaml {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SafeYamlVisitor)
    }
}

struct SafeYamlVisitor;

impl<'de> Visitor<'de> for SafeYamlVisitor {
    type Value = SafeYaml;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML document")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_i64<E: de::Error>(self, _: i64) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_i128<E: de::Error>(self, _: i128) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_u64<E: de::Error>(self, _: u64) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_u128<E: de::Error>(self, _: u128) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_f64<E: de::Error>(self, _: f64) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_str<E: de::Error>(self, _: &str) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_unit<E: de::Error>(self) -> Result<SafeYaml, E> { Ok(SafeYaml) }
    fn visit_none<E: de::Error>(self) -> Result<SafeYaml, E> { Ok(SafeYaml) }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<SafeYaml, D::Error> {
        SafeYaml::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SafeYaml, A::Error> {
        while seq.next_element::<SafeYaml>()?.is_some() {}
        Ok(SafeYaml)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SafeYaml, A::Error> {
        while map.next_entry::<SafeYaml, SafeYaml>()?.is_some() {}
        Ok(SafeYaml)
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<SafeYaml, A::Error> {
        let (tag, _): (String, _) = data.variant()?;
        Err(de::Error::custom(format!("unsupported tag !{tag}")))
    }
}

/// Reject names that could escape the storage directory.
pub fn check_filename(filename: &str) -> Result<(), ServiceError> {
    let bad = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(|c| matches!(c, '/' | '\\' | '\0'));
    if bad {
        return Err(ServiceError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Full check for a write: safe name, supported type, well-formed content.
pub fn validate(filename: &str, content: &str) -> Result<ContentKind, ServiceError> {
    check_filename(filename)?;
    let kind = ContentKind::from_filename(filename)?;
    kind.validate(content)?;
    Ok(kind)
}
