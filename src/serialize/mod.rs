/*!
Format-polymorphic serialization of captured values.

Format ids (the same string becomes the fixture's file extension):
  php         native literal (`<?php return ...;`), see native.rs
  yml / yaml  serde_yaml
  json        serde_json, pretty-printed
  xml         quick-xml, see xml.rs

Unknown ids fail with `SerializeError::UnsupportedFormat` only when serialization is
attempted, so the invoked method has already run by then.
*/

pub mod native;
pub mod xml;

use anyhow::Result;
use serde_json::Value;

use crate::error::SerializeError;

/// One textual encoding of a captured value.
pub trait Serializer {
    /// Canonical format id.
    fn format(&self) -> &'static str;

    fn encode(&self, value: &Value) -> Result<String>;
}

pub struct NativeLiteral;
pub struct Yaml;
pub struct Json;
pub struct Xml;

impl Serializer for NativeLiteral {
    fn format(&self) -> &'static str {
        "php"
    }

    fn encode(&self, value: &Value) -> Result<String> {
        Ok(native::encode(value))
    }
}

impl Serializer for Yaml {
    fn format(&self) -> &'static str {
        "yml"
    }

    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_yaml::to_string(value)?)
    }
}

impl Serializer for Json {
    fn format(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

impl Serializer for Xml {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn encode(&self, value: &Value) -> Result<String> {
        xml::encode(value)
    }
}

/// Pick the implementation for a format id (exact, case-sensitive).
pub fn for_format(format: &str) -> Result<Box<dyn Serializer>, SerializeError> {
    match format {
        "php" => Ok(Box::new(NativeLiteral)),
        "yml" | "yaml" => Ok(Box::new(Yaml)),
        "json" => Ok(Box::new(Json)),
        "xml" => Ok(Box::new(Xml)),
        other => Err(SerializeError::UnsupportedFormat(other.to_string())),
    }
}

pub fn serialize(value: &Value, format: &str) -> Result<String> {
    let serializer = for_format(format)?;
    crate::log_debug!("serializing with {} encoder", serializer.format());
    serializer.encode(value)
}
