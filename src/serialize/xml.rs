//! XML rendering of captured values.
//!
//! Document shape:
//!   <?xml version="1.0" encoding="UTF-8"?>
//!   <result xmlns:xsi="...">
//!     <entry>1</entry>                 sequence item
//!     <name>widget</name>              map entry with a valid element name
//!     <entry key="two words">x</entry> map entry otherwise
//!     <entry xsi:nil="true"/>          null
//!   </result>
//!
//! XML 1.0 has no escape for most C0 control characters (U+0001 and friends) or for
//! U+FFFE/U+FFFF, so values containing them fail with `SerializeError::XmlChar`.

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use crate::error::SerializeError;

const ROOT: &str = "result";
const ITEM: &str = "entry";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub fn encode(value: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT);
    root.push_attribute(("xmlns:xsi", XSI_NS));
    write_element(&mut writer, root, value)?;

    let mut out = String::from_utf8(writer.into_inner()).context("XML output is not UTF-8")?;
    out.push('\n');
    Ok(out)
}

fn write_element<'a>(
    writer: &mut Writer<Vec<u8>>,
    mut start: BytesStart<'a>,
    value: &'a Value,
) -> Result<()> {
    let end = start.to_end().into_owned();
    match value {
        Value::Null => {
            start.push_attribute(("xsi:nil", "true"));
            writer.write_event(Event::Empty(start))?;
        }
        Value::Bool(b) => write_text(writer, start, end, if *b { "true" } else { "false" })?,
        Value::Number(n) => write_text(writer, start, end, &n.to_string())?,
        Value::String(s) => write_text(writer, start, end, s)?,
        Value::Array(items) => {
            if items.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            writer.write_event(Event::Start(start))?;
            for item in items {
                write_element(writer, BytesStart::new(ITEM), item)?;
            }
            writer.write_event(Event::End(end))?;
        }
        Value::Object(map) => {
            if map.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            writer.write_event(Event::Start(start))?;
            for (key, item) in map {
                let child = if is_element_name(key) {
                    BytesStart::new(key.as_str())
                } else {
                    check_chars(key)?;
                    let mut e = BytesStart::new(ITEM);
                    e.push_attribute(("key", key.as_str()));
                    e
                };
                write_element(writer, child, item)?;
            }
            writer.write_event(Event::End(end))?;
        }
    }
    Ok(())
}

fn write_text(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    end: BytesEnd<'_>,
    text: &str,
) -> Result<()> {
    check_chars(text)?;
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn check_chars(text: &str) -> Result<(), SerializeError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(SerializeError::XmlChar(c as u32)),
        None => Ok(()),
    }
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Conservative XML Name check: letter or `_` first, then letters, digits, `-`, `_`, `.`;
/// nothing starting with `xml`.
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
