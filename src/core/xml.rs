//! # Markup Tree Codec
//!
//! Converts payload trees to XML text and parses XML text back into payload
//! trees.
//!
//! ## Building
//! - A mapping with exactly one key, under the default root name, uses that key
//!   as the document element. Anything else is wrapped in the configured root.
//! - Mapping keys become child elements, in insertion order.
//! - A sequence under key `k` becomes one `<k>` element per item.
//! - Scalars become element text; null and `""` become empty elements.
//! - Key `$` holds attributes, key `_` holds element text.
//!
//! ## Parsing
//! - The document element decodes to `{name: value}`.
//! - Every child element value is collected into a sequence under its tag
//!   name, so a single `<age>30</age>` decodes to `{"age": ["30"]}`.
//! - Text is never coerced to numbers or booleans.
//! - Attributes decode under `$`, text mixed with child elements under `_`.
//! - Whitespace-only text between child elements is dropped.
//! - Blank input decodes to null.
//! - Elements nested deeper than the decode limit are rejected before the
//!   tree is assembled.
//!
//! ```text
//! {"user":{"name":"Carol","age":25}}
//!   -> <user><name>Carol</name><age>25</age></user>
//!   -> {"user":{"name":["Carol"],"age":["25"]}}
//! ```

use crate::config::{XmlConfig, DEFAULT_XML_ROOT};
use crate::core::json;
use crate::core::serialization::Format;
use crate::error::constants::{
    ERR_NESTING_LIMIT, ERR_XML_MULTIPLE_ROOTS, ERR_XML_NESTED_SEQUENCE, ERR_XML_NO_ROOT,
    ERR_XML_TEXT_OUTSIDE_ROOT, ERR_XML_UNCLOSED,
};
use crate::error::{CodecError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

/// Key holding element attributes
pub const ATTR_KEY: &str = "$";

/// Key holding element text when it cannot stand alone
pub const CHAR_KEY: &str = "_";

/// Render a payload tree as an XML document
pub fn build(value: &Value, config: &XmlConfig) -> Result<String> {
    let (root_name, root_value) = match value {
        Value::Object(map) if map.len() == 1 && config.root_name == DEFAULT_XML_ROOT => {
            match map.iter().next() {
                Some((name, inner)) => (name.as_str(), inner),
                None => (config.root_name.as_str(), value),
            }
        }
        _ => (config.root_name.as_str(), value),
    };

    if root_value.is_array() {
        return Err(CodecError::TypeMismatch {
            format: Format::Xml,
            found: "sequence",
        });
    }

    let mut writer = if config.pretty {
        Writer::new_with_indent(Vec::new(), b' ', config.indent)
    } else {
        Writer::new(Vec::new())
    };

    if config.declaration {
        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
        )?;
    }
    write_element(&mut writer, root_name, root_value)?;

    String::from_utf8(writer.into_inner()).map_err(CodecError::serialize)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(CodecError::serialize)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    validate_name(name)?;

    match value {
        Value::Null => write(writer, Event::Empty(BytesStart::new(name))),
        Value::String(text) if text.is_empty() => {
            write(writer, Event::Empty(BytesStart::new(name)))
        }
        Value::Array(_) => Err(CodecError::serialize(ERR_XML_NESTED_SEQUENCE)),
        Value::Object(map) => write_mapping(writer, name, map),
        scalar => {
            let text = scalar_text(scalar);
            write(writer, Event::Start(BytesStart::new(name)))?;
            write(writer, Event::Text(BytesText::new(&text)))?;
            write(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_mapping(writer: &mut Writer<Vec<u8>>, name: &str, map: &Map<String, Value>) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(attrs) = map.get(ATTR_KEY) {
        let Value::Object(attrs) = attrs else {
            return Err(CodecError::serialize(format_args!(
                "attributes of <{name}> must be a mapping"
            )));
        };
        for (key, attr) in attrs {
            validate_name(key)?;
            if attr.is_object() || attr.is_array() {
                return Err(CodecError::serialize(format_args!(
                    "attribute {key} of <{name}> must be a scalar"
                )));
            }
            let text = scalar_text(attr);
            start.push_attribute((key.as_str(), text.as_str()));
        }
    }

    let text = map.get(CHAR_KEY).map(scalar_text).unwrap_or_default();
    let has_children = map.keys().any(|key| key != ATTR_KEY && key != CHAR_KEY);

    if !has_children && text.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    if !text.is_empty() {
        write(writer, Event::Text(BytesText::new(&text)))?;
    }
    for (key, child) in map {
        if key == ATTR_KEY || key == CHAR_KEY {
            continue;
        }
        match child {
            Value::Array(items) => {
                for item in items {
                    write_element(writer, key, item)?;
                }
            }
            other => write_element(writer, key, other)?,
        }
    }
    write(writer, Event::End(BytesEnd::new(name)))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Number(number) if number.is_f64() => {
            number.as_f64().map(json::number_text).unwrap_or_default()
        }
        other => other.to_string(),
    }
}

// XML 1.0 names, restricted to the ASCII subset plus any non-ASCII letter
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => chars
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CodecError::serialize(format_args!(
            "invalid xml element name: {name:?}"
        )))
    }
}

/// Element being assembled while its content is still streaming in
struct OpenElement {
    name: String,
    attrs: Map<String, Value>,
    text: String,
    has_cdata: bool,
    children: Map<String, Value>,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(CodecError::invalid)?
            .to_owned();

        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(CodecError::invalid)?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(CodecError::invalid)?
                .to_owned();
            let value = attr.unescape_value().map_err(CodecError::invalid)?;
            attrs.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            attrs,
            text: String::new(),
            has_cdata: false,
            children: Map::new(),
        })
    }

    fn push_child(&mut self, name: String, value: Value) {
        match self
            .children
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(value),
            slot => *slot = Value::Array(vec![slot.take(), value]),
        }
    }

    fn finish(self) -> (String, Value) {
        let mut obj = Map::new();
        if !self.attrs.is_empty() {
            obj.insert(ATTR_KEY.to_string(), Value::Object(self.attrs));
        }

        let blank = self.text.trim().is_empty() && !self.has_cdata;
        let mut empty_text = String::new();
        if blank {
            empty_text = self.text;
        } else {
            obj.insert(CHAR_KEY.to_string(), Value::String(self.text));
        }
        obj.extend(self.children);

        let value = if obj.is_empty() {
            Value::String(empty_text)
        } else if obj.len() == 1 && obj.contains_key(CHAR_KEY) {
            obj.remove(CHAR_KEY).unwrap_or(Value::Null)
        } else {
            Value::Object(obj)
        };
        (self.name, value)
    }
}

/// Parse an XML document into a payload tree
///
/// The document element sits at depth 1; any element deeper than
/// `max_depth` fails with `InvalidDataOrFormat`.
pub fn parse(input: &str, max_depth: usize) -> Result<Value> {
    if input.trim().is_empty() {
        return Ok(Value::Null);
    }

    let mut reader = Reader::from_str(input);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event().map_err(CodecError::invalid)? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(CodecError::invalid(ERR_XML_MULTIPLE_ROOTS));
                }
                if stack.len() >= max_depth {
                    return Err(CodecError::invalid(ERR_NESTING_LIMIT));
                }
                stack.push(OpenElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(CodecError::invalid(ERR_XML_MULTIPLE_ROOTS));
                }
                if stack.len() >= max_depth {
                    return Err(CodecError::invalid(ERR_NESTING_LIMIT));
                }
                let element = OpenElement::from_start(&start)?;
                close(&mut stack, &mut root, element);
            }
            Event::End(_) => match stack.pop() {
                Some(element) => close(&mut stack, &mut root, element),
                None => return Err(CodecError::invalid(ERR_XML_UNCLOSED)),
            },
            Event::Text(text) => {
                let text = text.unescape().map_err(CodecError::invalid)?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(CodecError::invalid(ERR_XML_TEXT_OUTSIDE_ROOT)),
                }
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data).map_err(CodecError::invalid)?;
                match stack.last_mut() {
                    Some(open) => {
                        open.text.push_str(text);
                        open.has_cdata = true;
                    }
                    None => return Err(CodecError::invalid(ERR_XML_TEXT_OUTSIDE_ROOT)),
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions and doctypes carry no payload
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::invalid(ERR_XML_UNCLOSED));
    }
    root.ok_or_else(|| CodecError::invalid(ERR_XML_NO_ROOT))
}

fn close(stack: &mut [OpenElement], root: &mut Option<Value>, element: OpenElement) {
    let (name, value) = element.finish();
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value),
        None => {
            let mut document = Map::new();
            document.insert(name, value);
            *root = Some(Value::Object(document));
        }
    }
}
