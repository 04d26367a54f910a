//! Method-response parsing

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Fault, XmlRpcError};
use crate::value::{DATETIME_FORMAT, Value};

/// Parse a `methodResponse` document.
///
/// Returns the single response value, or `XmlRpcError::Fault` when the
/// server answered with a `<fault>` struct.
///
/// # Errors
/// Returns an error for malformed documents, unknown value types, or
/// server faults.
pub fn parse_response(xml: &str) -> Result<Value, XmlRpcError> {
    let mut parser = Parser::new(xml);

    match parser.next()? {
        Ev::Start(tag) if tag == "methodResponse" => {}
        other => return Err(unexpected("methodResponse", &other)),
    }

    match parser.next()? {
        Ev::Start(tag) if tag == "params" => {
            match parser.next()? {
                Ev::Start(t) if t == "param" => {}
                other => return Err(unexpected("param", &other)),
            }
            let value = parser.parse_value()?;
            parser.expect_end("param")?;
            parser.expect_end("params")?;
            Ok(value)
        }
        Ev::Start(tag) if tag == "fault" => {
            let value = parser.parse_value()?;
            Err(XmlRpcError::Fault(fault_from_value(&value)))
        }
        other => Err(unexpected("params or fault", &other)),
    }
}

fn fault_from_value(value: &Value) -> Fault {
    let members = value.as_struct();

    let code = members
        .and_then(|m| m.get("faultCode"))
        .and_then(|v| match v {
            Value::Int(i) => Some(*i),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(-1);

    let message = members
        .and_then(|m| m.get("faultString"))
        .and_then(Value::as_str)
        .unwrap_or("unknown fault")
        .to_string();

    Fault { code, message }
}

/// Structural event with names and text already owned.
#[derive(Debug)]
enum Ev {
    Start(String),
    Empty(String),
    End(String),
    Text(String),
    Eof,
}

fn unexpected(wanted: &str, got: &Ev) -> XmlRpcError {
    XmlRpcError::Malformed(format!("expected {wanted}, found {got:?}"))
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
        }
    }

    /// Next structural event. Whitespace-only text, comments, and
    /// processing instructions are skipped.
    fn next(&mut self) -> Result<Ev, XmlRpcError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Ev::Start(local_name(e.name()))),
                Event::Empty(e) => return Ok(Ev::Empty(local_name(e.name()))),
                Event::End(e) => return Ok(Ev::End(local_name(e.name()))),
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| XmlRpcError::Malformed(e.to_string()))?;
                    if !text.trim().is_empty() {
                        return Ok(Ev::Text(text.into_owned()));
                    }
                }
                Event::CData(t) => {
                    return Ok(Ev::Text(
                        String::from_utf8_lossy(t.into_inner().as_ref()).into_owned(),
                    ));
                }
                Event::Eof => return Ok(Ev::Eof),
                _ => {}
            }
        }
    }

    /// Consume events until the matching end tag, returning the
    /// concatenated text content verbatim.
    fn text_until_end(&mut self, tag: &str) -> Result<String, XmlRpcError> {
        let mut out = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| XmlRpcError::Malformed(e.to_string()))?;
                    out.push_str(&text);
                }
                Event::CData(t) => {
                    out.push_str(&String::from_utf8_lossy(t.into_inner().as_ref()));
                }
                Event::End(e) if local_name(e.name()) == tag => return Ok(out),
                Event::Start(e) => {
                    return Err(XmlRpcError::Malformed(format!(
                        "unexpected <{}> inside <{tag}>",
                        local_name(e.name())
                    )));
                }
                Event::Eof => {
                    return Err(XmlRpcError::Malformed(format!(
                        "document ended inside <{tag}>"
                    )));
                }
                _ => {}
            }
        }
    }

    /// Skip to the end tag, tolerating only whitespace on the way.
    fn expect_end(&mut self, tag: &str) -> Result<(), XmlRpcError> {
        match self.next()? {
            Ev::End(t) if t == tag => Ok(()),
            other => Err(unexpected(&format!("</{tag}>"), &other)),
        }
    }

    /// Parse a `<value>` element (the opening tag has not been consumed).
    fn parse_value(&mut self) -> Result<Value, XmlRpcError> {
        match self.next()? {
            Ev::Start(tag) if tag == "value" => self.parse_value_body(),
            Ev::Empty(tag) if tag == "value" => Ok(Value::Str(String::new())),
            other => Err(unexpected("<value>", &other)),
        }
    }

    /// Parse the content of a `<value>` whose opening tag was consumed.
    ///
    /// Per the XML-RPC grammar a value holds either a single typed element
    /// or bare text, which is a string.
    fn parse_value_body(&mut self) -> Result<Value, XmlRpcError> {
        let mut text: Option<String> = None;
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => {
                    let chunk = t
                        .unescape()
                        .map_err(|e| XmlRpcError::Malformed(e.to_string()))?;
                    text.get_or_insert_with(String::new).push_str(&chunk);
                }
                Event::CData(t) => {
                    text.get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(t.into_inner().as_ref()));
                }
                Event::Start(e) => {
                    let tag = local_name(e.name());
                    let value = self.parse_typed(&tag)?;
                    self.expect_end("value")?;
                    return Ok(value);
                }
                Event::Empty(e) => {
                    let tag = local_name(e.name());
                    let value = empty_typed(&tag)?;
                    self.expect_end("value")?;
                    return Ok(value);
                }
                Event::End(e) if local_name(e.name()) == "value" => {
                    return Ok(Value::Str(text.unwrap_or_default()));
                }
                Event::End(e) => {
                    return Err(XmlRpcError::Malformed(format!(
                        "unexpected </{}> inside <value>",
                        local_name(e.name())
                    )));
                }
                Event::Eof => {
                    return Err(XmlRpcError::Malformed(
                        "document ended inside <value>".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    fn parse_typed(&mut self, tag: &str) -> Result<Value, XmlRpcError> {
        match tag {
            "string" => Ok(Value::Str(self.text_until_end("string")?)),
            "int" | "i4" => {
                let text = self.text_until_end(tag)?;
                text.trim()
                    .parse()
                    .map(Value::Int)
                    .map_err(|_| XmlRpcError::InvalidScalar { kind: "int", text })
            }
            "boolean" => {
                let text = self.text_until_end("boolean")?;
                let parsed = match text.trim() {
                    "1" | "true" | "True" => Some(true),
                    "0" | "false" | "False" => Some(false),
                    _ => None,
                };
                parsed
                    .map(Value::Bool)
                    .ok_or(XmlRpcError::InvalidScalar {
                        kind: "boolean",
                        text,
                    })
            }
            "double" => {
                let text = self.text_until_end("double")?;
                text.trim()
                    .parse()
                    .map(Value::Double)
                    .map_err(|_| XmlRpcError::InvalidScalar {
                        kind: "double",
                        text,
                    })
            }
            "dateTime.iso8601" => {
                let text = self.text_until_end("dateTime.iso8601")?;
                parse_datetime(text.trim())
                    .map(Value::DateTime)
                    .ok_or(XmlRpcError::InvalidScalar {
                        kind: "dateTime",
                        text,
                    })
            }
            "base64" => {
                let text = self.text_until_end("base64")?;
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                BASE64
                    .decode(compact)
                    .map(Value::Base64)
                    .map_err(|_| XmlRpcError::InvalidScalar {
                        kind: "base64",
                        text,
                    })
            }
            "nil" => {
                self.text_until_end("nil")?;
                Ok(Value::Nil)
            }
            "struct" => self.parse_struct(),
            "array" => self.parse_array(),
            other => Err(XmlRpcError::Malformed(format!(
                "unknown value type <{other}>"
            ))),
        }
    }

    /// Parse struct members; `<struct>` has been consumed.
    fn parse_struct(&mut self) -> Result<Value, XmlRpcError> {
        let mut members = BTreeMap::new();
        loop {
            match self.next()? {
                Ev::Start(tag) if tag == "member" => {
                    let name = match self.next()? {
                        Ev::Start(t) if t == "name" => self.text_until_end("name")?,
                        Ev::Empty(t) if t == "name" => String::new(),
                        other => return Err(unexpected("<name>", &other)),
                    };
                    let value = self.parse_value()?;
                    self.expect_end("member")?;
                    members.insert(name, value);
                }
                Ev::End(tag) if tag == "struct" => return Ok(Value::Struct(members)),
                other => return Err(unexpected("<member> or </struct>", &other)),
            }
        }
    }

    /// Parse array elements; `<array>` has been consumed.
    fn parse_array(&mut self) -> Result<Value, XmlRpcError> {
        match self.next()? {
            Ev::Start(tag) if tag == "data" => {}
            Ev::Empty(tag) if tag == "data" => {
                self.expect_end("array")?;
                return Ok(Value::Array(Vec::new()));
            }
            other => return Err(unexpected("<data>", &other)),
        }

        let mut items = Vec::new();
        loop {
            match self.next()? {
                Ev::Start(tag) if tag == "value" => items.push(self.parse_value_body()?),
                Ev::Empty(tag) if tag == "value" => items.push(Value::Str(String::new())),
                Ev::End(tag) if tag == "data" => {
                    self.expect_end("array")?;
                    return Ok(Value::Array(items));
                }
                other => return Err(unexpected("<value> or </data>", &other)),
            }
        }
    }
}

fn empty_typed(tag: &str) -> Result<Value, XmlRpcError> {
    match tag {
        "nil" => Ok(Value::Nil),
        "string" => Ok(Value::Str(String::new())),
        "struct" => Ok(Value::Struct(BTreeMap::new())),
        "array" => Ok(Value::Array(Vec::new())),
        "base64" => Ok(Value::Base64(Vec::new())),
        other => Err(XmlRpcError::Malformed(format!(
            "empty <{other}/> is not a value"
        ))),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    // Strict XML-RPC format first, then the dashed variant some
    // implementations emit.
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn local_name(name: quick_xml::name::QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().into_inner()).into_owned()
}
