//! Method-call serialization

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::XmlRpcError;
use crate::value::{DATETIME_FORMAT, Value};

/// An XML-RPC method call ready for serialization.
///
/// # Example
/// ```
/// use cobbler_xmlrpc::{MethodCall, Value};
///
/// let call = MethodCall::new("get_system")
///     .arg("Web-Server")
///     .arg(false);
/// let body = call.to_xml()?;
/// assert!(body.starts_with(b"<?xml"));
/// # Ok::<(), cobbler_xmlrpc::XmlRpcError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Remote method name
    pub name: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Create a call with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a positional parameter.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Serialize to a complete `methodCall` document.
    ///
    /// # Errors
    /// Returns an error if the document cannot be written.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlRpcError> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;

        open(&mut writer, "methodCall")?;
        open(&mut writer, "methodName")?;
        text(&mut writer, &self.name)?;
        close(&mut writer, "methodName")?;

        open(&mut writer, "params")?;
        for param in &self.params {
            open(&mut writer, "param")?;
            write_value(&mut writer, param)?;
            close(&mut writer, "param")?;
        }
        close(&mut writer, "params")?;
        close(&mut writer, "methodCall")?;

        Ok(writer.into_inner())
    }
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> Result<(), XmlRpcError> {
    open(writer, "value")?;

    match value {
        Value::Int(i) => scalar(writer, "int", &i.to_string())?,
        Value::Bool(b) => scalar(writer, "boolean", if *b { "1" } else { "0" })?,
        Value::Str(s) => scalar(writer, "string", s)?,
        Value::Double(d) => scalar(writer, "double", &d.to_string())?,
        Value::DateTime(dt) => scalar(
            writer,
            "dateTime.iso8601",
            &dt.format(DATETIME_FORMAT).to_string(),
        )?,
        Value::Base64(bytes) => scalar(writer, "base64", &BASE64.encode(bytes))?,
        Value::Struct(map) => {
            open(writer, "struct")?;
            for (name, member) in map {
                open(writer, "member")?;
                open(writer, "name")?;
                text(writer, name)?;
                close(writer, "name")?;
                write_value(writer, member)?;
                close(writer, "member")?;
            }
            close(writer, "struct")?;
        }
        Value::Array(items) => {
            open(writer, "array")?;
            open(writer, "data")?;
            for item in items {
                write_value(writer, item)?;
            }
            close(writer, "data")?;
            close(writer, "array")?;
        }
        Value::Nil => {
            writer
                .write_event(Event::Empty(BytesStart::new("nil")))
                .map_err(write_err)?;
        }
    }

    close(writer, "value")
}

fn scalar(writer: &mut Writer<Vec<u8>>, tag: &str, content: &str) -> Result<(), XmlRpcError> {
    open(writer, tag)?;
    text(writer, content)?;
    close(writer, tag)
}

fn open(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<(), XmlRpcError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(write_err)
}

fn close(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<(), XmlRpcError> {
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(write_err)
}

fn text(writer: &mut Writer<Vec<u8>>, content: &str) -> Result<(), XmlRpcError> {
    writer
        .write_event(Event::Text(BytesText::new(content)))
        .map_err(write_err)
}

fn write_err(err: impl std::fmt::Display) -> XmlRpcError {
    XmlRpcError::Write(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn xml_of(call: &MethodCall) -> String {
        String::from_utf8(call.to_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_call_without_params() {
        let xml = xml_of(&MethodCall::new("get_distros"));
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <methodCall><methodName>get_distros</methodName>\
             <params></params></methodCall>"
        );
    }

    #[test]
    fn test_call_with_scalar_params() {
        let xml = xml_of(&MethodCall::new("get_system").arg("Web-Server").arg(false));
        assert!(xml.contains("<methodName>get_system</methodName>"));
        assert!(xml.contains("<param><value><string>Web-Server</string></value></param>"));
        assert!(xml.contains("<param><value><boolean>0</boolean></value></param>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = xml_of(&MethodCall::new("login").arg("a<b&c"));
        assert!(xml.contains("<string>a&lt;b&amp;c</string>"));
    }

    #[test]
    fn test_struct_param() {
        let mut bundle = BTreeMap::new();
        bundle.insert(
            "macaddress-intf0".to_string(),
            Value::from("00:11:22:33:44:55"),
        );
        let xml = xml_of(&MethodCall::new("modify_system").arg(Value::Struct(bundle)));
        assert!(xml.contains(
            "<struct><member><name>macaddress-intf0</name>\
             <value><string>00:11:22:33:44:55</string></value></member></struct>"
        ));
    }

    #[test]
    fn test_array_and_nil_params() {
        let xml = xml_of(
            &MethodCall::new("modify_system")
                .arg(Value::Array(vec![Value::from("admin"), Value::from("root")]))
                .arg(Value::Nil),
        );
        assert!(xml.contains(
            "<array><data><value><string>admin</string></value>\
             <value><string>root</string></value></data></array>"
        ));
        assert!(xml.contains("<value><nil/></value>"));
    }

    #[test]
    fn test_datetime_param() {
        let dt = chrono::NaiveDate::from_ymd_opt(1998, 7, 17)
            .unwrap()
            .and_hms_opt(14, 8, 55)
            .unwrap();
        let xml = xml_of(&MethodCall::new("log").arg(Value::DateTime(dt)));
        assert!(xml.contains("<dateTime.iso8601>19980717T14:08:55</dateTime.iso8601>"));
    }
}
