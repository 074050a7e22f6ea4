//! iCalendar properties, parameters and values (RFC 5545 §3.2, §3.3, §3.8).

use chrono::{DateTime, Utc};

/// A property parameter such as `CN=Jane` or `FMTTYPE=application/xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// One or more values; serialized comma-separated.
    pub values: Vec<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// `VALUE=<type>`.
    #[must_use]
    pub fn value_type(value_type: &str) -> Self {
        Self::new("VALUE", value_type)
    }

    /// `CN=<common name>`.
    #[must_use]
    pub fn common_name(name: impl Into<String>) -> Self {
        Self::new("CN", name)
    }

    /// `FMTTYPE=<media type>`.
    #[must_use]
    pub fn fmt_type(media_type: impl Into<String>) -> Self {
        Self::new("FMTTYPE", media_type)
    }

    /// Returns the first value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// TEXT, escaped on output.
    Text(String),
    /// DATE-TIME in UTC form (`19970714T173000Z`).
    DateTime(DateTime<Utc>),
    /// CAL-ADDRESS or URI, written verbatim.
    Uri(String),
    /// BINARY, written as base64.
    Binary(Vec<u8>),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// An iCalendar property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of insertion.
    pub params: Vec<Parameter>,
    pub value: Value,
}

impl Property {
    fn with_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value,
        }
    }

    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_value(name, Value::Text(value.into()))
    }

    /// Creates a property with a UTC date-time value.
    #[must_use]
    pub fn datetime(name: impl Into<String>, dt: DateTime<Utc>) -> Self {
        Self::with_value(name, Value::DateTime(dt))
    }

    /// Creates a property holding a URI or calendar address.
    #[must_use]
    pub fn uri(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::with_value(name, Value::Uri(uri.into()))
    }

    /// ## Summary
    /// Creates an inline binary property.
    ///
    /// Adds the `VALUE=BINARY` and `ENCODING=BASE64` parameters RFC 5545
    /// requires for inline attachments.
    #[must_use]
    pub fn binary(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let mut prop = Self::with_value(name, Value::Binary(data.into()));
        prop.add_param(Parameter::value_type("BINARY"));
        prop.add_param(Parameter::new("ENCODING", "BASE64"));
        prop
    }

    /// Adds a parameter, keeping any existing one with the same name.
    pub fn add_param(&mut self, param: Parameter) {
        self.params.push(param);
    }

    /// Builder form of [`Property::add_param`].
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.add_param(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.value.as_datetime()
    }
}
