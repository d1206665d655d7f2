//! Injected logging capability.
//!
//! The client never talks to a log sink directly. It emits structured records
//! through [`PricingLogger`]; [`NopLogger`] discards them and
//! [`TracingLogger`] forwards them to `tracing`.

use std::fmt;

use crate::error::Severity;

/// A structured log value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(value) => f.write_str(value),
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::UInt(value) => write!(f, "{}", value),
            FieldValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::UInt(u64::from(value))
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::UInt(u64::from(value))
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::UInt(value as u64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A key-value pair attached to a log record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: FieldValue,
}

pub fn field(key: &'static str, value: impl Into<FieldValue>) -> Field {
    Field {
        key,
        value: value.into(),
    }
}

/// Renders fields as `key=value key=value`.
pub struct DisplayFields<'a>(pub &'a [Field]);

impl fmt::Display for DisplayFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}

/// Structured logger capability passed in by the caller.
pub trait PricingLogger: Send + Sync {
    fn log(&self, level: Severity, message: &str, fields: &[Field]);

    /// Lets callers skip building fields for records nobody will see.
    fn enabled(&self, _level: Severity) -> bool {
        true
    }

    fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Info, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field]) {
        self.log(Severity::Error, message, fields);
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl PricingLogger for NopLogger {
    fn log(&self, _level: Severity, _message: &str, _fields: &[Field]) {}

    fn enabled(&self, _level: Severity) -> bool {
        false
    }
}

/// Forwards records to the `tracing` subscriber installed by the process.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("azure-pricing-client")
    }
}

/// Keys the client emits that [`TracingLogger`] records as separate fields.
const STRING_KEYS: [&str; 8] = [
    "region",
    "sku",
    "service",
    "product",
    "currency",
    "url",
    "error_category",
    "error",
];
const NUMBER_KEYS: [&str; 5] = ["page", "status", "attempt", "remaining", "wait_ms"];

/// Field lookup for one record.
struct Lookup<'a>(&'a [Field]);

impl<'a> Lookup<'a> {
    fn value(&self, key: &str) -> Option<&'a FieldValue> {
        self.0.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    fn text(&self, key: &str) -> Option<&'a str> {
        match self.value(key)? {
            FieldValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<u64> {
        match self.value(key)? {
            FieldValue::UInt(value) => Some(*value),
            FieldValue::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Fields without a dedicated tracing key, rendered `key=value`.
    fn rest(&self) -> Option<String> {
        let rest: Vec<Field> = self
            .0
            .iter()
            .filter(|f| !is_known(f))
            .cloned()
            .collect();
        if rest.is_empty() {
            None
        } else {
            Some(DisplayFields(&rest).to_string())
        }
    }

}

fn is_known(field: &Field) -> bool {
    match field.value {
        FieldValue::Str(_) => STRING_KEYS.contains(&field.key),
        FieldValue::UInt(_) => NUMBER_KEYS.contains(&field.key),
        FieldValue::Int(value) => value >= 0 && NUMBER_KEYS.contains(&field.key),
        FieldValue::Bool(_) => false,
    }
}

macro_rules! emit {
    ($level:expr, $component:expr, $message:expr, $fields:expr) => {{
        let f = &$fields;
        let rest = f.rest();
        tracing::event!(
            $level,
            component = $component,
            region = f.text("region"),
            sku = f.text("sku"),
            service = f.text("service"),
            product = f.text("product"),
            currency = f.text("currency"),
            url = f.text("url"),
            error_category = f.text("error_category"),
            page = f.number("page"),
            status = f.number("status"),
            attempt = f.number("attempt"),
            remaining = f.number("remaining"),
            wait_ms = f.number("wait_ms"),
            error = f.text("error"),
            fields = rest.as_deref(),
            "{}",
            $message
        )
    }};
}

impl PricingLogger for TracingLogger {
    fn log(&self, level: Severity, message: &str, fields: &[Field]) {
        let fields = Lookup(fields);
        match level {
            Severity::Debug => emit!(tracing::Level::DEBUG, self.component, message, fields),
            Severity::Info => emit!(tracing::Level::INFO, self.component, message, fields),
            Severity::Warn => emit!(tracing::Level::WARN, self.component, message, fields),
            Severity::Error => emit!(tracing::Level::ERROR, self.component, message, fields),
        }
    }

    fn enabled(&self, level: Severity) -> bool {
        match level {
            Severity::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Severity::Info => tracing::enabled!(tracing::Level::INFO),
            Severity::Warn => tracing::enabled!(tracing::Level::WARN),
            Severity::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}
