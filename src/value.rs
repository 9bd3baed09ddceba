//! Typed parameter values and the coercion rules applied by
//! [`RequestCriteria::get_query_param`](crate::RequestCriteria::get_query_param).
//!
//! A decoded query string only ever produces [`ParamValue::String`],
//! [`ParamValue::List`] and [`ParamValue::Map`]. The scalar variants appear as
//! coercion results or as caller-supplied defaults.
//!
//! Coercion follows this table, first match wins:
//!
//! | target    | stored value              | result                               |
//! |-----------|---------------------------|--------------------------------------|
//! | `array`   | string                    | split on `,`                         |
//! | `string`  | list or map               | elements joined with `,`             |
//! | `boolean` | `"true"`/`"false"` (any case) | the literal                      |
//! | any       | anything else             | scalar conversion (`12abc` → 12, `"0"` → false, ...) |

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::ParserError;

/// Ordered mapping of parameter names to values, in decode order.
pub type ParamMap = IndexMap<String, ParamValue>;

/// A decoded or coerced query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(ParamMap),
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&ParamMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True for lists and maps
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Loose truthiness: `""`, `"0"`, zero, `false` and empty containers are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !(s.is_empty() || s == "0"),
            Self::List(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
        }
    }

    /// Convert this value to `kind` following the coercion table.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::CoercionFailed`] when the value has no
    /// representation in `kind`.
    pub fn coerce(&self, kind: ValueKind) -> Result<Self, ParserError> {
        tracing::trace!(%kind, "Coercing query parameter");
        match (kind, self) {
            (ValueKind::Array, Self::String(s)) => {
                Ok(Self::List(s.split(',').map(Self::from).collect()))
            }
            (ValueKind::String, Self::List(items)) => join_scalars(items.iter()).map(Self::String),
            (ValueKind::String, Self::Map(map)) => join_scalars(map.values()).map(Self::String),
            (ValueKind::Boolean, Self::String(s)) if is_bool_literal(s) => {
                Ok(Self::Bool(s.eq_ignore_ascii_case("true")))
            }
            _ => self.settype(kind),
        }
    }

    fn settype(&self, kind: ValueKind) -> Result<Self, ParserError> {
        match kind {
            ValueKind::Boolean => Ok(Self::Bool(self.is_truthy())),
            ValueKind::Integer => self.to_int().map(Self::Int),
            ValueKind::Float => Ok(Self::Float(self.to_float())),
            ValueKind::String => self.to_loose_string().map(Self::String),
            ValueKind::Array => Ok(match self {
                Self::List(_) | Self::Map(_) => self.clone(),
                scalar => Self::List(vec![scalar.clone()]),
            }),
        }
    }

    fn to_int(&self) -> Result<i64, ParserError> {
        match self {
            Self::Bool(b) => Ok(i64::from(*b)),
            Self::Int(i) => Ok(*i),
            Self::Float(f) => float_to_int(*f),
            Self::String(s) => string_to_int(s),
            Self::List(items) => Ok(i64::from(!items.is_empty())),
            Self::Map(map) => Ok(i64::from(!map.is_empty())),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_float(&self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::String(s) => numeric_prefix(s).parse().unwrap_or(0.0),
            Self::List(items) => f64::from(u8::from(!items.is_empty())),
            Self::Map(map) => f64::from(u8::from(!map.is_empty())),
        }
    }

    fn to_loose_string(&self) -> Result<String, ParserError> {
        match self {
            Self::Bool(true) => Ok("1".to_string()),
            Self::Bool(false) => Ok(String::new()),
            Self::Int(i) => Ok(i.to_string()),
            Self::Float(f) => Ok(format_float(*f)),
            Self::String(s) => Ok(s.clone()),
            Self::List(items) => join_scalars(items.iter()),
            Self::Map(map) => join_scalars(map.values()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(value: Vec<ParamValue>) -> Self {
        Self::List(value)
    }
}

impl From<ParamMap> for ParamValue {
    fn from(value: ParamMap) -> Self {
        Self::Map(value)
    }
}

/// Coercion targets accepted by `get_query_param`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    String,
    Array,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

impl FromStr for ValueKind {
    type Err = ParserError;

    /// Parse a case-insensitive type token (`bool`, `INT`, `Double`, ...)
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.to_lowercase();
        match token.as_str() {
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            _ => Err(ParserError::UnsupportedType(token)),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_bool_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

fn join_scalars<'a>(items: impl Iterator<Item = &'a ParamValue>) -> Result<String, ParserError> {
    let parts = items
        .map(|item| {
            if item.is_container() {
                Err(ParserError::coercion_failed(
                    ValueKind::String,
                    "nested values cannot be joined",
                ))
            } else {
                item.to_loose_string()
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(","))
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

/// Longest leading numeric literal of `s`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// exponent only when it is followed by at least one digit.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C']);
    let bytes = s.as_bytes();
    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    &s[..end]
}

fn string_to_int(s: &str) -> Result<i64, ParserError> {
    let prefix = numeric_prefix(s);
    if prefix.is_empty() {
        return Ok(0);
    }
    if prefix.contains(['.', 'e', 'E']) {
        let parsed: f64 = prefix
            .parse()
            .map_err(|_| ParserError::coercion_failed(ValueKind::Integer, format!("`{s}` is not numeric")))?;
        return float_to_int(parsed);
    }
    prefix
        .parse()
        .map_err(|_| ParserError::coercion_failed(ValueKind::Integer, format!("`{s}` is out of range")))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn float_to_int(value: f64) -> Result<i64, ParserError> {
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(value.trunc() as i64)
    } else {
        Err(ParserError::coercion_failed(
            ValueKind::Integer,
            format!("{} is out of range", format_float(value)),
        ))
    }
}
