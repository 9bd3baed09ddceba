use std::fmt;

use super::validate_field_name;
use crate::errors::ParserError;
use crate::value::ParamValue;

/// Comparison operators for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Neq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// LIKE pattern matching
    Like,
    /// IN (list of values)
    In,
    /// NOT IN (list of values)
    NotIn,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
}

impl FilterOperator {
    /// Parse an operator from its bracket token (e.g. `gte` in `filter[age][gte]`)
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "neq" | "ne" | "not" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "like" => Some(Self::Like),
            "in" => Some(Self::In),
            "notin" | "nin" => Some(Self::NotIn),
            "null" => Some(Self::IsNull),
            "notnull" => Some(Self::IsNotNull),
            _ => None,
        }
    }

    /// Canonical token for this operator
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::IsNull => "null",
            Self::IsNotNull => "notnull",
        }
    }

    /// Operators whose value is a list
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Operators that use their value at all
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single `field operator value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParam {
    /// Field the condition applies to (e.g. "status")
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// String for scalar operators, list for `in`/`notin`, raw value for null checks
    pub value: ParamValue,
}

/// Parsed filter expression built from the decoded `filter` parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    params: Vec<FilterParam>,
}

impl Filter {
    /// Build a filter from the decoded `filter` value.
    ///
    /// Accepts `{field: value}`, `{field: [values]}` and
    /// `{field: {operator: value}}`. Empty input gives an empty filter.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidParam`] for an unknown operator, an
    /// invalid field name, values without a field name, or values nested
    /// below an operator.
    pub fn new(raw: &ParamValue) -> Result<Self, ParserError> {
        let mut params = Vec::new();

        match raw {
            ParamValue::Map(fields) => {
                for (field, value) in fields {
                    parse_field(field, value, &mut params)?;
                }
            }
            ParamValue::List(items) => {
                if let Some(index) = items.iter().position(|item| !is_blank(item)) {
                    return Err(ParserError::invalid_param(
                        format!("filter[{index}]"),
                        "Filter values must be keyed by field name",
                    ));
                }
            }
            other if is_blank(other) => {}
            _ => {
                return Err(ParserError::invalid_param(
                    "filter",
                    "Filter values must be keyed by field name",
                ));
            }
        }

        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &[FilterParam] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterParam> {
        self.params.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// All conditions on `field`, in request order
    pub fn get<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FilterParam> + 'a {
        self.params.iter().filter(move |p| p.field == field)
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = &'a FilterParam;
    type IntoIter = std::slice::Iter<'a, FilterParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

fn is_blank(value: &ParamValue) -> bool {
    match value {
        ParamValue::String(s) => s.trim().is_empty(),
        ParamValue::List(items) => items.is_empty(),
        ParamValue::Map(map) => map.is_empty(),
        _ => false,
    }
}

fn parse_field(
    field: &str,
    value: &ParamValue,
    params: &mut Vec<FilterParam>,
) -> Result<(), ParserError> {
    let param = format!("filter[{field}]");
    validate_field_name(&param, field)?;

    let mut push = |operator, value| {
        params.push(FilterParam {
            field: field.to_string(),
            operator,
            value,
        });
    };

    match value {
        ParamValue::Map(operators) => {
            for (token, operand) in operators {
                let operator = FilterOperator::from_token(token).ok_or_else(|| {
                    ParserError::invalid_param(
                        format!("{param}[{token}]"),
                        format!("Unsupported filter operator `{token}`"),
                    )
                })?;
                let param = format!("{param}[{token}]");
                if let Some(operand) = operator_value(&param, operator, operand)? {
                    push(operator, operand);
                }
            }
        }
        ParamValue::List(_) => {
            if let Some(values) = list_values(&param, value)? {
                push(FilterOperator::In, values);
            }
        }
        ParamValue::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                push(FilterOperator::Eq, ParamValue::from(trimmed));
            }
        }
        scalar => push(FilterOperator::Eq, scalar.clone()),
    }

    Ok(())
}

fn operator_value(
    param: &str,
    operator: FilterOperator,
    operand: &ParamValue,
) -> Result<Option<ParamValue>, ParserError> {
    if !operator.takes_value() {
        return Ok(Some(operand.clone()));
    }
    if operator.takes_list() {
        return list_values(param, operand);
    }
    match operand {
        ParamValue::Map(_) | ParamValue::List(_) => Err(ParserError::invalid_param(
            param,
            format!("Operator `{operator}` expects a single value"),
        )),
        ParamValue::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| ParamValue::from(trimmed)))
        }
        scalar => Ok(Some(scalar.clone())),
    }
}

/// Normalize an `in`-style operand: strings split on `,`, blanks dropped.
fn list_values(param: &str, operand: &ParamValue) -> Result<Option<ParamValue>, ParserError> {
    let values: Vec<ParamValue> = match operand {
        ParamValue::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ParamValue::from)
            .collect(),
        ParamValue::List(items) => {
            if items.iter().any(ParamValue::is_container) {
                return Err(ParserError::invalid_param(
                    param,
                    "Filter values cannot be nested",
                ));
            }
            items
                .iter()
                .filter(|item| !is_blank(item))
                .map(|item| match item {
                    ParamValue::String(s) => ParamValue::from(s.trim()),
                    other => other.clone(),
                })
                .collect()
        }
        ParamValue::Map(_) => {
            return Err(ParserError::invalid_param(
                param,
                "Filter values cannot be nested",
            ));
        }
        scalar => vec![scalar.clone()],
    };

    Ok((!values.is_empty()).then_some(ParamValue::List(values)))
}
