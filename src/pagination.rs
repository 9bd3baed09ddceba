use std::fmt;

use crate::errors::ParserError;

/// The three pagination parameters a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationField {
    Limit,
    Offset,
    Page,
}

impl PaginationField {
    /// Query string identifier of this field
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Offset => "offset",
            Self::Page => "page",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Offset => "Offset",
            Self::Page => "Page",
        }
    }

    /// Validate a pagination value before it is stored.
    ///
    /// `None` clears the field and always passes.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidParam`] naming this field when `value` is negative.
    pub fn check(self, value: Option<i64>) -> Result<Option<u64>, ParserError> {
        value
            .map(|v| {
                u64::try_from(v).map_err(|_| {
                    ParserError::invalid_param(
                        self.identifier(),
                        format!("{} value cannot be lower than 0", self.label()),
                    )
                })
            })
            .transpose()
    }
}

impl fmt::Display for PaginationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_passes() {
        assert_eq!(PaginationField::Limit.check(None).unwrap(), None);
    }

    #[test]
    fn test_zero_and_positive_pass() {
        assert_eq!(PaginationField::Offset.check(Some(0)).unwrap(), Some(0));
        assert_eq!(PaginationField::Page.check(Some(7)).unwrap(), Some(7));
    }

    #[test]
    fn test_negative_names_field_and_minimum() {
        for field in [PaginationField::Limit, PaginationField::Offset, PaginationField::Page] {
            let err = field.check(Some(-1)).unwrap_err();
            assert_eq!(err.param(), Some(field.identifier()));
            assert!(err.to_string().contains("cannot be lower than 0"), "{err}");
        }
    }

    #[test]
    fn test_limit_message() {
        let err = PaginationField::Limit.check(Some(-5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid `limit` parameter: Limit value cannot be lower than 0"
        );
    }
}
