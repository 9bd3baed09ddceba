use std::fmt;

use super::validate_field_name;
use crate::errors::ParserError;

const SORT_PARAM: &str = "sort";

/// Direction of a single sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `field` / `-field` entry of a sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParam {
    pub field: String,
    pub direction: SortDirection,
}

impl fmt::Display for SortParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{}", self.field),
            SortDirection::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// Parsed sort expression, e.g. `-created_at,title`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    params: Vec<SortParam>,
}

impl Sort {
    /// Parse a raw sort expression. Absent or empty input gives an empty sort.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidParam`] for an invalid field name.
    pub fn new(raw: Option<&str>) -> Result<Self, ParserError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let params = raw
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &[SortParam] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortParam> {
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

    /// Sort entry for `field`, if requested
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&SortParam> {
        self.params.iter().find(|p| p.field == field)
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a SortParam;
    type IntoIter = std::slice::Iter<'a, SortParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}

fn parse_segment(segment: &str) -> Result<SortParam, ParserError> {
    let (field, direction) = if let Some(field) = segment.strip_prefix('-') {
        (field, SortDirection::Desc)
    } else {
        (segment.strip_prefix('+').unwrap_or(segment), SortDirection::Asc)
    };
    let field = field.trim();
    validate_field_name(SORT_PARAM, field)?;

    Ok(SortParam {
        field: field.to_string(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_are_empty() {
        assert!(Sort::new(None).unwrap().is_empty());
        assert!(Sort::new(Some("")).unwrap().is_empty());
        assert!(Sort::new(Some(" , ,")).unwrap().is_empty());
    }

    #[test]
    fn test_directions() {
        let sort = Sort::new(Some("-name,+age,id")).unwrap();
        assert_eq!(sort.len(), 3);
        assert_eq!(sort.params()[0].field, "name");
        assert_eq!(sort.params()[0].direction, SortDirection::Desc);
        assert_eq!(sort.params()[1].field, "age");
        assert_eq!(sort.params()[1].direction, SortDirection::Asc);
        assert_eq!(sort.params()[2].field, "id");
        assert_eq!(sort.params()[2].direction, SortDirection::Asc);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let sort = Sort::new(Some(" -name , title ")).unwrap();
        assert_eq!(sort.to_string(), "-name,title");
    }

    #[test]
    fn test_get_by_field() {
        let sort = Sort::new(Some("-created_at")).unwrap();
        assert_eq!(sort.get("created_at").unwrap().direction, SortDirection::Desc);
        assert!(sort.get("title").is_none());
    }

    #[test]
    fn test_bare_direction_sign_rejected() {
        let err = Sort::new(Some("name,-")).unwrap_err();
        assert_eq!(err.param(), Some("sort"));
    }

    #[test]
    fn test_invalid_field_rejected() {
        assert!(Sort::new(Some("a..b")).is_err());
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(SortDirection::Asc.as_str(), "ASC");
        assert_eq!(SortDirection::Desc.as_str(), "DESC");
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }

    #[test]
    fn test_iterates_in_order() {
        let sort = Sort::new(Some("b,a")).unwrap();
        let fields: Vec<&str> = sort.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a"]);
    }
}
