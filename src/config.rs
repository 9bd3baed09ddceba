use serde::Deserialize;

/// Default cap on decoded key/value pairs
pub const DEFAULT_MAX_VARS: usize = 1000;
/// Default cap on bracket nesting (`a[b][c]` has depth 2)
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while decoding a query string.
///
/// Can be loaded from any serde source; missing fields take their defaults.
///
/// ```rust
/// let config: querycrate::ParserConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
/// assert_eq!(config.max_depth, 4);
/// assert_eq!(config.max_vars, querycrate::config::DEFAULT_MAX_VARS);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Pairs beyond this count are dropped
    pub max_vars: usize,
    /// Pairs nested deeper than this are dropped
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_vars: DEFAULT_MAX_VARS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub const fn with_max_vars(mut self, max_vars: usize) -> Self {
        self.max_vars = max_vars;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.max_vars, 1000);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"max_vars": 10}"#).unwrap();
        assert_eq!(config, ParserConfig::default().with_max_vars(10));
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: ParserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ParserConfig::default());
    }
}
