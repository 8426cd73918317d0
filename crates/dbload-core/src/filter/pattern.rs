//! Name pattern filters.

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;

/// Inclusion/exclusion rules over simple object names.
///
/// Patterns are regular expressions that must match the whole name.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
    nothing: bool,
}

impl PatternFilter {
    /// A filter with no rules, which includes every name.
    pub fn everything() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            nothing: false,
        }
    }

    /// A filter that includes no name at all.
    pub fn nothing() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            nothing: true,
        }
    }

    /// Build a filter from include and exclude patterns.
    ///
    /// With no includes, every name not excluded is included.
    pub fn from_patterns<I, E>(includes: I, excludes: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut filter = Self::everything();
        for pattern in includes {
            filter = filter.include(pattern.as_ref())?;
        }
        for pattern in excludes {
            filter = filter.exclude(pattern.as_ref())?;
        }
        Ok(filter)
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.includes.push(compile(pattern)?);
        self.nothing = false;
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.excludes.push(compile(pattern)?);
        Ok(self)
    }

    /// Whether the name passes this filter.
    pub fn included(&self, name: &str) -> bool {
        if self.nothing {
            return false;
        }
        if !self.includes.is_empty() && !self.includes.iter().any(|p| p.is_match(name)) {
            return false;
        }
        !self.excludes.iter().any(|p| p.is_match(name))
    }

    /// True when this filter matches nothing, so work guarded by it can be skipped.
    pub fn is_empty(&self) -> bool {
        self.nothing
    }
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self::everything()
    }
}

impl fmt::Display for PatternFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nothing {
            return write!(f, "NONE");
        }
        if self.includes.is_empty() && self.excludes.is_empty() {
            return write!(f, "ALL");
        }
        let mut first = true;
        for p in &self.includes {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "+({})", pattern_source(p))?;
            first = false;
        }
        for p in &self.excludes {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "-({})", pattern_source(p))?;
            first = false;
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn pattern_source(regex: &Regex) -> &str {
    let src = regex.as_str();
    src.strip_prefix("^(?:")
        .and_then(|s| s.strip_suffix(")$"))
        .unwrap_or(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_includes_all() {
        let filter = PatternFilter::everything();
        assert!(filter.included("EMP"));
        assert!(filter.included(""));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_nothing_is_empty() {
        let filter = PatternFilter::nothing();
        assert!(!filter.included("EMP"));
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "NONE");
    }

    #[test]
    fn test_include_requires_full_match() {
        let filter = PatternFilter::everything().include("EMP.*").unwrap();
        assert!(filter.included("EMPLOYEE"));
        assert!(!filter.included("XEMP"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = PatternFilter::from_patterns(["EMP.*"], ["EMP_AUDIT"]).unwrap();
        assert!(filter.included("EMP"));
        assert!(!filter.included("EMP_AUDIT"));
    }

    #[test]
    fn test_exclude_only() {
        let filter = PatternFilter::from_patterns(Vec::<&str>::new(), ["tmp_.*"]).unwrap();
        assert!(filter.included("users"));
        assert!(!filter.included("tmp_users"));
    }

    #[test]
    fn test_include_revives_nothing() {
        let filter = PatternFilter::nothing().include("proc_.*").unwrap();
        assert!(!filter.is_empty());
        assert!(filter.included("proc_a"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternFilter::everything().include("(").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_display() {
        let filter = PatternFilter::from_patterns(["A.*"], ["AB"]).unwrap();
        assert_eq!(filter.to_string(), "+(A.*) -(AB)");
        assert_eq!(PatternFilter::everything().to_string(), "ALL");
    }
}
