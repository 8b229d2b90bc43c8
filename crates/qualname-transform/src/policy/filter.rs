//! Glob allow-list for fully qualified names.
//!
//! Matching is case-sensitive shell-style globbing: `*` any run, `?` one
//! character, `[...]` a class, `[!...]` a negated class, `{a,b}` alternatives.
//! No pattern (or an empty one) denies every name.
//!
//! Two edges differ from fnmatch:
//! - `*` and `?` never match `/`. Dotted names have no `/`, so a constructor
//!   string containing one is only admitted by a pattern that spells it out.
//! - `{` and `}` are always syntax. Unbalanced braces (like an unterminated
//!   `[`) are rejected when the filter is built; escape them as `\{` to match
//!   a literal brace.
//!
//! The filter is advisory: it decides which names the resolver will look up,
//! it does not sandbox what resolved code does.

use std::fmt;

use qualname_core::error::{QualnameError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pattern: Option<String>,
}

impl Filter {
    /// The null filter: every name is denied.
    pub fn deny_all() -> Self {
        Self { pattern: None }
    }

    /// Compile a glob pattern. An empty pattern is the null filter.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Ok(Self::deny_all());
        }
        validate_pattern(&pattern)?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn from_option(pattern: Option<&str>) -> Result<Self> {
        match pattern {
            Some(p) => Self::new(p),
            None => Ok(Self::deny_all()),
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn allows(&self, name: &str) -> bool {
        match &self.pattern {
            Some(p) => glob_match::glob_match(p, name),
            None => false,
        }
    }

    pub fn check(&self, name: &str) -> Result<()> {
        if self.allows(name) {
            return Ok(());
        }
        tracing::warn!(name = %name, filter = %self, "name rejected by filter");
        Err(QualnameError::PermissionDenied {
            name: name.to_string(),
            filter: self.to_string(),
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(p) => write!(f, "{p:?}"),
            None => f.write_str("<none>"),
        }
    }
}

/// Rejects unterminated character classes and unbalanced braces.
fn validate_pattern(pattern: &str) -> Result<()> {
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    let mut depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => {
                in_class = true;
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                }
                // A leading `]` is a literal member of the class.
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            ']' if in_class => in_class = false,
            '{' if !in_class => depth += 1,
            '}' if !in_class => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    QualnameError::Config(format!("unmatched `}}` in filter pattern: {pattern}"))
                })?;
            }
            _ => {}
        }
    }
    if in_class {
        return Err(QualnameError::Config(format!(
            "unterminated character class in filter pattern: {pattern}"
        )));
    }
    if depth > 0 {
        return Err(QualnameError::Config(format!(
            "unterminated `{{` in filter pattern: {pattern}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn star_crosses_dots() {
        let f = Filter::new("mypkg.*").unwrap();
        assert!(f.allows("mypkg.sub.Widget"));
        assert!(f.allows("mypkg.Widget"));
        assert!(!f.allows("otherpkg.Widget"));
        assert!(!f.allows("mypkg"));
    }

    #[test]
    fn case_sensitive() {
        let f = Filter::new("mypkg.*").unwrap();
        assert!(!f.allows("MyPkg.Widget"));
    }

    #[test]
    fn single_char_and_classes() {
        let f = Filter::new("pkg.V?").unwrap();
        assert!(f.allows("pkg.V1"));
        assert!(!f.allows("pkg.V10"));

        let f = Filter::new("pkg.[ab]*").unwrap();
        assert!(f.allows("pkg.alpha"));
        assert!(!f.allows("pkg.gamma"));

        let f = Filter::new("pkg.[!_]*").unwrap();
        assert!(f.allows("pkg.public"));
        assert!(!f.allows("pkg._private"));
    }

    #[test]
    fn null_and_empty_filters_deny_everything() {
        for f in [Filter::deny_all(), Filter::new("").unwrap()] {
            let err = f.check("anything").unwrap_err();
            assert_eq!(err.code().as_str(), "PERMISSION_DENIED");
        }
    }

    #[test]
    fn unterminated_class_rejected() {
        assert!(Filter::new("pkg.[ab").is_err());
        assert!(Filter::new("pkg.[]]x").is_ok());
    }

    #[test]
    fn unbalanced_braces_rejected() {
        assert_eq!(Filter::new("pkg.{a").unwrap_err().code().as_str(), "CONFIG");
        assert!(Filter::new("pkg.a}").is_err());
        assert!(Filter::new("pkg.[{]x").is_ok());

        let f = Filter::new("pkg.{Widget,Gadget}").unwrap();
        assert!(f.allows("pkg.Widget"));
        assert!(f.allows("pkg.Gadget"));
        assert!(!f.allows("pkg.Gizmo"));
    }

    #[test]
    fn star_stops_at_slash() {
        let f = Filter::new("*").unwrap();
        assert!(f.allows("pkg.sub.Widget"));
        assert!(!f.allows("pkg/sub.Widget"));
    }

    #[test]
    fn denial_names_filter() {
        let err = Filter::new("a.*").unwrap().check("b.C").unwrap_err();
        assert_eq!(
            err.to_string(),
            "fully qualified name \"b.C\" not allowed by filter \"a.*\""
        );
    }
}
