use std::fmt;

/// Machine-readable error codes for user-facing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    ConfigParseError,
    InputParseError,
    FocusNotFound,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InputParseError => "E1003",
            Self::FocusNotFound => "E2001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Analysis input not found",
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Analysis input parse error",
            Self::FocusNotFound => "Focus target not found",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => Some("Pass the extractor output with `--input <file>`."),
            Self::ConfigParseError => Some("Fix syntax in .wavemap/config.toml and retry."),
            Self::InputParseError => {
                Some("Expect a JSON array of component analyses (or {\"components\": [...]}).")
            }
            Self::FocusNotFound => {
                Some("Use a full id (c:name, page:Name) or a unique suffix of one.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 5] = [
        ErrorCode::InputNotFound,
        ErrorCode::ConfigParseError,
        ErrorCode::InputParseError,
        ErrorCode::FocusNotFound,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::FocusNotFound.to_string(), "E2001");
    }
}
