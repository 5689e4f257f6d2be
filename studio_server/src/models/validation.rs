//! Form validation shared by admin and public write paths.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

/// Trim a required string and check it is non-empty and within `max` chars.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string; blank becomes `None`.
pub fn optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

pub fn email(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = required(field, value, 254)?;
    if !EMAIL_REGEX.is_match(&value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "not a valid email address",
        });
    }
    Ok(value.to_lowercase())
}

/// Absolute http(s) URL check for media and download links.
pub fn http_url(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = required(field, value, 2048)?;
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {
            Ok(value)
        }
        _ => Err(ValidationError::InvalidFormat {
            field,
            reason: "must be an absolute http(s) URL",
        }),
    }
}

pub fn non_negative<T: PartialOrd + Default>(field: &'static str, value: T) -> Result<T, ValidationError> {
    if value < T::default() {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("title", "  Finals  ", 10).unwrap(), "Finals");
        assert_eq!(
            required("title", "   ", 10),
            Err(ValidationError::Empty { field: "title" })
        );
        assert_eq!(
            required("title", "x".repeat(11).as_str(), 10),
            Err(ValidationError::TooLong {
                field: "title",
                max: 10
            })
        );
    }

    #[test]
    fn optional_blank_is_none() {
        assert_eq!(optional("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(optional("notes", None, 10).unwrap(), None);
        assert_eq!(
            optional("notes", Some(" hi "), 10).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn email_shape() {
        assert_eq!(email("email", " Coach@Gym.COM ").unwrap(), "coach@gym.com");
        assert!(email("email", "coach@gym").is_err());
        assert!(email("email", "no spaces@x.io").is_err());
    }

    #[test]
    fn http_url_rejects_other_schemes() {
        assert!(http_url("url", "https://cdn.example.com/a.mp4").is_ok());
        assert!(http_url("url", "javascript:alert(1)").is_err());
        assert!(http_url("url", "/relative/path").is_err());
        assert!(http_url("url", "ftp://files.example.com/a.mp4").is_err());
    }

    #[test]
    fn negative_numbers_rejected() {
        assert_eq!(non_negative("price_cents", 0).unwrap(), 0);
        assert_eq!(
            non_negative("price_cents", -1),
            Err(ValidationError::Negative {
                field: "price_cents"
            })
        );
    }

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 256 characters"
        );
    }
}
