use crate::domain::model::AuthRequest;
use crate::utils::error::{ApiError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The backend root every endpoint path is joined onto: http(s) only, and no
/// query or fragment since those would be dropped by the join.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            url_str,
            "Base URL cannot carry a query or fragment",
        ));
    }
    Ok(())
}

/// The session file is written whole, so the path must name a file.
pub fn validate_session_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    if path.ends_with('/') || path.ends_with('\\') {
        return Err(invalid(field_name, path, "Path must name a file, not a directory"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

impl Validate for AuthRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(invalid("email", &self.email, "Not an email address"));
        }
        // Never echo the password back.
        if self.password.is_empty() {
            return Err(invalid("password", "", "Value cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("base_url", "http://localhost:8018").is_ok());
        assert!(validate_base_url("base_url", "https://budget.example.com/api/").is_ok());
        assert!(validate_base_url("base_url", "").is_err());
        assert!(validate_base_url("base_url", "localhost").is_err());
        assert!(validate_base_url("base_url", "ftp://example.com").is_err());
        assert!(validate_base_url("base_url", "http://example.com/?v=1").is_err());
        assert!(validate_base_url("base_url", "http://example.com/#top").is_err());
    }

    #[test]
    fn test_validate_session_path() {
        assert!(validate_session_path("session.path", "./session.json").is_ok());
        assert!(validate_session_path("session.path", "").is_err());
        assert!(validate_session_path("session.path", "bad\0path").is_err());
        assert!(validate_session_path("session.path", ".bablo/").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("timeout_seconds", 601u64, 1, 600).is_err());
    }

    #[test]
    fn test_credentials() {
        let auth = |email: &str, password: &str| AuthRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        assert!(auth("user@example.com", "secret").validate().is_ok());
        assert!(auth("   ", "secret").validate().is_err());
        assert!(auth("user", "secret").validate().is_err());

        match auth("user@example.com", "").validate() {
            Err(ApiError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "password");
                assert!(value.is_empty());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
