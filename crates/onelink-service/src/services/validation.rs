//! Input checks shared by the use cases

use onelink_core::DomainError;
use reqwest::Url;
use validator::ValidateEmail;

pub const LINK_TITLE_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;
pub const BIO_MAX_LENGTH: usize = 500;

const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "file:", "vbscript:", "blob:"];

/// Accept only absolute http(s) URLs with a host.
///
/// The stored string is the input itself, so control characters that the
/// parser would silently drop are rejected up front.
pub fn check_url(field: &str, url: &str) -> Result<(), DomainError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DomainError::ValidationError(format!("{field} is required")));
    }
    if url.chars().any(char::is_control) {
        return Err(DomainError::ValidationError(format!(
            "{field} must not contain control characters"
        )));
    }

    let lower = url.to_ascii_lowercase();
    if DANGEROUS_SCHEMES.iter().any(|s| lower.starts_with(s))
        || !(lower.starts_with("http://") || lower.starts_with("https://"))
    {
        return Err(DomainError::ValidationError(format!(
            "{field} must start with http:// or https://"
        )));
    }

    match Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(DomainError::ValidationError(format!("{field} is not a valid URL"))),
    }
}

pub fn check_email(email: &str) -> Result<(), DomainError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail)
    }
}

/// Character-count limit
pub fn check_max_chars(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::ContentTooLong { field, max });
    }
    Ok(())
}
