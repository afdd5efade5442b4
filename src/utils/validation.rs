use crate::utils::error::{FitError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> FitError {
    FitError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Checks that `min <= max` for a pair of related settings.
pub fn validate_ordered_pair(field_name: &str, min: u64, max: u64) -> Result<()> {
    if min > max {
        return Err(invalid(
            field_name,
            format!("[{}, {}]", min, max),
            "Lower bound must not exceed upper bound",
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

pub fn validate_image_extension(field_name: &str, path: &str) -> Result<()> {
    const ALLOWED: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| invalid(field_name, path, "File has no extension or invalid filename"))?;

    if !ALLOWED.contains(&extension.as_str()) {
        return Err(invalid(
            field_name,
            path,
            format!(
                "Unsupported image type: {}. Allowed: {}",
                extension,
                ALLOWED.join(", ")
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("service.endpoint", "https://fit.example.com").is_ok());
        assert!(validate_url("service.endpoint", "http://127.0.0.1:5000").is_ok());
        assert!(validate_url("service.endpoint", "").is_err());
        assert!(validate_url("service.endpoint", "not a url").is_err());
        assert!(validate_url("service.endpoint", "ftp://fit.example.com").is_err());
    }

    #[test]
    fn test_validate_ordered_pair() {
        assert!(validate_ordered_pair("simulation", 3000, 5000).is_ok());
        assert!(validate_ordered_pair("simulation", 4000, 4000).is_ok());
        assert!(validate_ordered_pair("simulation", 5000, 3000).is_err());
    }

    #[test]
    fn test_validate_image_extension() {
        assert!(validate_image_extension("image", "person.JPG").is_ok());
        assert!(validate_image_extension("image", "dress.png").is_ok());
        assert!(validate_image_extension("image", "notes.txt").is_err());
        assert!(validate_image_extension("image", "noext").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("simulation.tick_ms", 50, 1).is_ok());
        assert!(validate_positive_number("simulation.tick_ms", 0, 1).is_err());
    }
}
