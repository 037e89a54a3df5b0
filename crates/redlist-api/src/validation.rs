//! Argument checks run before any request is issued

use crate::error::{RedListError, Result};

/// Reject empty or whitespace-only strings, returning the trimmed value
pub fn non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RedListError::Validation(format!("`{}` must not be empty", name)));
    }
    Ok(trimmed)
}

/// Like [`non_empty`], but `None` passes through
pub fn optional_non_empty<'a>(name: &str, value: Option<&'a str>) -> Result<Option<&'a str>> {
    value.map(|v| non_empty(name, v)).transpose()
}

/// Identifiers (SIS ids, assessment ids) start at 1
pub fn positive(name: &str, value: u64) -> Result<u64> {
    if value == 0 {
        return Err(RedListError::Validation(format!("`{}` must be positive", name)));
    }
    Ok(value)
}

/// Pages are numbered from 1
pub fn page_number(page: u32) -> Result<u32> {
    if page == 0 {
        return Err(RedListError::Validation("`page` must be 1 or greater".to_string()));
    }
    Ok(page)
}

/// Four-digit publication year
pub fn year(name: &str, value: u32) -> Result<u32> {
    if !(1000..=9999).contains(&value) {
        return Err(RedListError::Validation(format!(
            "`{}` must be a four-digit year, got {}",
            name, value
        )));
    }
    Ok(value)
}
