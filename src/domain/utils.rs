//! Domain-specific shared validations and formatting utilities

use std::borrow::Cow;

use serde_json::Value;

use crate::errors::AppError;

pub const DESCRIPTION_LIMIT: usize = 100;
pub const ELLIPSIS: &str = "...";

/// The query must be a non-empty string. It is returned untouched so the upstream sees
/// exactly what the caller sent.
pub fn normalize_query(query: Option<&Value>) -> Result<String, AppError> {
    query
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(AppError::missing_query)
}

/// `1234567` -> `1,234,567`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}

pub fn truncate_description(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
