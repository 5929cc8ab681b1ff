use crate::output::CliError;
use elementmap_core::{ErrorCode, parse_element_id};

pub const MAX_LOCALE_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
            code,
        }
    }

    pub fn to_cli_error(&self) -> CliError {
        CliError::with_details(
            format!("invalid {} '{}': {}", self.field, self.value, self.reason),
            self.suggestion.clone(),
            self.code,
        )
    }
}

pub fn validate_element_id(raw: &str) -> Result<i64, ValidationError> {
    parse_element_id(raw).map_err(|_| {
        ValidationError::new(
            "element id",
            raw,
            "must be a positive integer",
            "pass the numeric id shown in the control panel URL, e.g. `elementmap map 42`",
            ErrorCode::InvalidElementId.code(),
        )
    })
}

pub fn validate_locale(s: &str) -> Result<(), ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::new(
            "locale",
            s,
            "must not be empty",
            "provide a locale id such as `en_us` or `de`",
            ErrorCode::InvalidLocale.code(),
        ));
    }
    if s.len() > MAX_LOCALE_LEN {
        return Err(ValidationError::new(
            "locale",
            s,
            format!("must be <= {MAX_LOCALE_LEN} characters"),
            "use the short locale id stored in the relations table",
            ErrorCode::InvalidLocale.code(),
        ));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::new(
            "locale",
            s,
            "may only contain ASCII letters, digits, '_' and '-'",
            "use the locale id exactly as stored, e.g. `en_us`",
            ErrorCode::InvalidLocale.code(),
        ));
    }
    Ok(())
}
