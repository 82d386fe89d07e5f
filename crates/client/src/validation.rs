//! Client-side input validation
//!
//! Mirrors the rules the API enforces so that obviously bad input is
//! rejected before a request leaves the process.

use thiserror::Error;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const SEARCH_QUERY_MIN_LEN: usize = 2;
pub const SEARCH_QUERY_MAX_LEN: usize = 100;
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Input rejected before sending
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A field failed its rule
    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Field the error refers to
    pub const fn field(&self) -> &'static str {
        match self {
            Self::PasswordMismatch => "password_confirm",
            Self::Invalid { field, .. } => *field,
        }
    }
}

/// Trimmed username of 3-50 ASCII letters, digits or underscores
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::invalid("username", "is required"));
    }

    let len = username.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err(ValidationError::invalid(
            "username",
            format!("must be at least {USERNAME_MIN_LEN} characters"),
        ));
    }
    if len > USERNAME_MAX_LEN {
        return Err(ValidationError::invalid(
            "username",
            format!("must be at most {USERNAME_MAX_LEN} characters"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::invalid(
            "username",
            "may only contain letters, digits and underscores",
        ));
    }

    Ok(username.to_string())
}

/// Trimmed, lowercased address with a local part and a dotted domain
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::invalid("email", "is required"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(ValidationError::invalid("email", "is not a valid address"))
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(ValidationError::invalid("password", "is required"));
    }
    if len < PASSWORD_MIN_LEN {
        return Err(ValidationError::invalid(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(ValidationError::invalid(
            "password",
            format!("must be at most {PASSWORD_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    password_confirm: &str,
) -> Result<(), ValidationError> {
    if password == password_confirm {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::invalid(field, "is required"))
    } else {
        Ok(())
    }
}

/// Page numbers start at 1; page sizes are capped at 50
pub fn validate_pagination(page: u32, limit: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::invalid("page", "must be at least 1"));
    }
    if limit < 1 {
        return Err(ValidationError::invalid("limit", "must be at least 1"));
    }
    if limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::invalid(
            "limit",
            format!("must be at most {MAX_PAGE_LIMIT}"),
        ));
    }
    Ok(())
}

/// Resource ids are positive
pub fn validate_id(field: &'static str, id: i64) -> Result<(), ValidationError> {
    if id < 1 {
        Err(ValidationError::invalid(field, "must be positive"))
    } else {
        Ok(())
    }
}

pub fn validate_concept_id(concept_id: i64) -> Result<(), ValidationError> {
    validate_id("concept_id", concept_id)
}

/// Trimmed search query of 2-100 characters
pub fn validate_search_query(query: &str) -> Result<String, ValidationError> {
    let query = query.trim();
    let len = query.chars().count();
    if len == 0 {
        return Err(ValidationError::invalid("q", "is required"));
    }
    if len < SEARCH_QUERY_MIN_LEN {
        return Err(ValidationError::invalid(
            "q",
            format!("must be at least {SEARCH_QUERY_MIN_LEN} characters"),
        ));
    }
    if len > SEARCH_QUERY_MAX_LEN {
        return Err(ValidationError::invalid(
            "q",
            format!("must be at most {SEARCH_QUERY_MAX_LEN} characters"),
        ));
    }
    Ok(query.to_string())
}

/// Non-blank, trimmed concept names
pub fn validate_concept_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, ValidationError> {
    let names: Vec<String> = names
        .iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        Err(ValidationError::invalid(
            "concepts",
            "at least one concept name is required",
        ))
    } else {
        Ok(names)
    }
}
