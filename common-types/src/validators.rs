use ::std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::{Host, Url};

// Characters a password must draw at least one of, and the only
// non-alphanumeric characters it may contain at all
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "@$!%*?&";
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const EMAIL_MAX_LENGTH: usize = 320;

lazy_static!{
    static ref URL_SCHEME: Regex = {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("Failed to compile URL_SCHEME")
    };
    static ref URL_HOST_LABEL: Regex = {
        Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_-]{0,61}[A-Za-z0-9_])?$").expect("Failed to compile URL_HOST_LABEL")
    };
    static ref TOP_LEVEL_LABEL: Regex = {
        Regex::new(r"^([A-Za-z]{2,20}|xn--([A-Za-z0-9]+-)*[A-Za-z0-9]+)$").expect("Failed to compile TOP_LEVEL_LABEL")
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Email,
    Url,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Format::Email => write!(f, "Invalid email address."),
            Format::Url => write!(f, "Invalid URL."),
        }
    }
}

/// Why a single field value was rejected. The `Display` output is the message
/// shown back to whoever submitted the form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationError {
    #[error("This field is required.")]
    MissingValue,
    #[error("{0}")]
    InvalidFormat(Format),
    #[error("Password must be at least 8 characters long, include an uppercase letter, a lowercase letter, a digit, and a special character.")]
    WeakPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        ValidationResult {
            ok: true,
            message: None,
            error: None,
        }
    }

    pub fn fail(error: ValidationError) -> Self {
        ValidationResult {
            ok: false,
            message: Some(error.to_string()),
            error: Some(error),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationResult::pass(),
            Err(err) => ValidationResult::fail(err),
        }
    }
}

/// A stateless check attached to a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Required,
    Email { require_tld: bool },
    Url { require_tld: bool, allow_ip: bool },
    PasswordComplexity,
}

impl Validator {
    /// Absent values are judged as empty text by every validator but `Required`.
    pub fn check(&self, value: Option<&str>) -> Result<(), ValidationError> {
        match *self {
            Validator::Required => required(value),
            Validator::Email { require_tld } => email_shape(value.unwrap_or_default(), require_tld),
            Validator::Url { require_tld, allow_ip } => url_shape(value.unwrap_or_default(), require_tld, allow_ip),
            Validator::PasswordComplexity => password_complexity(value.unwrap_or_default()),
        }
    }

    // A failed required check skips the rest of the field's chain
    pub fn stops_chain_on_failure(&self) -> bool {
        matches!(self, Validator::Required)
    }
}

pub fn required(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingValue),
    }
}

pub fn email_shape(value: &str, require_tld: bool) -> Result<(), ValidationError> {
    let invalid = Err(ValidationError::InvalidFormat(Format::Email));
    if value.len() > EMAIL_MAX_LENGTH || garde::rules::email::parse_email(value).is_err() {
        return invalid;
    }
    if require_tld {
        let domain = value.rsplit_once('@').map_or("", |(_, domain)| domain);
        // Domain literals such as [127.0.0.1] carry no top-level label
        let numeric_tld = domain.rsplit('.').next().map_or(true, |tld| tld.chars().all(|c| c.is_ascii_digit()));
        if domain.starts_with('[') || !domain.contains('.') || numeric_tld {
            return invalid;
        }
    }
    Ok(())
}

pub fn url_shape(value: &str, require_tld: bool, allow_ip: bool) -> Result<(), ValidationError> {
    let invalid = Err(ValidationError::InvalidFormat(Format::Url));
    // The parser strips surrounding whitespace, drops tabs and newlines, and
    // accepts `scheme:host`, so the raw text is held to `scheme://` first
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) || !URL_SCHEME.is_match(value) {
        return invalid;
    }
    let Ok(url) = Url::parse(value) else {
        return invalid;
    };
    match url.host() {
        None => invalid,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            if allow_ip { Ok(()) } else { invalid }
        },
        Some(Host::Domain(domain)) => {
            let labels: Vec<&str> = domain.split('.').collect();
            if !labels.iter().all(|label| URL_HOST_LABEL.is_match(label)) {
                return invalid;
            }
            if require_tld {
                let valid_tld = labels.last().map_or(false, |tld| TOP_LEVEL_LABEL.is_match(tld));
                if labels.len() < 2 || !valid_tld {
                    return invalid;
                }
            }
            Ok(())
        },
    }
}

// Same acceptance set as
// ^(?=.*[A-Z])(?=.*[a-z])(?=.*\d)(?=.*[@$!%*?&])[A-Za-z\d@$!%*?&]{8,}$
// with \d restricted to ASCII digits
pub fn password_complexity(value: &str) -> Result<(), ValidationError> {
    let is_special = |c: char| PASSWORD_SPECIAL_CHARACTERS.contains(c);
    let only_allowed = value.chars().all(|c| c.is_ascii_alphanumeric() || is_special(c));
    // All allowed characters are single byte, so byte length is character count
    let long_enough = value.len() >= PASSWORD_MIN_LENGTH;

    if only_allowed
        && long_enough
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(is_special)
    {
        return Ok(());
    }
    Err(ValidationError::WeakPassword)
}
