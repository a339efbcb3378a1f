//! Contact value rules per channel type.

use moira_core::{ContactConfig, ContactType};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// `http(s)://` followed by a non-blank remainder.
static PROTOCOL_AND_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:http|https)://(\S+)$").unwrap_or_else(|_| unreachable!()));

/// A `10.x.x.x` address with an optional port.
static INTERNAL_IP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^10\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(?::\d+)?",
    )
    .unwrap_or_else(|_| unreachable!())
});

/// A host under `.ru` with an optional port.
static RU_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+\.ru(?::\d+)?").unwrap_or_else(|_| unreachable!()));

/// A Russian phone number, optionally prefixed with `+7` or `8`.
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((\+7)|8)?\d{10}").unwrap_or_else(|_| unreachable!()));

const VALUE: &str = "value";
const FALLBACK_VALUE: &str = "fallback_value";

/// True when `value` is an `http(s)` URL pointing into the internal network.
#[must_use]
pub fn is_internal_url(value: &str) -> bool {
    PROTOCOL_AND_DOMAIN
        .captures(value)
        .and_then(|c| c.get(1))
        .is_some_and(|rest| INTERNAL_IP.is_match(rest.as_str()) || RU_DOMAIN.is_match(rest.as_str()))
}

/// Validates a contact value against the rules for its type.
///
/// Built-in types have fixed rules. `mail` and custom types are checked
/// against the regex declared in `config`; a blank or unparsable regex
/// accepts anything.
pub fn validate_contact(
    config: &ContactConfig,
    value: &str,
    fallback_value: Option<&str>,
) -> Result<(), ValidationError> {
    let blank = value.trim().is_empty();
    match &config.kind {
        ContactType::Email => {
            if blank || !value.contains('@') {
                return Err(ValidationError::invalid_format(
                    VALUE,
                    "an email address",
                    "Please enter a valid email address",
                ));
            }
        }
        ContactType::Pushover => {
            if blank || value.trim().chars().any(char::is_whitespace) {
                return Err(ValidationError::invalid_format(
                    VALUE,
                    "a pushover user key",
                    "Please enter a valid pushover user key",
                ));
            }
        }
        ContactType::Telegram => {
            if blank {
                return Err(ValidationError::empty(
                    VALUE,
                    "Enter a valid telegram #channel, @username or group",
                ));
            }
        }
        ContactType::Slack => {
            if blank {
                return Err(ValidationError::empty(
                    VALUE,
                    "Enter a valid slack #channel, @username or group",
                ));
            }
            let addressed = value.starts_with('@') || value.starts_with('#');
            let has_fallback = fallback_value.is_some_and(|f| !f.trim().is_empty());
            if !addressed && !has_fallback {
                return Err(ValidationError::empty(
                    FALLBACK_VALUE,
                    "Enter a fallback #channel, @username or group",
                ));
            }
        }
        ContactType::Webhook => {
            if blank || !is_internal_url(value) {
                return Err(ValidationError::invalid_format(
                    VALUE,
                    "an internal http(s) URL",
                    "Enter valid url",
                ));
            }
        }
        ContactType::TwilioSms | ContactType::TwilioVoice => {
            if blank {
                return Err(ValidationError::empty(VALUE, "Enter your phone number"));
            }
            if !PHONE.is_match(value.trim()) {
                return Err(ValidationError::invalid_format(
                    VALUE,
                    "a russian phone number",
                    "Enter a valid russian phone number. Phone number should starts with 8 or +7.",
                ));
            }
        }
        ContactType::Mail | ContactType::Custom(_) => validate_declared_format(config, value)?,
    }
    Ok(())
}

fn validate_declared_format(config: &ContactConfig, value: &str) -> Result<(), ValidationError> {
    if config.validation.is_empty() {
        return Ok(());
    }
    let Ok(pattern) = Regex::new(&config.validation) else {
        return Ok(());
    };
    if pattern.is_match(value) {
        return Ok(());
    }
    let message = match config.help.as_deref() {
        Some(help) if !help.is_empty() => format!("Please enter value in correct format: {help}"),
        _ => "Please enter value in correct format.".to_string(),
    };
    Err(ValidationError::invalid_format(
        VALUE,
        config.validation.clone(),
        message,
    ))
}
