//! Delivery channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type of a delivery channel.
///
/// Types not built into the console are carried as [`ContactType::Custom`]
/// and validated with the regex the server declares for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactType {
    /// `mail`
    Mail,
    /// `email`
    Email,
    /// `pushover`
    Pushover,
    /// `telegram`
    Telegram,
    /// `slack`
    Slack,
    /// `twilio sms`
    TwilioSms,
    /// `twilio voice`
    TwilioVoice,
    /// `webhook`
    Webhook,
    /// Any other server-declared type.
    Custom(String),
}

impl ContactType {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mail => "mail",
            Self::Email => "email",
            Self::Pushover => "pushover",
            Self::Telegram => "telegram",
            Self::Slack => "slack",
            Self::TwilioSms => "twilio sms",
            Self::TwilioVoice => "twilio voice",
            Self::Webhook => "webhook",
            Self::Custom(name) => name,
        }
    }

    /// Human-readable caption. Custom types use their wire name.
    #[must_use]
    pub fn caption(&self) -> &str {
        match self {
            Self::Mail | Self::Email => "EMail",
            Self::Pushover => "Pushover",
            Self::Telegram => "Telegram",
            Self::Slack => "slack",
            Self::TwilioSms => "Twilio SMS",
            Self::TwilioVoice => "Twilio voice",
            Self::Webhook => "WebHook",
            Self::Custom(name) => name,
        }
    }

    /// True for the two Twilio phone channels.
    #[must_use]
    pub const fn is_phone(&self) -> bool {
        matches!(self, Self::TwilioSms | Self::TwilioVoice)
    }
}

impl From<String> for ContactType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "mail" => Self::Mail,
            "email" => Self::Email,
            "pushover" => Self::Pushover,
            "telegram" => Self::Telegram,
            "slack" => Self::Slack,
            "twilio sms" => Self::TwilioSms,
            "twilio voice" => Self::TwilioVoice,
            "webhook" => Self::Webhook,
            _ => Self::Custom(s),
        }
    }
}

impl From<&str> for ContactType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ContactType> for String {
    fn from(t: ContactType) -> Self {
        match t {
            ContactType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for ContactType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact ID.
    pub id: String,
    /// Channel type.
    #[serde(rename = "type")]
    pub kind: ContactType,
    /// Owner login.
    #[serde(default)]
    pub user: String,
    /// Address, key or URL.
    pub value: String,
    /// Secondary address for channels that support one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<String>,
}

impl Contact {
    /// Returns a copy with the patch applied.
    #[must_use]
    pub fn merged(&self, patch: &ContactPatch) -> Self {
        let mut next = self.clone();
        if let Some(kind) = &patch.kind {
            next.kind = kind.clone();
        }
        if let Some(value) = &patch.value {
            next.value.clone_from(value);
        }
        if let Some(fallback) = &patch.fallback_value {
            next.fallback_value.clone_from(fallback);
        }
        next
    }

    /// True when the value contains `needle`, ignoring case.
    #[must_use]
    pub fn value_contains(&self, needle: &str) -> bool {
        self.value.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Payload of a contact creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCreateInfo {
    /// Channel type.
    #[serde(rename = "type")]
    pub kind: ContactType,
    /// Address, key or URL.
    pub value: String,
    /// Secondary address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<String>,
    /// Owner login.
    #[serde(default)]
    pub user: String,
}

/// A partial contact edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    /// New channel type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContactType>,
    /// New value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// New fallback; `Some(None)` clears it.
    #[serde(default, deserialize_with = "crate::de::double_option", skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<Option<String>>,
}

/// Response of `GET /contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    /// All contacts.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub list: Vec<Contact>,
}

/// Normalizes a contact value before it is sent to the API.
///
/// Values are trimmed. Russian phone numbers are brought to `+7` form and
/// webhook URLs are lowercased.
#[must_use]
pub fn normalize_value_for_api(kind: &ContactType, value: &str) -> String {
    let trimmed = value.trim();
    if kind.is_phone() {
        let len = trimmed.chars().count();
        if len >= 11 {
            if let Some(rest) = trimmed.strip_prefix('8').or_else(|| trimmed.strip_prefix('7')) {
                return format!("+7{rest}");
            }
        } else if len == 10 {
            return format!("+7{trimmed}");
        }
        return trimmed.to_string();
    }
    if *kind == ContactType::Webhook {
        return trimmed.to_lowercase();
    }
    trimmed.to_string()
}

/// Normalizes a contact value received from the API for display.
#[must_use]
pub fn normalize_value_for_ui(_kind: &ContactType, value: &str) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ContactType::TwilioSms, " 89991234567 ", "+79991234567" ; "leading eight")]
    #[test_case(ContactType::TwilioVoice, "79991234567", "+79991234567" ; "leading seven")]
    #[test_case(ContactType::TwilioSms, "9991234567", "+79991234567" ; "ten digits")]
    #[test_case(ContactType::TwilioSms, "+79991234567", "+79991234567" ; "already normalized")]
    #[test_case(ContactType::TwilioSms, "12345", "12345" ; "short value untouched")]
    #[test_case(ContactType::Webhook, " HTTPS://Hook.RU/x ", "https://hook.ru/x" ; "webhook lowercased")]
    #[test_case(ContactType::Telegram, "  @Ops  ", "@Ops" ; "other types trimmed")]
    fn api_normalization(kind: ContactType, input: &str, expected: &str) {
        assert_eq!(normalize_value_for_api(&kind, input), expected);
    }

    #[test]
    fn contact_type_round_trips_through_strings() {
        let kind: ContactType = serde_json::from_str("\"twilio sms\"").unwrap();
        assert_eq!(kind, ContactType::TwilioSms);
        let custom: ContactType = serde_json::from_str("\"msteams\"").unwrap();
        assert_eq!(custom, ContactType::Custom("msteams".into()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"msteams\"");
    }

    #[test]
    fn captions() {
        assert_eq!(ContactType::Mail.caption(), "EMail");
        assert_eq!(ContactType::TwilioVoice.caption(), "Twilio voice");
        assert_eq!(ContactType::Custom("msteams".into()).caption(), "msteams");
    }

    #[test]
    fn contact_merge_clears_fallback() {
        let contact = Contact {
            id: "c1".into(),
            kind: ContactType::Slack,
            user: "u".into(),
            value: "ops".into(),
            fallback_value: Some("#ops".into()),
        };
        let patch = ContactPatch {
            value: Some("@ops".into()),
            fallback_value: Some(None),
            ..ContactPatch::default()
        };
        let next = contact.merged(&patch);
        assert_eq!(next.value, "@ops");
        assert_eq!(next.fallback_value, None);
        assert_eq!(next.id, "c1");
    }

    #[test]
    fn contact_uses_type_wire_name() {
        let contact: Contact =
            serde_json::from_str(r#"{"id":"1","type":"mail","user":"u","value":"a@b.c"}"#).unwrap();
        assert_eq!(contact.kind, ContactType::Mail);
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["type"], "mail");
        assert!(json.get("fallback_value").is_none());
    }
}
