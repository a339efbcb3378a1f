//! Human-readable trigger export.
//!
//! The YAML export is a lossy projection: server-managed keys are removed and
//! empty entries dropped. It is not meant to be read back.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::trigger::Trigger;

/// Top-level keys never exported.
pub const EXCLUDED_KEYS: [&str; 5] = ["id", "sched", "patterns", "has_escalations", "throttling"];

/// Export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Projected YAML.
    #[default]
    Yaml,
    /// Full pretty-printed JSON.
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Projects any serializable record to its exportable top-level entries.
///
/// # Errors
///
/// Returns an error when the record does not serialize to a JSON object.
pub fn project_for_export<T: Serialize>(record: &T) -> Result<Map<String, Value>> {
    let Value::Object(map) = serde_json::to_value(record)? else {
        return Err(CoreError::Serialization(
            "export expects a record that serializes to an object".to_string(),
        ));
    };
    Ok(map
        .into_iter()
        .filter(|(key, value)| !EXCLUDED_KEYS.contains(&key.as_str()) && !is_blank(value))
        .collect())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Renders a trigger in the given format.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn export_trigger(trigger: &Trigger, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Yaml => Ok(serde_yaml::to_string(&project_for_export(trigger)?)?),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(trigger)?),
    }
}

/// Default download name, `trigger-{id}.{ext}`.
#[must_use]
pub fn export_file_name(trigger: &Trigger, format: ExportFormat) -> String {
    format!("trigger-{}.{}", trigger.id, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projection_drops_excluded_and_blank_entries() {
        let record = json!({
            "id": "t1",
            "sched": {"days": []},
            "name": "X",
            "desc": "",
            "ttl": 0,
            "dashboard": null,
            "tags": [],
        });
        let projected = project_for_export(&record).unwrap();
        assert!(!projected.contains_key("id"));
        assert!(!projected.contains_key("sched"));
        assert!(!projected.contains_key("desc"));
        assert!(!projected.contains_key("dashboard"));
        assert_eq!(projected["ttl"], 0);
        assert_eq!(projected["name"], "X");
        // only top-level entries are filtered
        assert_eq!(projected["tags"], json!([]));
    }

    #[test]
    fn projection_rejects_non_objects() {
        assert!(project_for_export(&json!([1, 2])).is_err());
    }

    #[test]
    fn yaml_export_of_trigger() {
        let mut trigger = Trigger::named("cpu");
        trigger.id = "abc".into();
        trigger.targets = vec!["servers.*.cpu".into()];
        trigger.desc = Some(String::new());

        let yaml = export_trigger(&trigger, ExportFormat::Yaml).unwrap();
        assert!(yaml.contains("name: cpu"));
        assert!(yaml.contains("ttl: 600"));
        assert!(!yaml.contains("id: abc"));
        assert!(!yaml.contains("sched"));
        assert!(!yaml.contains("desc"));
        assert!(!yaml.contains("throttling"));
        assert_eq!(export_file_name(&trigger, ExportFormat::Yaml), "trigger-abc.yaml");
    }

    #[test]
    fn json_export_is_complete() {
        let mut trigger = Trigger::named("cpu");
        trigger.id = "abc".into();
        let json = export_trigger(&trigger, ExportFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "abc");
        assert!(value.get("sched").is_some());
    }
}
