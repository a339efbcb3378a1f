//! Trigger form rules and the Grafana dashboard link check.

use moira_core::Trigger;
use url::Url;

use crate::builder::{ValidationBuilder, CANT_BE_EMPTY};
use crate::error::{ValidationError, ValidationErrorKind};

const DASHBOARD: &str = "dashboard";
const PANEL_ID: &str = "panelId";

/// Validates a trigger before it is saved.
///
/// Every failure is reported, not just the first one. The dashboard link is
/// checked against `grafana_prefixes` with [`validate_dashboard`], and only
/// when at least one prefix is configured.
pub fn validate_trigger(trigger: &Trigger, grafana_prefixes: &[String]) -> Result<(), Vec<ValidationError>> {
    let mut builder = ValidationBuilder::new()
        .validate_not_empty("name", &trigger.name, CANT_BE_EMPTY)
        .validate_not_empty_list("targets", &trigger.targets, CANT_BE_EMPTY);

    for (i, target) in trigger.targets.iter().enumerate() {
        builder = builder.validate_not_empty(&format!("targets[{i}]"), target, CANT_BE_EMPTY);
    }

    builder = builder
        .validate_not_empty_list("tags", &trigger.tags, "Select at least one tag")
        .check(!trigger.uses_expression() && trigger.targets.len() > 1, || {
            ValidationError::empty("expression", "Expression can't be empty")
        })
        .check(
            !trigger.is_advanced() && trigger.warn_value.is_none() && trigger.error_value.is_none(),
            || ValidationError::empty("warn_value", CANT_BE_EMPTY),
        );

    for (i, saturation) in trigger.saturation.iter().enumerate() {
        builder = builder.check(saturation.kind.is_none(), || {
            ValidationError::empty(format!("saturation[{i}].type"), "Type should not be empty")
        });
    }

    // Without Grafana the link is not editable, so a stored one is kept as is.
    if !grafana_prefixes.is_empty() {
        let dashboard = trigger.dashboard.as_deref().unwrap_or_default();
        builder = builder.validate(|| validate_dashboard(dashboard, grafana_prefixes));
    }
    builder.finish()
}

/// Checks a Grafana panel link.
///
/// A blank link passes. Otherwise it must parse as a URL, start with one of
/// the configured prefixes and carry a positive `panelId` query parameter.
pub fn validate_dashboard(value: &str, grafana_prefixes: &[String]) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    let url = Url::parse(value).map_err(|e| {
        ValidationError::new(
            DASHBOARD,
            ValidationErrorKind::InvalidUrl {
                reason: e.to_string(),
            },
            e.to_string(),
        )
    })?;

    let normalized = url.as_str();
    if !grafana_prefixes.iter().any(|p| normalized.starts_with(p.as_str())) {
        let message = match grafana_prefixes {
            [] => "Grafana is not configured. This field should be empty".to_string(),
            [only] => format!("Invalid host. Should start with {only}"),
            many => format!("Invalid host. Should start with any of these: {}", many.join(", ")),
        };
        return Err(ValidationError::new(
            DASHBOARD,
            ValidationErrorKind::HostNotAllowed {
                allowed: grafana_prefixes.to_vec(),
            },
            message,
        ));
    }

    let Some((_, panel)) = url.query_pairs().find(|(k, _)| k == PANEL_ID) else {
        return Err(ValidationError::new(
            DASHBOARD,
            ValidationErrorKind::MissingParameter {
                name: PANEL_ID.to_string(),
            },
            "Param panelId is not found in url",
        ));
    };

    let positive = panel.trim().parse::<f64>().is_ok_and(|id| id > 0.0);
    if !positive {
        return Err(ValidationError::new(
            DASHBOARD,
            ValidationErrorKind::NotPositive,
            "Bad panelId value. Should be positive number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use moira_core::{SaturationType, TriggerSaturation};
    use test_case::test_case;

    fn valid_trigger() -> Trigger {
        let mut trigger = Trigger::named("cpu");
        trigger.targets = vec!["servers.*.cpu".into()];
        trigger.tags = vec!["prod".into()];
        trigger.warn_value = Some(80.0);
        trigger
    }

    fn prefixes() -> Vec<String> {
        vec!["https://grafana.example.ru/".into()]
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_trigger_passes() {
        assert!(validate_trigger(&valid_trigger(), &prefixes()).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut trigger = valid_trigger();
        trigger.name = " ".into();
        trigger.tags.clear();
        trigger.targets.push(String::new());
        trigger.saturation.push(TriggerSaturation::default());

        let errors = validate_trigger(&trigger, &prefixes()).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["name", "targets[1]", "tags", "expression", "saturation[0].type"]
        );
        assert_eq!(errors[2].message, "Select at least one tag");
        assert_eq!(errors[3].message, "Expression can't be empty");
    }

    #[test]
    fn no_targets_fails() {
        let mut trigger = valid_trigger();
        trigger.targets.clear();
        let errors = validate_trigger(&trigger, &prefixes()).unwrap_err();
        assert_eq!(fields(&errors), vec!["targets"]);
    }

    #[test]
    fn simple_mode_needs_a_threshold() {
        let mut trigger = valid_trigger();
        trigger.warn_value = None;
        let errors = validate_trigger(&trigger, &prefixes()).unwrap_err();
        assert_eq!(fields(&errors), vec!["warn_value"]);

        trigger.error_value = Some(90.0);
        assert!(validate_trigger(&trigger, &prefixes()).is_ok());
    }

    #[test]
    fn stored_dashboard_is_ignored_without_grafana() {
        let mut trigger = valid_trigger();
        trigger.dashboard = Some("http://grafana.local/d/x?panelId=3".into());
        assert!(validate_trigger(&trigger, &[]).is_ok());

        let errors = validate_trigger(&trigger, &prefixes()).unwrap_err();
        assert_eq!(fields(&errors), vec!["dashboard"]);
    }

    #[test]
    fn several_targets_need_no_threshold() {
        let mut trigger = valid_trigger();
        trigger.warn_value = None;
        trigger.targets.push("servers.*.mem".into());
        let errors = validate_trigger(&trigger, &prefixes()).unwrap_err();
        assert_eq!(fields(&errors), vec!["expression"]);
    }

    #[test]
    fn expression_replaces_thresholds() {
        let mut trigger = valid_trigger();
        trigger.warn_value = None;
        trigger.targets.push("servers.*.mem".into());
        trigger.expression = "t1 > t2 ? ERROR : OK".into();
        trigger.saturation.push(TriggerSaturation {
            kind: Some(SaturationType::CheckPort),
            ..TriggerSaturation::default()
        });
        assert!(validate_trigger(&trigger, &prefixes()).is_ok());
    }

    #[test_case("", None ; "blank passes")]
    #[test_case("https://grafana.example.ru/d/x?panelId=4", None ; "valid link")]
    #[test_case("not a url", Some("relative URL without a base") ; "unparsable")]
    #[test_case("https://other.ru/d/x?panelId=4", Some("Invalid host. Should start with https://grafana.example.ru/") ; "foreign host")]
    #[test_case("https://grafana.example.ru/d/x?orgId=1", Some("Param panelId is not found in url") ; "no panel")]
    #[test_case("https://grafana.example.ru/d/x?panelId=0", Some("Bad panelId value. Should be positive number") ; "zero panel")]
    #[test_case("https://grafana.example.ru/d/x?panelId=abc", Some("Bad panelId value. Should be positive number") ; "non numeric panel")]
    fn dashboard_rule(link: &str, expected: Option<&str>) {
        let result = validate_dashboard(link, &prefixes());
        assert_eq!(result.err().map(|e| e.message), expected.map(str::to_string));
    }

    #[test]
    fn dashboard_messages_follow_prefix_count() {
        let link = "https://x.ru/d?panelId=1";
        let none = validate_dashboard(link, &[]).unwrap_err();
        assert_eq!(none.message, "Grafana is not configured. This field should be empty");

        let two = vec!["https://a/".to_string(), "https://b/".to_string()];
        let many = validate_dashboard(link, &two).unwrap_err();
        assert_eq!(
            many.message,
            "Invalid host. Should start with any of these: https://a/, https://b/"
        );
    }
}
