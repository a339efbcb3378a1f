//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use chrono::DateTime;
use moira_core::{
    round_value, Contact, ContactList, EventList, GlobalSettings, MetricStat, NotificationList, PatternList,
    SilentPattern, Subscription, TagStatList, Trigger, TriggerState,
};
use serde::Serialize;

use crate::cli::Format;
use crate::containers::{SearchView, TriggerExport, TriggerListView, TriggerView};
use crate::error::{ConsoleError, Result};

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<()>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| ConsoleError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| ConsoleError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()>;
}

/// Outcome of a command that changes something.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// What was done.
    pub message: String,
}

impl ActionResult {
    /// A successful action.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl TableDisplay for ActionResult {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.message)?;
        Ok(())
    }
}

/// One row of the trigger list.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRow {
    /// Trigger ID.
    pub id: String,
    /// Trigger name.
    pub name: String,
    /// Aggregate state of the last check.
    pub state: String,
    /// WARN threshold.
    pub warn_value: Option<f64>,
    /// ERROR threshold.
    pub error_value: Option<f64>,
    /// Tags.
    pub tags: Vec<String>,
}

impl From<&Trigger> for TriggerRow {
    fn from(trigger: &Trigger) -> Self {
        Self {
            id: trigger.id.clone(),
            name: trigger.name.clone(),
            state: trigger
                .last_check
                .as_ref()
                .map_or_else(|| "-".to_string(), |check| check.state.to_string()),
            warn_value: trigger.warn_value,
            error_value: trigger.error_value,
            tags: trigger.tags.clone(),
        }
    }
}

/// A page of the trigger list.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerPage {
    /// One-based page.
    pub page: u64,
    /// Number of pages.
    pub page_count: u64,
    /// Number of matching triggers.
    pub total: u64,
    /// Tags the page was filtered by.
    pub selected_tags: Vec<String>,
    /// Tags of the user's subscriptions, offered as filters.
    pub subscribed_tags: Vec<String>,
    /// Triggers on this page.
    pub triggers: Vec<TriggerRow>,
}

impl From<&TriggerListView> for TriggerPage {
    fn from(view: &TriggerListView) -> Self {
        Self {
            page: view.search.page,
            page_count: view.page_count(),
            total: view.triggers.total,
            selected_tags: view.tags.selected.clone(),
            subscribed_tags: view.tags.subscribed.clone(),
            triggers: view.triggers.list.iter().map(TriggerRow::from).collect(),
        }
    }
}

impl TableDisplay for TriggerPage {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.triggers.is_empty() {
            writeln!(writer, "No triggers found")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<36}  {:<32}  {:<9}  {:>9}  {:>9}  {}",
            "ID", "NAME", "STATE", "WARN", "ERROR", "TAGS"
        )?;
        writeln!(writer, "{}", "─".repeat(110))?;
        for row in &self.triggers {
            writeln!(
                writer,
                "{:<36}  {:<32}  {:<9}  {:>9}  {:>9}  {}",
                row.id,
                truncate(&row.name, 32),
                row.state,
                round_value(row.warn_value, true),
                round_value(row.error_value, true),
                row.tags.join(", ")
            )?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "Page {} of {}, total: {} trigger(s)",
            self.page, self.page_count, self.total
        )?;
        if !self.selected_tags.is_empty() {
            writeln!(writer, "Filtered by: {}", self.selected_tags.join(", "))?;
        }
        Ok(())
    }
}

/// A trigger with its state and one page of events.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerDetail {
    /// Trigger definition.
    pub trigger: Trigger,
    /// Current state.
    pub state: TriggerState,
    /// Events page.
    pub events: EventList,
}

impl From<&TriggerView> for TriggerDetail {
    fn from(view: &TriggerView) -> Self {
        Self {
            trigger: view.trigger.clone(),
            state: view.state.clone(),
            events: view.events.clone(),
        }
    }
}

impl TableDisplay for TriggerDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        let trigger = &self.trigger;
        writeln!(writer, "Trigger: {}", trigger.name)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "ID:           {}", trigger.id)?;
        writeln!(writer, "State:        {}", self.state.state)?;
        writeln!(writer, "Tags:         {}", trigger.tags.join(", "))?;
        writeln!(writer, "Warn:         {}", round_value(trigger.warn_value, true))?;
        writeln!(writer, "Error:        {}", round_value(trigger.error_value, true))?;
        if let Some(until) = self.state.maintenance.filter(|until| *until > 0) {
            writeln!(writer, "Maintenance:  until {}", format_time(until))?;
        }
        if let Some(desc) = &trigger.desc {
            writeln!(writer, "Description:  {desc}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "Targets")?;
        for (i, target) in trigger.targets.iter().enumerate() {
            writeln!(writer, "  t{}: {target}", i + 1)?;
        }

        writeln!(writer)?;
        writeln!(writer, "{:<48}  {:<9}  {:>9}  {:<19}", "METRIC", "STATE", "VALUE", "MAINTENANCE")?;
        writeln!(writer, "{}", "─".repeat(92))?;
        for (name, metric) in &self.state.metrics {
            writeln!(
                writer,
                "{:<48}  {:<9}  {:>9}  {:<19}",
                truncate(name, 48),
                metric.state.as_str(),
                round_value(metric.value, true),
                metric.maintenance.filter(|until| *until > 0).map_or_else(|| "-".to_string(), format_time)
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "{:<19}  {:<40}  {:<17}  {:>9}", "TIME", "METRIC", "TRANSITION", "VALUE")?;
        writeln!(writer, "{}", "─".repeat(92))?;
        for event in &self.events.list {
            writeln!(
                writer,
                "{:<19}  {:<40}  {:<17}  {:>9}",
                format_time(event.timestamp),
                truncate(&event.metric, 40),
                format!("{} -> {}", event.old_state, event.state),
                round_value(event.value, true)
            )?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "Events page {} of {}, total: {}",
            self.events.page + 1,
            self.events.page_count(),
            self.events.total
        )?;
        Ok(())
    }
}

impl TableDisplay for TriggerExport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self.contents)?;
        if !self.contents.ends_with('\n') {
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl TableDisplay for ContactList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.list.is_empty() {
            writeln!(writer, "No contacts")?;
            return Ok(());
        }
        write_contacts(writer, &self.list)?;
        writeln!(writer)?;
        writeln!(writer, "Total: {} contact(s)", self.list.len())?;
        Ok(())
    }
}

impl TableDisplay for Contact {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_contacts(writer, std::slice::from_ref(self))
    }
}

fn write_contacts<W: Write>(writer: &mut W, contacts: &[Contact]) -> Result<()> {
    writeln!(writer, "{:<36}  {:<16}  {:<40}  {}", "ID", "TYPE", "VALUE", "FALLBACK")?;
    writeln!(writer, "{}", "─".repeat(100))?;
    for contact in contacts {
        writeln!(
            writer,
            "{:<36}  {:<16}  {:<40}  {}",
            contact.id,
            contact.kind.as_str(),
            truncate(&contact.value, 40),
            contact.fallback_value.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

/// Subscriptions with the contacts they reference.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionTable {
    /// Subscriptions.
    pub subscriptions: Vec<Subscription>,
    /// Contacts used to resolve IDs.
    pub contacts: Vec<Contact>,
}

impl TableDisplay for SubscriptionTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.subscriptions.is_empty() {
            writeln!(writer, "No subscriptions")?;
            return Ok(());
        }
        writeln!(writer, "{:<36}  {:<7}  {:<30}  {}", "ID", "ENABLED", "TAGS", "CONTACTS")?;
        writeln!(writer, "{}", "─".repeat(100))?;
        for subscription in &self.subscriptions {
            let contacts: Vec<&str> = subscription
                .contacts
                .iter()
                .map(|id| {
                    self.contacts
                        .iter()
                        .find(|c| c.id == *id)
                        .map_or(id.as_str(), |c| c.value.as_str())
                })
                .collect();
            writeln!(
                writer,
                "{:<36}  {:<7}  {:<30}  {}",
                subscription.id,
                if subscription.enabled { "yes" } else { "no" },
                truncate(&subscription.tags.join(", "), 30),
                contacts.join(", ")
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} subscription(s)", self.subscriptions.len())?;
        Ok(())
    }
}

/// One subscription search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRow {
    /// Subscription ID.
    pub id: String,
    /// Owner.
    pub user: String,
    /// Whether notifications are sent.
    pub enabled: bool,
    /// Tags.
    pub tags: Vec<String>,
    /// Values of the matching contacts.
    pub matched: Vec<String>,
}

/// Subscription search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    /// Lowercased search string.
    pub search: String,
    /// Hits.
    pub results: Vec<SearchRow>,
}

impl From<&SearchView> for SearchOutput {
    fn from(view: &SearchView) -> Self {
        Self {
            search: view.search.clone(),
            results: view
                .matches
                .iter()
                .map(|m| SearchRow {
                    id: m.subscription.id.clone(),
                    user: m.subscription.user.clone(),
                    enabled: m.subscription.enabled,
                    tags: m.subscription.tags.clone(),
                    matched: m.contacts.iter().map(|c| c.value.clone()).collect(),
                })
                .collect(),
        }
    }
}

impl TableDisplay for SearchOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.results.is_empty() {
            writeln!(writer, "No subscriptions match '{}'", self.search)?;
            return Ok(());
        }
        writeln!(writer, "{:<36}  {:<16}  {:<30}  {}", "ID", "USER", "TAGS", "MATCHED")?;
        writeln!(writer, "{}", "─".repeat(100))?;
        for row in &self.results {
            writeln!(
                writer,
                "{:<36}  {:<16}  {:<30}  {}",
                row.id,
                truncate(&row.user, 16),
                truncate(&row.tags.join(", "), 30),
                row.matched.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Silent patterns in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SilentTable {
    /// Patterns.
    pub patterns: Vec<SilentPattern>,
    /// Current Unix time; patterns whose `until` is not after it show as expired.
    #[serde(skip)]
    pub now: i64,
}

impl TableDisplay for SilentTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.patterns.is_empty() {
            writeln!(writer, "No silent patterns")?;
            return Ok(());
        }
        writeln!(writer, "{:<36}  {:<40}  {:<16}  {:<19}", "ID", "PATTERN", "LOGIN", "UNTIL")?;
        writeln!(writer, "{}", "─".repeat(117))?;
        for pattern in &self.patterns {
            writeln!(
                writer,
                "{:<36}  {:<40}  {:<16}  {:<19}",
                pattern.id,
                truncate(&pattern.pattern, 40),
                truncate(&pattern.login, 16),
                if pattern.is_active(self.now) {
                    format_time(pattern.until)
                } else {
                    "EXPIRED".to_string()
                }
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} pattern(s)", self.patterns.len())?;
        Ok(())
    }
}

impl TableDisplay for TagStatList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.list.is_empty() {
            writeln!(writer, "No tags")?;
            return Ok(());
        }
        writeln!(writer, "{:<40}  {:>8}  {:>13}", "TAG", "TRIGGERS", "SUBSCRIPTIONS")?;
        writeln!(writer, "{}", "─".repeat(65))?;
        for tag in &self.list {
            writeln!(
                writer,
                "{:<40}  {:>8}  {:>13}",
                truncate(&tag.name, 40),
                tag.triggers.len(),
                tag.subscriptions.len()
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} tag(s)", self.list.len())?;
        Ok(())
    }
}

impl TableDisplay for PatternList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.list.is_empty() {
            writeln!(writer, "No patterns")?;
            return Ok(());
        }
        writeln!(writer, "{:<60}  {:>8}  {:>7}", "PATTERN", "TRIGGERS", "METRICS")?;
        writeln!(writer, "{}", "─".repeat(79))?;
        for pattern in &self.list {
            writeln!(
                writer,
                "{:<60}  {:>8}  {:>7}",
                truncate(&pattern.pattern, 60),
                pattern.triggers.len(),
                pattern.metrics.len()
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} pattern(s)", self.list.len())?;
        Ok(())
    }
}

impl TableDisplay for NotificationList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.list.is_empty() {
            writeln!(writer, "No pending notifications")?;
            return Ok(());
        }
        writeln!(
            writer,
            "{:<19}  {:<40}  {:<24}  {:<9}  {}",
            "TIME", "METRIC", "CONTACT", "STATE", "ID"
        )?;
        writeln!(writer, "{}", "─".repeat(120))?;
        for notification in &self.list {
            writeln!(
                writer,
                "{:<19}  {:<40}  {:<24}  {:<9}  {}",
                format_time(notification.timestamp),
                truncate(&notification.event.metric, 40),
                truncate(&notification.contact.value, 24),
                notification.event.state.as_str(),
                notification.id()
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} notification(s)", self.total)?;
        Ok(())
    }
}

/// Metric statistics in display order.
#[derive(Debug, Clone, Serialize)]
pub struct StatsTable {
    /// Rows.
    pub stats: Vec<MetricStat>,
}

impl TableDisplay for StatsTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.stats.is_empty() {
            writeln!(writer, "No statistics; select at least one tag")?;
            return Ok(());
        }
        writeln!(writer, "{:<48}  {:<32}  {:<9}  {:>6}", "METRIC", "TRIGGER", "STATE", "ERRORS")?;
        writeln!(writer, "{}", "─".repeat(101))?;
        for stat in &self.stats {
            writeln!(
                writer,
                "{:<48}  {:<32}  {:<9}  {:>6}",
                truncate(&stat.metric, 48),
                truncate(&stat.trigger.name, 32),
                stat.current_state.as_str(),
                stat.error_count
            )?;
        }
        Ok(())
    }
}

impl TableDisplay for GlobalSettings {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        let state = if self.notifications.disabled { "disabled" } else { "enabled" };
        writeln!(writer, "Notifications: {state}")?;
        Ok(())
    }
}

/// Formats unix seconds as UTC time; `0` renders as `-`.
fn format_time(timestamp: i64) -> String {
    if timestamp == 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| timestamp.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moira_core::{Event, MetricState, SilentPatternType, Status};

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
    }

    #[test]
    fn output_format_json() {
        let fmt = OutputFormat::new(Format::Json);
        assert!(fmt.is_json());
        let output = fmt.to_string(&ActionResult::ok("done")).unwrap();
        assert!(output.contains("\"success\": true"));
        assert!(output.contains("\"message\": \"done\""));
    }

    #[test]
    fn trigger_page_table_uses_formatter() {
        let mut trigger = Trigger::named("cpu load");
        trigger.id = "t1".into();
        trigger.warn_value = Some(1500.0);
        trigger.error_value = None;
        trigger.tags = vec!["prod".into()];
        let page = TriggerPage {
            page: 1,
            page_count: 3,
            total: 41,
            selected_tags: vec!["prod".into()],
            subscribed_tags: Vec::new(),
            triggers: vec![TriggerRow::from(&trigger)],
        };
        let output = OutputFormat::default().to_string(&page).unwrap();
        assert!(output.contains("cpu load"));
        assert!(output.contains("1.5 K"));
        assert!(output.contains("—"));
        assert!(output.contains("Page 1 of 3, total: 41 trigger(s)"));
        assert!(output.contains("Filtered by: prod"));
    }

    #[test]
    fn empty_trigger_page() {
        let page = TriggerPage {
            page: 1,
            page_count: 1,
            total: 0,
            selected_tags: Vec::new(),
            subscribed_tags: Vec::new(),
            triggers: Vec::new(),
        };
        let output = OutputFormat::default().to_string(&page).unwrap();
        assert_eq!(output, "No triggers found\n");
    }

    #[test]
    fn trigger_detail_lists_metrics_and_events() {
        let mut state = TriggerState::default();
        state.metrics.insert(
            "server.cpu".into(),
            MetricState {
                state: Status::Error,
                value: Some(0.000_012),
                ..MetricState::default()
            },
        );
        let events = EventList {
            total: 1,
            list: vec![Event {
                state: Status::Error,
                old_state: Status::Ok,
                timestamp: 1_700_000_000,
                value: Some(97.0),
                metric: "server.cpu".into(),
                ..Event::default()
            }],
            page: 0,
            size: 100,
        };
        let detail = TriggerDetail {
            trigger: Trigger::named("cpu"),
            state,
            events,
        };
        let output = OutputFormat::default().to_string(&detail).unwrap();
        assert!(output.contains("server.cpu"));
        assert!(output.contains("OK -> ERROR"));
        assert!(output.contains("2023-11-14 22:13:20"));
        assert!(output.contains("Events page 1 of 1, total: 1"));
    }

    #[test]
    fn global_settings_table() {
        let settings = GlobalSettings::default().toggled();
        let output = OutputFormat::default().to_string(&settings).unwrap();
        assert_eq!(output, "Notifications: disabled\n");
    }

    #[test]
    fn silent_table_marks_expired_patterns() {
        let mut live = SilentPattern::new(SilentPatternType::Pattern, "live.*", 2_000);
        live.id = "p1".into();
        let mut old = SilentPattern::new(SilentPatternType::Pattern, "old.*", 1_000);
        old.id = "p2".into();
        let table = SilentTable {
            patterns: vec![live, old],
            now: 1_000,
        };

        let output = OutputFormat::default().to_string(&table).unwrap();
        let rows: Vec<&str> = output.lines().filter(|l| l.starts_with('p')).collect();
        assert!(rows[0].contains("1970-01-01 00:33:20"));
        assert!(rows[1].contains("EXPIRED"));
    }

    #[test]
    fn format_time_zero_is_dash() {
        assert_eq!(format_time(0), "-");
        assert_eq!(format_time(86_400), "1970-01-02 00:00:00");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("привет мир", 6), "при...");
        assert_eq!(truncate("hello", 3), "hel");
    }
}
