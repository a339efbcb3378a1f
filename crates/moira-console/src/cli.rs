//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use moira_core::{
    ContactType, ExportFormat, Maintenance, MetricColumn, SilentPatternType, SilentSortKey, SortOrder, TimeOffset,
};

/// Moira console - manage triggers, contacts and subscriptions of a Moira
/// alerting server.
#[derive(Parser, Debug, Clone)]
#[command(name = "moira")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to `<config dir>/moira/config.toml`.
    #[arg(short, long, env = "MOIRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root URL of the Moira API; overrides the configuration file.
    #[arg(short = 'u', long, env = "MOIRA_API_URL")]
    pub api_url: Option<String>,

    /// Login sent to the API; overrides the configuration file.
    #[arg(short, long, env = "MOIRA_LOGIN")]
    pub login: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List triggers.
    Triggers(TriggerListArgs),

    /// Inspect and manage one trigger.
    Trigger {
        /// Trigger subcommand to execute.
        #[command(subcommand)]
        command: TriggerCommands,
    },

    /// Manage delivery channels.
    Contacts {
        /// Contact subcommand to execute.
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage subscriptions.
    Subscriptions {
        /// Subscription subcommand to execute.
        #[command(subcommand)]
        command: SubscriptionCommands,
    },

    /// Manage silent patterns and silent tags.
    Silent {
        /// Silent subcommand to execute.
        #[command(subcommand)]
        command: SilentCommands,
    },

    /// Tag statistics.
    Tags {
        /// Tag subcommand to execute.
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Metric patterns.
    Patterns {
        /// Pattern subcommand to execute.
        #[command(subcommand)]
        command: PatternCommands,
    },

    /// Pending notifications.
    Notifications {
        /// Notification subcommand to execute.
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Metric error statistics.
    Stats(StatsArgs),

    /// Global notification switch.
    Global {
        /// Global subcommand to execute.
        #[command(subcommand)]
        command: GlobalCommands,
    },
}

/// Arguments for the trigger list.
#[derive(Args, Debug, Clone, Default)]
pub struct TriggerListArgs {
    /// One-based page.
    #[arg(short, long, default_value_t = 1)]
    pub page: u64,

    /// Only triggers carrying all these tags.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Only triggers in a problem state.
    #[arg(long)]
    pub only_problems: bool,

    /// Only triggers whose name matches.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Ignore stored filter defaults.
    #[arg(long)]
    pub no_defaults: bool,
}

/// Trigger subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TriggerCommands {
    /// Show a trigger with its state and events.
    Show {
        /// Trigger ID.
        id: String,

        /// One-based events page.
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },

    /// Create a trigger from a YAML or JSON file.
    Create {
        /// File with the trigger definition.
        file: PathBuf,
    },

    /// Apply changes from a YAML or JSON file to a trigger.
    Update {
        /// Trigger ID.
        id: String,

        /// File with the fields to change.
        file: PathBuf,
    },

    /// Delete a trigger.
    Delete {
        /// Trigger ID.
        id: String,
    },

    /// Export a trigger definition.
    Export {
        /// Trigger ID.
        id: String,

        /// File format.
        #[arg(long, value_enum, default_value_t = ExportFormatArg::Yaml)]
        to: ExportFormatArg,

        /// Directory to write the file to; prints to stdout when unset.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set a maintenance window on a trigger or one of its metrics.
    Maintenance {
        /// Trigger ID.
        id: String,

        /// Window length: off, 15m, 1h, 3h, 6h, 1d, 1w, 2w or 1mo.
        duration: Maintenance,

        /// Metric to put into maintenance instead of the whole trigger.
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Drop throttled notifications.
    ClearThrottling {
        /// Trigger ID.
        id: String,
    },

    /// Acknowledge running escalations.
    AckEscalations {
        /// Trigger ID.
        id: String,
    },

    /// Remove a metric from a trigger.
    RemoveMetric {
        /// Trigger ID.
        id: String,

        /// Metric name.
        metric: String,
    },
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Yaml => Self::Yaml,
            ExportFormatArg::Json => Self::Json,
        }
    }
}

/// Contact subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ContactCommands {
    /// List the current user's contacts.
    List,

    /// Add a contact.
    Add {
        /// Contact type, e.g. mail, slack or telegram.
        kind: ContactType,

        /// Address, key or URL.
        value: String,

        /// Fallback channel for types that support one.
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Change a contact.
    Update {
        /// Contact ID.
        id: String,

        /// New value.
        #[arg(long)]
        value: Option<String>,

        /// New fallback channel.
        #[arg(long, conflicts_with = "clear_fallback")]
        fallback: Option<String>,

        /// Remove the fallback channel.
        #[arg(long)]
        clear_fallback: bool,
    },

    /// Delete a contact.
    Remove {
        /// Contact ID.
        id: String,
    },

    /// Send a test notification.
    Test {
        /// Contact ID.
        id: String,
    },
}

/// Subscription subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SubscriptionCommands {
    /// List the current user's subscriptions.
    List,

    /// Add a subscription.
    Add(SubscriptionArgs),

    /// Enable a subscription.
    Enable {
        /// Subscription ID.
        id: String,
    },

    /// Disable a subscription.
    Disable {
        /// Subscription ID.
        id: String,
    },

    /// Delete a subscription.
    Remove {
        /// Subscription ID.
        id: String,
    },

    /// Send a test notification.
    Test {
        /// Subscription ID.
        id: String,
    },

    /// Find subscriptions by contact value.
    Search {
        /// At least three characters of a contact value.
        value: String,
    },
}

/// Arguments for a new subscription.
#[derive(Args, Debug, Clone, Default)]
pub struct SubscriptionArgs {
    /// Tags a trigger must carry.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Contact IDs to notify.
    #[arg(short, long = "contact")]
    pub contacts: Vec<String>,

    /// Send every event separately.
    #[arg(long)]
    pub no_throttling: bool,

    /// Notify only when the trigger state gets worse.
    #[arg(long)]
    pub degraded_only: bool,

    /// Skip WARN notifications.
    #[arg(long)]
    pub no_warn: bool,
}

/// Silent pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SilentKind {
    /// Metric patterns.
    #[default]
    Pattern,
    /// Tags.
    Tag,
}

impl From<SilentKind> for SilentPatternType {
    fn from(kind: SilentKind) -> Self {
        match kind {
            SilentKind::Pattern => Self::Pattern,
            SilentKind::Tag => Self::Tag,
        }
    }
}

/// Silent subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SilentCommands {
    /// List silent patterns.
    List {
        /// Pattern kind.
        #[arg(short, long, value_enum, default_value_t = SilentKind::Pattern)]
        kind: SilentKind,

        /// Only patterns whose text or author contains this.
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort column.
        #[arg(long, value_enum, default_value_t = SilentSortArg::CreatedAt)]
        sort: SilentSortArg,

        /// Sort direction.
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
    },

    /// Silence patterns.
    Add {
        /// Patterns or tags.
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Pattern kind.
        #[arg(short, long, value_enum, default_value_t = SilentKind::Pattern)]
        kind: SilentKind,

        /// How long: 15m, 1h, 3h, 6h, 1d or 1w.
        #[arg(short, long, default_value = "1h")]
        duration: TimeOffset,
    },

    /// Extend silent patterns from now.
    Prolong {
        /// Pattern IDs.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Pattern kind.
        #[arg(short, long, value_enum, default_value_t = SilentKind::Pattern)]
        kind: SilentKind,

        /// How long: 15m, 1h, 3h, 6h, 1d or 1w.
        #[arg(short, long, default_value = "1h")]
        duration: TimeOffset,
    },

    /// Delete silent patterns.
    Delete {
        /// Pattern IDs.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Pattern kind.
        #[arg(short, long, value_enum, default_value_t = SilentKind::Pattern)]
        kind: SilentKind,
    },
}

/// Silent pattern sort columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SilentSortArg {
    /// Creation time.
    CreatedAt,
    /// Author.
    Login,
    /// Pattern text.
    Pattern,
}

impl From<SilentSortArg> for SilentSortKey {
    fn from(arg: SilentSortArg) -> Self {
        match arg {
            SilentSortArg::CreatedAt => Self::CreatedAt,
            SilentSortArg::Login => Self::Login,
            SilentSortArg::Pattern => Self::Pattern,
        }
    }
}

/// Sort directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}

/// Tag subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TagCommands {
    /// List tags with their triggers and subscriptions.
    List,

    /// Delete a tag.
    Delete {
        /// Tag name.
        tag: String,
    },
}

/// Pattern subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PatternCommands {
    /// List metric patterns.
    List,

    /// Delete a metric pattern.
    Delete {
        /// Pattern text.
        pattern: String,
    },
}

/// Notification subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NotificationCommands {
    /// List pending notifications.
    List,

    /// Delete a pending notification.
    Delete {
        /// Notification ID as shown by `list`.
        id: String,
    },
}

/// Arguments for metric statistics.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Tags to report on; nothing is fetched without one.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Count only problem metrics.
    #[arg(long)]
    pub only_problems: bool,

    /// Window in seconds.
    #[arg(short, long, default_value_t = 86_400)]
    pub interval: u64,

    /// Sort column.
    #[arg(long, value_enum, default_value_t = MetricColumnArg::ErrorCount)]
    pub sort: MetricColumnArg,

    /// Sort direction.
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    /// Keep refetching every `refresh` seconds.
    #[arg(short, long)]
    pub watch: bool,

    /// Refresh period in seconds for `--watch`.
    #[arg(short, long, default_value_t = 60)]
    pub refresh: u64,
}

/// Metric statistics columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricColumnArg {
    /// Metric name.
    Metric,
    /// Trigger name.
    Trigger,
    /// Error count.
    ErrorCount,
}

impl From<MetricColumnArg> for MetricColumn {
    fn from(arg: MetricColumnArg) -> Self {
        match arg {
            MetricColumnArg::Metric => Self::Metric,
            MetricColumnArg::Trigger => Self::Trigger,
            MetricColumnArg::ErrorCount => Self::ErrorCount,
        }
    }
}

/// Global settings subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum GlobalCommands {
    /// Show whether notifications are enabled.
    Show,

    /// Turn all notifications off or back on.
    Toggle,
}
