//! # moira-console
//!
//! Screen controllers and the `moira` command-line tool for a Moira
//! alerting server.
//!
//! Each screen of the console (trigger list, trigger page, settings, silent
//! patterns, tag statistics and so on) is a controller in [`containers`]. A
//! controller fetches through [`moira_api::MoiraClient`], keeps its data in a
//! [`screen::Screen`] and validates forms with `moira-validation` before
//! anything is sent.
//!
//! ```text
//! ┌──────────┐   commands    ┌────────────┐   HTTP/JSON   ┌────────────┐
//! │ moira    │──────────────►│ containers │──────────────►│  Moira API │
//! │ (clap)   │◄──────────────│  Screen<T> │◄──────────────│            │
//! └──────────┘    output     └────────────┘  MoiraClient  └────────────┘
//! ```
//!
//! Location state (trigger-list search, metric stats filters, silent sort)
//! round-trips through the codecs in [`location`]. Trigger-list filters are
//! remembered in a [`filters::FilterStore`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod containers;
pub mod error;
pub mod filters;
pub mod location;
pub mod output;
pub mod refresh;
pub mod screen;

pub use cli::{Cli, Commands, Format};
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use output::OutputFormat;
pub use screen::{FetchTicket, Screen, ScreenStatus, Settled};
