//! Async gateway to the Moira alerting API.
//!
//! One method per remote operation. Each call builds a URL, issues a single
//! HTTP request, checks the status and decodes the JSON body.
//!
//! # Errors
//!
//! A non-2xx status becomes [`ApiError::Remote`]. Its message is the `error`
//! field of a `{"error": "..."}` body when present and the raw body
//! otherwise, so it can be shown to the user as is.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), moira_api::ApiError> {
//! use moira_api::MoiraClient;
//!
//! let client = MoiraClient::builder("http://moira.example.ru/api")
//!     .with_login("ops")
//!     .build()?;
//! let page = client.get_trigger_list(0, true, &["prod".to_string()], None).await?;
//! println!("{} triggers", page.total);
//! # Ok(())
//! # }
//! ```
//!
//! Query strings use index-style arrays:
//!
//! ```
//! use moira_api::Query;
//!
//! let query = Query::new().param("p", 0).list("tags", &["a", "b"]);
//! assert_eq!(query.encode(), "p=0&tags[0]=a&tags[1]=b");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod query;

pub use client::{
    error_message, MoiraClient, MoiraClientBuilder, EVENT_HISTORY_PAGE_SIZE, LOGIN_HEADER,
    TRIGGER_LIST_PAGE_SIZE,
};
pub use error::{ApiError, Result};
pub use query::Query;
