//! Form validation for the Moira console.
//!
//! Every check here is a pure function. A failed check blocks the request it
//! guards; the API is never called with a value that did not pass.
//!
//! # Contact values
//!
//! ```
//! use moira_core::{ContactConfig, ContactType};
//! use moira_validation::validate_contact;
//!
//! let email = ContactConfig::new(ContactType::Email);
//! assert!(validate_contact(&email, "ops@example.ru", None).is_ok());
//! assert!(validate_contact(&email, "ops", None).is_err());
//! ```
//!
//! # Collecting every failure
//!
//! Form validators return all failures at once through [`ValidationBuilder`]:
//!
//! ```
//! use moira_core::Trigger;
//! use moira_validation::validate_trigger;
//!
//! let errors = validate_trigger(&Trigger::named(""), &[]).unwrap_err();
//! assert!(errors.iter().any(|e| e.field == "name"));
//! assert!(errors.iter().any(|e| e.field == "tags"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod contact;
mod error;
mod subscription;
mod trigger;

pub use builder::{ValidationBuilder, CANT_BE_EMPTY};
pub use contact::{is_internal_url, validate_contact};
pub use error::{ValidationError, ValidationErrorKind};
pub use subscription::{validate_subscription, SubscriptionForm, NO_CONTACTS, NO_TAGS};
pub use trigger::{validate_dashboard, validate_trigger};
