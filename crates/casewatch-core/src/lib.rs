//! # casewatch-core
//!
//! Core logic for the casewatch case-law monitor.
//!
//! This crate provides:
//! - The [`CaseRecord`] domain model
//! - The pure differ and run planner (the only logic worth unit-testing)
//! - Known-set snapshot and new-case log persistence
//! - Capability ports for the platform seams (secret store, desktop
//!   notification, alert sound, mail transport) with real and fake
//!   implementations
//! - The [`monitor`] orchestrator wiring one linear run together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod diff;
mod error;
pub mod mailer;
pub mod monitor;
pub mod notify;
pub mod plan;
pub mod record;
pub mod secrets;
pub mod store;

pub use config::MonitorConfig;
pub use diff::new_cases;
pub use error::{Error, Result};
pub use mailer::{MailError, MailTransport, OutgoingMessage, SmtpMailer};
pub use monitor::{FeedSource, RunReport, run};
pub use notify::{AlertSound, DesktopAlert, DesktopNotifier, Notifier, NullNotifier, SilentAlert};
pub use plan::{EmailContent, RunPlan, plan_run};
pub use record::CaseRecord;
pub use secrets::{Credentials, KeyringStore, MemorySecretStore, SecretError, SecretStore};
pub use store::{CaseLog, KnownCaseStore};
