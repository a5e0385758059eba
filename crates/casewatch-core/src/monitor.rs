//! The monitor orchestrator.
//!
//! One linear run: load secrets, show the per-run notification, load the
//! known-set, fetch the current records, plan the run, fire the side
//! effects, send the single email, and persist the fetch as the new
//! known-set. The email is sent before the snapshot is saved, so a
//! delivery failure leaves the old snapshot in place and the same diff
//! recurs on the next run.

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::mailer::{MailTransport, OutgoingMessage};
use crate::notify::{AlertSound, Notifier};
use crate::plan::{RunPlan, plan_run};
use crate::record::CaseRecord;
use crate::secrets::{Credentials, SecretStore};
use crate::store::{CaseLog, KnownCaseStore};
use chrono::Local;
use tracing::info;

/// Source of current case records for a query.
pub trait FeedSource {
    /// Error type of the underlying feed implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the current records for the query, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or parse fails.
    fn fetch_cases(
        &self,
        query: &str,
    ) -> impl Future<Output = std::result::Result<Vec<CaseRecord>, Self::Error>>;
}

/// Summary of a completed run, for the binary to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Whether this was the first run (no prior known-set).
    pub first_run: bool,
    /// The new-case batch (empty on the first run and on no-change runs).
    pub new_cases: Vec<CaseRecord>,
}

/// Executes one monitor run.
///
/// # Errors
///
/// Returns an error on any fatal failure: missing credentials, feed
/// fetch or parse failure, file I/O failure, or mail delivery failure.
/// No retry is attempted anywhere.
pub async fn run<S, F, M, N, A>(
    config: &MonitorConfig,
    secret_store: &S,
    feed: &F,
    mailer: &M,
    notifier: &N,
    alert: &A,
) -> Result<RunReport>
where
    S: SecretStore,
    F: FeedSource,
    M: MailTransport,
    N: Notifier,
    A: AlertSound,
{
    // Missing credentials abort before any network or file activity.
    let credentials = Credentials::load(secret_store)?;

    let now = Local::now();
    info!(query = %config.query, "checking for new cases");
    notifier.notify(
        "Case Monitor",
        &format!("Script run at {}", now.format("%Y-%m-%d %H:%M:%S")),
    );

    let store = KnownCaseStore::new(&config.data_file);
    let known = store.load()?;
    let current = feed
        .fetch_cases(&config.query)
        .await
        .map_err(|e| Error::Feed(Box::new(e)))?;

    let report = match plan_run(&config.query, &current, known.as_deref(), now) {
        RunPlan::FirstRun { email } => {
            info!(count = current.len(), "first run, seeding known-set");
            send_email(mailer, &credentials, &email.subject, &email.body).await?;
            RunReport {
                first_run: true,
                new_cases: Vec::new(),
            }
        }
        RunPlan::Update { new_cases, email } => {
            if new_cases.is_empty() {
                info!("no new cases");
            } else {
                info!(count = new_cases.len(), "new cases found");
                CaseLog::new(&config.log_file).append(&new_cases, now)?;
                alert.play();
            }
            send_email(mailer, &credentials, &email.subject, &email.body).await?;
            RunReport {
                first_run: false,
                new_cases,
            }
        }
    };

    // The snapshot fully replaces the prior one, and only after the
    // email was accepted.
    store.save(&current)?;

    Ok(report)
}

async fn send_email<M: MailTransport>(
    mailer: &M,
    credentials: &Credentials,
    subject: &str,
    body: &str,
) -> Result<()> {
    let message = OutgoingMessage::new(&credentials.sender, &credentials.recipient, subject, body);
    mailer.send(credentials, &message).await?;
    Ok(())
}
