//! Pure run planner.
//!
//! Decides, without performing any I/O, what a run should do: which
//! branch it takes (first run vs. update), which records are new, and
//! the exact email to send. The imperative shell in [`crate::monitor`]
//! executes the plan.

use crate::diff::new_cases;
use crate::record::CaseRecord;
use chrono::{DateTime, Local};

/// Subject and plain-text body of the single email a run sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// What one run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPlan {
    /// No prior known-set: persist the fetch and announce that
    /// monitoring has started. No diff, no log, no alert sound.
    FirstRun {
        /// The "monitoring started" email.
        email: EmailContent,
    },
    /// A known-set exists: log and alert on the new-case batch (if any)
    /// and send one summary email either way.
    Update {
        /// Records in the fetch that are absent from the known-set.
        new_cases: Vec<CaseRecord>,
        /// The summary email.
        email: EmailContent,
    },
}

/// Plans a run from the current fetch and the loaded known-set.
///
/// `known` of `None` means no prior state (first run); `Some` of an
/// empty slice is a valid known-set with zero cases.
#[must_use]
pub fn plan_run(
    query: &str,
    current: &[CaseRecord],
    known: Option<&[CaseRecord]>,
    now: DateTime<Local>,
) -> RunPlan {
    let timestamp = now.format("%Y-%m-%d %H:%M:%S");

    match known {
        None => RunPlan::FirstRun {
            email: EmailContent {
                subject: "\u{2696}\u{fe0f} Case monitoring started".to_string(),
                body: format!(
                    "Case monitoring has started successfully.\n\n\
                     Search query: {query}\n\
                     Cases currently found: {count}\n\
                     Time: {timestamp}",
                    count = current.len(),
                ),
            },
        },
        Some(known) => {
            let batch = new_cases(current, known);

            let mut body_lines = if batch.is_empty() {
                vec!["No new cases found.\n".to_string()]
            } else {
                let mut lines = vec![format!("{} new case(s) detected:\n", batch.len())];
                for case in &batch {
                    lines.push(format!("{} - {}\n{}\n", case.date, case.title, case.link));
                }
                lines
            };
            body_lines.push(format!("\nChecked at: {timestamp}"));

            RunPlan::Update {
                new_cases: batch,
                email: EmailContent {
                    subject: "\u{2696}\u{fe0f} Case Monitor Update".to_string(),
                    body: body_lines.join("\n"),
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rec(link: &str, title: &str, date: &str) -> CaseRecord {
        CaseRecord::new(title, format!("https://x/{link}"), date)
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 25, 9, 30, 0).unwrap()
    }

    #[test]
    fn first_run_announces_query_and_count() {
        let current = vec![rec("a", "A", "2026-01-01"), rec("b", "B", "2026-01-02")];
        let plan = plan_run("pension", &current, None, at());

        let RunPlan::FirstRun { email } = plan else {
            panic!("expected first-run plan");
        };
        assert_eq!(email.subject, "\u{2696}\u{fe0f} Case monitoring started");
        assert!(email.body.contains("Search query: pension"));
        assert!(email.body.contains("Cases currently found: 2"));
        assert!(email.body.contains("Time: 2026-08-25 09:30:00"));
    }

    #[test]
    fn empty_known_set_is_not_a_first_run() {
        let current = vec![rec("a", "A", "2026-01-01")];
        let plan = plan_run("q", &current, Some(&[]), at());

        let RunPlan::Update { new_cases, .. } = plan else {
            panic!("expected update plan");
        };
        assert_eq!(new_cases.len(), 1);
    }

    #[test]
    fn no_change_run_produces_no_new_cases_email() {
        let current = vec![rec("a", "A", "2026-01-01")];
        let plan = plan_run("q", &current, Some(&current.clone()), at());

        let RunPlan::Update { new_cases, email } = plan else {
            panic!("expected update plan");
        };
        assert!(new_cases.is_empty());
        assert!(email.body.starts_with("No new cases found."));
        assert!(email.body.contains("Checked at: 2026-08-25 09:30:00"));
    }

    #[test]
    fn update_email_enumerates_each_new_case() {
        let known = vec![rec("a", "A", "2026-01-01")];
        let current = vec![
            rec("a", "A", "2026-01-01"),
            rec("b", "B", "2026-01-02"),
            rec("c", "C", "2026-01-03"),
        ];
        let plan = plan_run("q", &current, Some(&known), at());

        let RunPlan::Update { new_cases, email } = plan else {
            panic!("expected update plan");
        };
        assert_eq!(new_cases, vec![current[1].clone(), current[2].clone()]);
        assert!(email.body.starts_with("2 new case(s) detected:"));
        assert!(email.body.contains("2026-01-02 - B\nhttps://x/b"));
        assert!(email.body.contains("2026-01-03 - C\nhttps://x/c"));
        assert_eq!(email.subject, "\u{2696}\u{fe0f} Case Monitor Update");
    }
}
