//! Family-level survey participation.
//!
//! A family counts as completed when any of its students has a submitted
//! survey. The summary feeds an export-only view: stored submissions are
//! never rewritten.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use schoolroll_store::SubmissionWithFamily;

/// Participation across every family that appears in the submissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticipationSummary {
    pub total_families: u64,
    pub completed_families: u64,
    /// Percentage rounded to two decimals.
    pub rate: f64,
}

/// Submission row as it appears in the export.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSubmission {
    pub row: SubmissionWithFamily,
    pub participation_rate: f64,
}

/// Completion flag per family. Submissions whose student is missing are
/// grouped under `None`.
fn family_completion(rows: &[SubmissionWithFamily]) -> BTreeMap<Option<i64>, bool> {
    let mut completion = BTreeMap::new();
    for row in rows {
        let completed = completion.entry(row.family_id).or_insert(false);
        *completed |= row.submission.submission_status;
    }
    completion
}

pub fn summarize(rows: &[SubmissionWithFamily]) -> ParticipationSummary {
    let completion = family_completion(rows);
    let total_families = completion.len() as u64;
    let completed_families = completion.values().filter(|done| **done).count() as u64;

    let rate = if total_families == 0 {
        warn!("no families with submissions; participation rate defaults to 0");
        0.0
    } else {
        round_rate(completed_families as f64 / total_families as f64 * 100.0)
    };

    ParticipationSummary {
        total_families,
        completed_families,
        rate,
    }
}

/// Mark every submission of a completed family as submitted and attach the
/// global rate to each row.
pub fn annotate(
    rows: &[SubmissionWithFamily],
    summary: &ParticipationSummary,
) -> Vec<AnnotatedSubmission> {
    let completion = family_completion(rows);
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if completion.get(&row.family_id).copied().unwrap_or(false) {
                row.submission.submission_status = true;
            }
            AnnotatedSubmission {
                row,
                participation_rate: summary.rate,
            }
        })
        .collect()
}

fn round_rate(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use schoolroll_core::SurveySubmission;

    use super::*;

    fn row(submission_id: i64, family_id: Option<i64>, submitted: bool) -> SubmissionWithFamily {
        SubmissionWithFamily {
            submission: SurveySubmission {
                submission_id,
                osis_number: format!("{:09}", 100_000_000 + submission_id),
                submission_status: submitted,
                submission_date: None,
                follow_up_attempts: 0,
                last_contacted: None,
                follow_up_notes: None,
            },
            family_id,
        }
    }

    #[test]
    fn sibling_submission_completes_the_family() {
        let rows = vec![row(1, Some(1), true), row(2, Some(1), false)];
        let summary = summarize(&rows);
        assert_eq!(summary.total_families, 1);
        assert_eq!(summary.completed_families, 1);
        assert_eq!(summary.rate, 100.0);

        let annotated = annotate(&rows, &summary);
        assert!(annotated.iter().all(|entry| entry.row.submission.submission_status));
        assert!(annotated.iter().all(|entry| entry.participation_rate == 100.0));
    }

    #[test]
    fn rate_is_rounded_to_two_decimals() {
        let rows = vec![
            row(1, Some(1), true),
            row(2, Some(2), false),
            row(3, Some(3), false),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.completed_families, 1);
        assert_eq!(summary.rate, 33.33);

        let annotated = annotate(&rows, &summary);
        let statuses: Vec<bool> = annotated
            .iter()
            .map(|entry| entry.row.submission.submission_status)
            .collect();
        assert_eq!(statuses, vec![true, false, false]);
    }

    #[test]
    fn zero_families_fall_back_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_families, 0);
        assert_eq!(summary.rate, 0.0);
        assert!(annotate(&[], &summary).is_empty());
    }

    #[test]
    fn orphan_submissions_share_one_group() {
        let rows = vec![row(1, None, false), row(2, None, true), row(3, Some(4), false)];
        let summary = summarize(&rows);
        assert_eq!(summary.total_families, 2);
        assert_eq!(summary.completed_families, 1);
        assert_eq!(summary.rate, 50.0);
    }
}
