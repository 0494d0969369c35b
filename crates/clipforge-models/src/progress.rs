//! State-keyed progress estimation.
//!
//! Acquisition strategies are opaque subprocesses without byte-level
//! progress callbacks, so progress is estimated from the project state and
//! elapsed time. Clients poll this value and treat any decrease as a display
//! bug, so the estimate must be monotonically non-decreasing and must not
//! report 100 before the download has resolved.

use chrono::{DateTime, Utc};

use crate::project::ProjectStatus;

/// Ceiling while still in `processing`. Never 100.
const PROCESSING_CAP: u8 = 90;

/// Seconds of elapsed processing time per estimated percentage point.
const SECS_PER_POINT: i64 = 4;

/// Estimate completion percentage for a project.
///
/// Pure function of `(status, created_at, now)`:
/// - `processing`: time ramp from 0, capped at [`PROCESSING_CAP`]
/// - download-resolved states: exactly 100
/// - `failed`: the ramp frozen at its final value, never 100
///
/// Using `created_at` as the ramp base keeps the value monotonic across
/// resumes, which refresh `updated_at` but never `created_at`.
pub fn estimate_progress(
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u8 {
    match status {
        ProjectStatus::Processing => ramp(created_at, now),
        ProjectStatus::Failed => ramp(created_at, updated_at),
        ProjectStatus::CompletedDownload | ProjectStatus::Completed | ProjectStatus::ClipsReady => {
            100
        }
    }
}

fn ramp(from: DateTime<Utc>, to: DateTime<Utc>) -> u8 {
    let elapsed_secs = (to - from).num_seconds().max(0);
    let estimate = elapsed_secs / SECS_PER_POINT;
    estimate.min(PROCESSING_CAP as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_zero_at_creation() {
        let now = Utc::now();
        assert_eq!(
            estimate_progress(ProjectStatus::Processing, now, now, now),
            0
        );
    }

    #[test]
    fn test_monotonic_while_processing() {
        let created = Utc::now();
        let mut last = 0;
        for secs in [0, 5, 30, 120, 600, 3600] {
            let now = created + Duration::seconds(secs);
            let p = estimate_progress(ProjectStatus::Processing, created, created, now);
            assert!(p >= last, "progress decreased: {} -> {}", last, p);
            last = p;
        }
    }

    #[test]
    fn test_never_hundred_while_processing() {
        let created = Utc::now();
        let now = created + Duration::hours(6);
        let p = estimate_progress(ProjectStatus::Processing, created, created, now);
        assert!(p < 100);
        assert_eq!(p, 90);
    }

    #[test]
    fn test_hundred_once_download_resolved() {
        let created = Utc::now();
        for status in [
            ProjectStatus::CompletedDownload,
            ProjectStatus::Completed,
            ProjectStatus::ClipsReady,
        ] {
            assert_eq!(estimate_progress(status, created, created, created), 100);
        }
    }

    #[test]
    fn test_failed_freezes_below_hundred() {
        let created = Utc::now();
        let failed_at = created + Duration::seconds(120);
        let frozen = estimate_progress(ProjectStatus::Failed, created, failed_at, failed_at);

        // Later polls report the same frozen value
        let much_later = failed_at + Duration::hours(2);
        let later = estimate_progress(ProjectStatus::Failed, created, failed_at, much_later);
        assert_eq!(frozen, later);
        assert!(frozen < 100);
    }
}
