//! Highlight selection.
//!
//! After acquisition resolves, the orchestrator hands the project to a
//! highlight selector exactly once to produce clip candidates. The stub
//! implementation places clips at fixed fractions of the source duration;
//! real deployments plug an ML-backed selector in behind the same trait.

use async_trait::async_trait;

use clipforge_models::{Clip, Project};

/// Clip-candidate producer interface.
#[async_trait]
pub trait HighlightSelector: Send + Sync {
    /// Produce ranked clip candidates for a download-resolved project.
    async fn generate_clips(&self, project: &Project) -> anyhow::Result<Vec<Clip>>;
}

/// Offsets as fractions of the source duration, with clip length and rank.
const PLACEMENTS: &[(&str, f64, f64, u32)] = &[
    ("Opening Hook", 0.1, 45.0, 95),
    ("Key Moment", 0.3, 60.0, 88),
    ("Best Reaction", 0.6, 30.0, 92),
];

/// Deterministic selector: three clips at fixed fractions of the duration.
#[derive(Default)]
pub struct StubSelector;

impl StubSelector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HighlightSelector for StubSelector {
    async fn generate_clips(&self, project: &Project) -> anyhow::Result<Vec<Clip>> {
        let duration = project.duration_or_default();

        let clips = PLACEMENTS
            .iter()
            .map(|(title, fraction, length, score)| {
                let start = duration * fraction;
                let end = (start + length).min(duration);
                Clip::new(project.id.clone(), *title, start, end, *score)
            })
            .collect();

        Ok(clips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_three_clips_at_fixed_fractions() {
        let mut project = Project::new("https://youtube.com/watch?v=abc123def45", "Talk");
        project.duration_seconds = Some(1000.0);

        let clips = StubSelector::new().generate_clips(&project).await.unwrap();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips[0].start_time, 100.0);
        assert_eq!(clips[1].start_time, 300.0);
        assert_eq!(clips[2].start_time, 600.0);
        assert_eq!(clips[0].rank_score, 95);
    }

    #[tokio::test]
    async fn test_missing_duration_uses_fallback() {
        let project = Project::new("https://youtu.be/abc123def45", "Talk");
        let clips = StubSelector::new().generate_clips(&project).await.unwrap();
        // 600s fallback: first clip starts at 60s
        assert_eq!(clips[0].start_time, 60.0);
    }

    #[tokio::test]
    async fn test_clips_never_run_past_the_end() {
        let mut project = Project::new("https://youtu.be/abc123def45", "Short");
        project.duration_seconds = Some(40.0);

        let clips = StubSelector::new().generate_clips(&project).await.unwrap();
        for clip in &clips {
            assert!(clip.end_time <= 40.0);
            assert!(clip.start_time < clip.end_time || clip.duration() == 0.0);
        }
    }
}
