//! Job progress state.
//!
//! # Design
//! - A job is either idle or running with the last status seen.
//! - A `Completed` status finishes the job; errors and early stream ends fail it.
//! - Both outcomes return the view to idle; only completion refreshes the blog list.

use blog_export_api_models::ReadStatusEvent;

/// Update delivered by a job stream runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobUpdate {
    /// A status event arrived.
    Status(ReadStatusEvent),
    /// The stream failed or ended before completion.
    Failed(String),
}

/// What a view should do after applying an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStep {
    /// Keep showing progress.
    Progress,
    /// Job done: close the stream and refresh.
    Completed,
    /// Job failed: log the detail and reset.
    Failed(String),
    /// Update arrived while no job was running.
    Ignored,
}

/// Progress recorded for a running job.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct JobProgress {
    /// Most recent status text.
    pub last_status: Option<String>,
    /// Number of status events received.
    pub events: u32,
}

impl JobProgress {
    /// Record a status event, returning whether it completed the job.
    pub fn record(&mut self, event: &ReadStatusEvent) -> bool {
        self.events = self.events.saturating_add(1);
        self.last_status = Some(event.status.clone());
        event.is_completed()
    }

    /// Label shown next to the spinner.
    #[must_use]
    pub fn label(&self, fallback: &str) -> String {
        self.last_status
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Two-state job toggle used by the download control.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum JobState {
    /// No job running.
    #[default]
    Idle,
    /// Job in flight.
    Running(JobProgress),
}

impl JobState {
    /// Begin a job. Returns `false` when one is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        *self = Self::Running(JobProgress::default());
        true
    }

    /// Whether a job is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// Apply a stream update.
    pub fn apply(&mut self, update: JobUpdate) -> JobStep {
        let Self::Running(progress) = self else {
            return JobStep::Ignored;
        };
        let step = advance(progress, update);
        if step != JobStep::Progress {
            *self = Self::Idle;
        }
        step
    }
}

/// Apply an update to running progress without deciding the owning state.
pub fn advance(progress: &mut JobProgress, update: JobUpdate) -> JobStep {
    match update {
        JobUpdate::Status(event) => {
            if progress.record(&event) {
                JobStep::Completed
            } else {
                JobStep::Progress
            }
        }
        JobUpdate::Failed(detail) => JobStep::Failed(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(text: &str) -> JobUpdate {
        JobUpdate::Status(ReadStatusEvent {
            status: text.to_string(),
        })
    }

    #[test]
    fn start_is_rejected_while_running() {
        let mut state = JobState::default();
        assert!(state.start());
        assert!(!state.start());
        assert!(state.is_running());
    }

    #[test]
    fn progress_updates_label_until_completion() {
        let mut state = JobState::default();
        state.start();
        assert_eq!(state.apply(status("Processing post Day 1")), JobStep::Progress);
        match &state {
            JobState::Running(progress) => {
                assert_eq!(progress.label("Working"), "Processing post Day 1");
                assert_eq!(progress.events, 1);
            }
            JobState::Idle => panic!("job should still be running"),
        }
        assert_eq!(
            state.apply(status("Completed blog download, retrieved 1 posts")),
            JobStep::Completed
        );
        assert_eq!(state, JobState::Idle);
    }

    #[test]
    fn failure_resets_to_idle() {
        let mut state = JobState::default();
        state.start();
        assert_eq!(
            state.apply(JobUpdate::Failed("http 500".into())),
            JobStep::Failed("http 500".into())
        );
        assert_eq!(state, JobState::Idle);
    }

    #[test]
    fn updates_without_job_are_ignored() {
        let mut state = JobState::default();
        assert_eq!(state.apply(status("Completed")), JobStep::Ignored);
        assert_eq!(state, JobState::Idle);
    }

    #[test]
    fn label_falls_back_before_first_status() {
        assert_eq!(JobProgress::default().label("Starting"), "Starting");
    }
}
