//! PDF export form and download menu state.
//!
//! # Design
//! - Keep form inputs as strings for lossless editing.
//! - Convert to a [`DateRange`] only on export.
//! - Validation failures keep the form open with an inline message.

use crate::features::jobs::state::{JobProgress, JobStep, JobUpdate, advance};
use blog_export_api_models::{DateRange, PdfDownload, PdfTemplate};

/// Raw export form fields.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PdfForm {
    /// Start date as entered (`yyyy-mm-dd`).
    pub start: String,
    /// End date as entered (`yyyy-mm-dd`).
    pub end: String,
    /// Selected layout.
    pub template: PdfTemplate,
    /// Validation message from the last export attempt.
    pub error: Option<String>,
}

/// Three-state export control.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CreatePdfState {
    /// Only the "Export as PDF" button is shown.
    #[default]
    Idle,
    /// Date pickers and template select are shown.
    Configuring(PdfForm),
    /// Generation job in flight.
    Exporting(JobProgress),
}

/// User intent and stream updates for the export control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreatePdfAction {
    /// Open the form.
    Open,
    /// Start date edited.
    SetStart(String),
    /// End date edited.
    SetEnd(String),
    /// Template selected.
    SetTemplate(PdfTemplate),
    /// Close the form without exporting.
    Cancel,
    /// Validate the form and start generation.
    Export,
    /// Update from the generation stream.
    Job(JobUpdate),
}

/// Side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreatePdfEffect {
    /// Nothing to do.
    None,
    /// Open the generation stream for this range.
    StartJob(DateRange),
    /// Generation finished: close the stream and refresh.
    Finished,
    /// Generation failed: log the detail.
    Failed(String),
}

impl CreatePdfState {
    /// Apply an action, returning the effect the view must perform.
    pub fn apply(&mut self, action: CreatePdfAction) -> CreatePdfEffect {
        match (std::mem::take(self), action) {
            (Self::Idle, CreatePdfAction::Open) => {
                *self = Self::Configuring(PdfForm::default());
                CreatePdfEffect::None
            }
            (Self::Configuring(mut form), CreatePdfAction::SetStart(value)) => {
                form.start = value;
                *self = Self::Configuring(form);
                CreatePdfEffect::None
            }
            (Self::Configuring(mut form), CreatePdfAction::SetEnd(value)) => {
                form.end = value;
                *self = Self::Configuring(form);
                CreatePdfEffect::None
            }
            (Self::Configuring(mut form), CreatePdfAction::SetTemplate(template)) => {
                form.template = template;
                *self = Self::Configuring(form);
                CreatePdfEffect::None
            }
            (Self::Configuring(_), CreatePdfAction::Cancel) => CreatePdfEffect::None,
            (Self::Configuring(mut form), CreatePdfAction::Export) => {
                match DateRange::parse(&form.start, &form.end) {
                    Ok(range) => {
                        *self = Self::Exporting(JobProgress::default());
                        CreatePdfEffect::StartJob(range)
                    }
                    Err(err) => {
                        form.error = Some(err.to_string());
                        *self = Self::Configuring(form);
                        CreatePdfEffect::None
                    }
                }
            }
            (Self::Exporting(mut progress), CreatePdfAction::Job(update)) => {
                match advance(&mut progress, update) {
                    JobStep::Progress => {
                        *self = Self::Exporting(progress);
                        CreatePdfEffect::None
                    }
                    JobStep::Completed => CreatePdfEffect::Finished,
                    JobStep::Failed(detail) => CreatePdfEffect::Failed(detail),
                    JobStep::Ignored => CreatePdfEffect::None,
                }
            }
            (previous, _) => {
                *self = previous;
                CreatePdfEffect::None
            }
        }
    }
}

/// Popover menu listing generated PDFs for one blog.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PdfMenuState {
    /// Whether the popover is visible.
    pub open: bool,
    /// Entries from the last successful list response.
    pub downloads: Vec<PdfDownload>,
}

impl PdfMenuState {
    /// Flip popover visibility.
    pub const fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Hide the popover.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Replace the listed downloads.
    pub fn set_downloads(&mut self, downloads: Vec<PdfDownload>) {
        self.downloads = downloads
            .into_iter()
            .filter(|download| !download.file_name().is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_export_api_models::ReadStatusEvent;

    fn configured(start: &str, end: &str) -> CreatePdfState {
        let mut state = CreatePdfState::default();
        state.apply(CreatePdfAction::Open);
        state.apply(CreatePdfAction::SetStart(start.into()));
        state.apply(CreatePdfAction::SetEnd(end.into()));
        state
    }

    fn status(text: &str) -> CreatePdfAction {
        CreatePdfAction::Job(JobUpdate::Status(ReadStatusEvent {
            status: text.into(),
        }))
    }

    #[test]
    fn open_then_cancel_returns_to_idle() {
        let mut state = CreatePdfState::default();
        assert_eq!(state.apply(CreatePdfAction::Open), CreatePdfEffect::None);
        assert!(matches!(state, CreatePdfState::Configuring(_)));
        state.apply(CreatePdfAction::Cancel);
        assert_eq!(state, CreatePdfState::Idle);
    }

    #[test]
    fn export_with_valid_range_starts_job() {
        let mut state = configured("2017-01-01", "2017-03-31");
        let effect = state.apply(CreatePdfAction::Export);
        assert!(matches!(effect, CreatePdfEffect::StartJob(range) if range.to().to_string() == "2017-03-31"));
        assert!(matches!(state, CreatePdfState::Exporting(_)));
    }

    #[test]
    fn export_with_missing_date_keeps_form_open() {
        let mut state = configured("2017-01-01", "");
        assert_eq!(state.apply(CreatePdfAction::Export), CreatePdfEffect::None);
        match state {
            CreatePdfState::Configuring(form) => {
                assert_eq!(form.error.as_deref(), Some("end date is required"));
                assert_eq!(form.start, "2017-01-01");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn export_with_inverted_range_is_rejected() {
        let mut state = configured("2017-05-01", "2017-01-01");
        assert_eq!(state.apply(CreatePdfAction::Export), CreatePdfEffect::None);
        assert!(matches!(state, CreatePdfState::Configuring(ref form) if form.error.is_some()));
    }

    #[test]
    fn generation_progress_then_completion() {
        let mut state = configured("2017-01-01", "2017-01-31");
        state.apply(CreatePdfAction::Export);
        assert_eq!(state.apply(status("Writing page 3")), CreatePdfEffect::None);
        assert!(
            matches!(&state, CreatePdfState::Exporting(progress) if progress.last_status.as_deref() == Some("Writing page 3"))
        );
        assert_eq!(
            state.apply(status("Completed PDF generation")),
            CreatePdfEffect::Finished
        );
        assert_eq!(state, CreatePdfState::Idle);
    }

    #[test]
    fn generation_failure_resets() {
        let mut state = configured("2017-01-01", "2017-01-31");
        state.apply(CreatePdfAction::Export);
        assert_eq!(
            state.apply(CreatePdfAction::Job(JobUpdate::Failed("stream ended".into()))),
            CreatePdfEffect::Failed("stream ended".into())
        );
        assert_eq!(state, CreatePdfState::Idle);
    }

    #[test]
    fn out_of_phase_actions_are_no_ops() {
        let mut state = CreatePdfState::default();
        assert_eq!(state.apply(CreatePdfAction::Export), CreatePdfEffect::None);
        assert_eq!(state.apply(status("Completed")), CreatePdfEffect::None);
        assert_eq!(state, CreatePdfState::Idle);
        let mut exporting = configured("2017-01-01", "2017-01-02");
        exporting.apply(CreatePdfAction::Export);
        exporting.apply(CreatePdfAction::Cancel);
        assert!(matches!(exporting, CreatePdfState::Exporting(_)));
    }

    #[test]
    fn template_selection_is_kept() {
        let mut state = configured("2017-01-01", "2017-01-02");
        state.apply(CreatePdfAction::SetTemplate(PdfTemplate::LeftWrapImages));
        assert!(
            matches!(state, CreatePdfState::Configuring(ref form) if form.template == PdfTemplate::LeftWrapImages)
        );
    }

    #[test]
    fn menu_toggles_and_closes() {
        let mut menu = PdfMenuState::default();
        menu.toggle();
        assert!(menu.open);
        menu.set_downloads(vec![PdfDownload::new("output/a.pdf")]);
        menu.close();
        assert!(!menu.open);
        assert_eq!(menu.downloads.len(), 1);
    }

    #[test]
    fn menu_skips_folder_keys() {
        let mut menu = PdfMenuState::default();
        menu.set_downloads(vec![
            PdfDownload::new("output/"),
            PdfDownload::new("output/Travel.pdf"),
        ]);
        assert_eq!(menu.downloads, vec![PdfDownload::new("output/Travel.pdf")]);
    }
}
