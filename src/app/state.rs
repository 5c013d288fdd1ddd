#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    /// Report or error text of the last settled request.
    pub fn result_text(&self) -> Option<&str> {
        match self {
            SubmissionState::Success(report) => Some(report),
            SubmissionState::Failed(message) => Some(message),
            SubmissionState::Idle | SubmissionState::Loading => None,
        }
    }
}
