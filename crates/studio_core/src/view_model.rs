use crate::{FailureReason, PipelineStatus, ProjectDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: PipelineStatus,
    pub descriptor: ProjectDescriptor,
    pub raw_text: String,
    pub rendered_html: Option<String>,
    pub generation_error: Option<FailureReason>,
    pub render_error: Option<FailureReason>,
    pub can_render: bool,
    pub can_copy: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Generate stays available while busy; a resubmit supersedes the request in flight.
    pub fn submit_enabled(&self) -> bool {
        self.descriptor.is_submittable()
    }

    pub fn status_line(&self) -> String {
        match self.status {
            PipelineStatus::Idle => "Idle".to_string(),
            PipelineStatus::Generating => "Generating...".to_string(),
            PipelineStatus::Rendering => "Rendering preview...".to_string(),
            PipelineStatus::Ready => "Ready".to_string(),
            PipelineStatus::GenerationFailed => match &self.generation_error {
                Some(reason) => format!("Generation failed: {reason}"),
                None => "Generation failed".to_string(),
            },
            PipelineStatus::RenderFailed => match &self.render_error {
                Some(reason) => format!("Render failed: {reason}"),
                None => "Render failed".to_string(),
            },
        }
    }
}
