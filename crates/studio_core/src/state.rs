use std::fmt;

use serde::{Deserialize, Serialize};

use crate::view_model::AppViewModel;
use crate::ProjectDescriptor;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineStatus {
    #[default]
    Idle,
    Generating,
    Ready,
    GenerationFailed,
    Rendering,
    RenderFailed,
}

impl PipelineStatus {
    /// Whether a generation or render request is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, PipelineStatus::Generating | PipelineStatus::Rendering)
    }
}

/// Failure class as seen by the pipeline; mirrors the client taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureClass {
    Transport,
    ServiceStatus(u16),
    ContractViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub class: FailureClass,
    pub message: String,
}

impl FailureReason {
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// The raw README text.
    Markdown,
    /// The rendered preview wrapped into a standalone page.
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    descriptor: ProjectDescriptor,
    raw_text: String,
    rendered_html: Option<String>,
    status: PipelineStatus,
    generation_error: Option<FailureReason>,
    render_error: Option<FailureReason>,
    pending_generation: Option<RequestId>,
    pending_render: Option<RequestId>,
    next_request_id: RequestId,
    #[serde(skip)]
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status,
            descriptor: self.descriptor.clone(),
            raw_text: self.raw_text.clone(),
            rendered_html: self.rendered_html.clone(),
            generation_error: self.generation_error.clone(),
            render_error: self.render_error.clone(),
            can_render: self.can_render(),
            can_copy: !self.raw_text.is_empty(),
            dirty: self.dirty,
        }
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn rendered_html(&self) -> Option<&str> {
        self.rendered_html.as_deref()
    }

    pub fn descriptor(&self) -> &ProjectDescriptor {
        &self.descriptor
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut ProjectDescriptor {
        self.dirty = true;
        &mut self.descriptor
    }

    pub(crate) fn can_render(&self) -> bool {
        self.status != PipelineStatus::Generating && !self.raw_text.trim().is_empty()
    }

    fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    /// Enter `Generating`, wiping everything a previous run produced.
    pub(crate) fn begin_generation(&mut self) -> RequestId {
        let request_id = self.allocate_request_id();
        self.raw_text.clear();
        self.rendered_html = None;
        self.generation_error = None;
        self.render_error = None;
        self.pending_generation = Some(request_id);
        self.pending_render = None;
        self.status = PipelineStatus::Generating;
        self.dirty = true;
        request_id
    }

    /// Returns false when the answer belongs to a superseded request.
    pub fn accepts_generation(&self, request_id: RequestId) -> bool {
        self.pending_generation == Some(request_id)
    }

    pub fn accepts_render(&self, request_id: RequestId) -> bool {
        self.pending_render == Some(request_id)
    }

    pub(crate) fn fail_generation(&mut self, reason: FailureReason) {
        self.pending_generation = None;
        self.raw_text.clear();
        self.generation_error = Some(reason);
        self.status = PipelineStatus::GenerationFailed;
        self.dirty = true;
    }

    /// Store generated text and enter `Rendering` for it.
    pub(crate) fn complete_generation(&mut self, readme: String) -> RequestId {
        self.pending_generation = None;
        self.raw_text = readme;
        self.begin_render()
    }

    pub(crate) fn begin_render(&mut self) -> RequestId {
        let request_id = self.allocate_request_id();
        self.pending_render = Some(request_id);
        self.render_error = None;
        self.status = PipelineStatus::Rendering;
        self.dirty = true;
        request_id
    }

    pub(crate) fn complete_render(&mut self, html: String) {
        self.pending_render = None;
        self.rendered_html = Some(html);
        self.render_error = None;
        self.status = PipelineStatus::Ready;
        self.dirty = true;
    }

    pub(crate) fn fail_render(&mut self, reason: FailureReason) {
        self.pending_render = None;
        self.render_error = Some(reason);
        self.status = PipelineStatus::RenderFailed;
        self.dirty = true;
    }

    pub(crate) fn set_raw_text(&mut self, text: String) {
        if self.raw_text != text {
            self.raw_text = text;
            self.dirty = true;
        }
    }
}
