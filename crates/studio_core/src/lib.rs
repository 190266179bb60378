//! README studio core: pure pipeline state machine, input model and view-model helpers.
mod effect;
mod input;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notice, NoticeLevel};
pub use input::{split_list, to_request, GenerationRequest, ProjectDescriptor};
pub use msg::Msg;
pub use state::{
    AppState, DocumentKind, FailureClass, FailureReason, PipelineStatus, RequestId,
};
pub use update::update;
pub use view_model::AppViewModel;
