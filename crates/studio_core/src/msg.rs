use std::path::PathBuf;

use crate::{DocumentKind, FailureReason, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the project name field.
    NameChanged(String),
    /// User edited the description field.
    DescriptionChanged(String),
    /// User edited the comma-separated features field.
    FeaturesChanged(String),
    /// User edited the comma-separated technologies field.
    TechnologiesChanged(String),
    /// User edited the optional license field.
    LicenseChanged(String),
    /// User submitted the form for generation.
    Submitted,
    /// Generation service answered (or failed) for a request.
    GenerationFinished {
        request_id: RequestId,
        result: Result<String, FailureReason>,
    },
    /// User replaced the raw README text in the editor.
    TextEdited(String),
    /// User asked to re-render the current raw text.
    RenderRequested,
    /// Rendering service answered (or failed) for a request.
    RenderFinished {
        request_id: RequestId,
        result: Result<String, FailureReason>,
    },
    /// User clicked Copy.
    CopyRequested,
    /// Clipboard write completed.
    CopyFinished(Result<(), String>),
    /// User asked to save the README or the rendered preview.
    SaveRequested { kind: DocumentKind, path: PathBuf },
    /// Document write completed.
    SaveFinished {
        path: PathBuf,
        result: Result<(), String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
