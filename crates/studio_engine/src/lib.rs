//! README studio engine: service clients, HTML sanitizing and effect execution.
mod clipboard;
mod engine;
mod export;
mod generate;
mod persist;
mod render;
mod sanitize;
mod settings;
mod types;

pub use clipboard::{ArboardClipboard, Clipboard, ClipboardError};
pub use engine::{EngineHandle, EngineServices};
pub use export::{build_preview_document, markdown_title, MARKDOWN_STYLESHEET};
pub use generate::{GenerationClient, ReadmeRequest, ReqwestGenerationClient};
pub use persist::{ensure_parent_dir, write_document, PersistError};
pub use render::{GithubRenderClient, RenderClient};
pub use sanitize::{AllowlistSanitizer, PassthroughSanitizer, Sanitizer};
pub use settings::{ClientSettings, EngineConfig, DEFAULT_GENERATOR_URL, DEFAULT_RENDER_URL};
pub use types::{ClientError, EngineError, EngineEvent, FailureKind, RequestId};
