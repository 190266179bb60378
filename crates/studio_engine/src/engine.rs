use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use studio_logging::{studio_debug, studio_error, studio_info, studio_warn};

use crate::clipboard::{ArboardClipboard, Clipboard, ClipboardError};
use crate::generate::{GenerationClient, ReadmeRequest, ReqwestGenerationClient};
use crate::persist::{write_document, PersistError};
use crate::render::{GithubRenderClient, RenderClient};
use crate::sanitize::{AllowlistSanitizer, PassthroughSanitizer, Sanitizer};
use crate::{EngineConfig, EngineError, EngineEvent, RequestId};

enum EngineCommand {
    Generate {
        request_id: RequestId,
        request: ReadmeRequest,
    },
    Render {
        request_id: RequestId,
        markdown: String,
    },
    Copy {
        text: String,
    },
    Save {
        path: PathBuf,
        contents: String,
    },
}

/// Collaborators the engine drives. Swap any of them out in tests.
#[derive(Clone)]
pub struct EngineServices {
    pub generator: Arc<dyn GenerationClient>,
    pub renderer: Arc<dyn RenderClient>,
    pub sanitizer: Arc<dyn Sanitizer>,
    pub clipboard: Arc<dyn Clipboard>,
}

impl EngineServices {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let generator = ReqwestGenerationClient::new(&config.generator_url, &config.client)?;
        let renderer = GithubRenderClient::new(&config.render_url, &config.client)?;
        let sanitizer: Arc<dyn Sanitizer> = if config.trust_rendered_html {
            studio_warn!("Rendered HTML will be shown without sanitizing");
            Arc::new(PassthroughSanitizer)
        } else {
            Arc::new(AllowlistSanitizer)
        };
        Ok(Self {
            generator: Arc::new(generator),
            renderer: Arc::new(renderer),
            sanitizer,
            clipboard: Arc::new(ArboardClipboard),
        })
    }
}

/// Handle to the IO thread. Commands are fire-and-forget; results come back as
/// [`EngineEvent`]s in completion order. Nothing is ever cancelled.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::with_services(EngineServices::from_config(config)?)
    }

    pub fn with_services(services: EngineServices) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let services = Arc::new(services);

        thread::Builder::new()
            .name("studio-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let services = services.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(services.as_ref(), command, event_tx).await;
                    });
                }
                studio_debug!("engine command channel closed; shutting down");
                runtime.shutdown_background();
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn generate(&self, request_id: RequestId, request: ReadmeRequest) {
        self.send(EngineCommand::Generate {
            request_id,
            request,
        });
    }

    pub fn render(&self, request_id: RequestId, markdown: impl Into<String>) {
        self.send(EngineCommand::Render {
            request_id,
            markdown: markdown.into(),
        });
    }

    pub fn copy(&self, text: impl Into<String>) {
        self.send(EngineCommand::Copy { text: text.into() });
    }

    pub fn save(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.send(EngineCommand::Save {
            path: path.into(),
            contents: contents.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event. `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            studio_error!("engine thread is not running; command dropped");
        }
    }
}

async fn handle_command(
    services: &EngineServices,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Generate {
            request_id,
            request,
        } => {
            let result = services.generator.generate(&request).await;
            match &result {
                Ok(readme) => studio_info!(
                    "generation {} succeeded ({} bytes)",
                    request_id,
                    readme.len()
                ),
                Err(err) => studio_warn!("generation {} failed: {} ({})", request_id, err, err.kind),
            }
            EngineEvent::GenerationCompleted { request_id, result }
        }
        EngineCommand::Render {
            request_id,
            markdown,
        } => {
            let result = services
                .renderer
                .render(&markdown)
                .await
                .map(|html| services.sanitizer.sanitize(&html));
            match &result {
                Ok(html) => studio_info!("render {} succeeded ({} bytes)", request_id, html.len()),
                Err(err) => studio_warn!("render {} failed: {} ({})", request_id, err, err.kind),
            }
            EngineEvent::RenderCompleted { request_id, result }
        }
        EngineCommand::Copy { text } => {
            let clipboard = services.clipboard.clone();
            let result = tokio::task::spawn_blocking(move || clipboard.set_text(&text))
                .await
                .unwrap_or_else(|err| Err(ClipboardError::Unavailable(err.to_string())));
            EngineEvent::CopyCompleted(result)
        }
        EngineCommand::Save { path, contents } => {
            let target = path.clone();
            let result = tokio::task::spawn_blocking(move || write_document(&target, &contents))
                .await
                .unwrap_or_else(|err| {
                    Err(PersistError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        err.to_string(),
                    )))
                });
            if let Err(err) = &result {
                studio_warn!("saving {:?} failed: {}", path, err);
            }
            EngineEvent::SaveCompleted { path, result }
        }
    };
    let _ = event_tx.send(event);
}
