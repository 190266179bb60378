use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use studio_core::{DocumentKind, Effect, FailureClass, FailureReason, GenerationRequest, Msg};
use studio_engine::{
    build_preview_document, markdown_title, ClientError, EngineEvent, EngineHandle, FailureKind,
    ReadmeRequest,
};
use studio_logging::{studio_debug, studio_info};

/// Executes core effects on the engine and turns engine events back into messages.
///
/// `Notify` effects are not handled here; the session shows those itself.
pub struct EffectRunner {
    engine: EngineHandle,
    rendered_utc: Arc<dyn Fn() -> String + Send + Sync>,
    outstanding: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            rendered_utc: Arc::new(|| Utc::now().to_rfc3339()),
            outstanding: 0,
        }
    }

    #[cfg(test)]
    pub fn with_clock(engine: EngineHandle, clock: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            engine,
            rendered_utc: Arc::new(clock),
            outstanding: 0,
        }
    }

    /// Engine commands whose completion has not been collected yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// `markdown` is the current raw text; it names the exported preview page.
    pub fn run(&mut self, effect: Effect, markdown: &str) {
        match effect {
            Effect::Generate {
                request_id,
                request,
            } => {
                studio_info!(
                    "Generate request_id={} project={:?} features={} technologies={}",
                    request_id,
                    request.project_name,
                    request.features.len(),
                    request.technologies.len()
                );
                self.engine.generate(request_id, to_readme_request(request));
            }
            Effect::Render {
                request_id,
                markdown,
            } => {
                studio_info!("Render request_id={} bytes={}", request_id, markdown.len());
                self.engine.render(request_id, markdown);
            }
            Effect::CopyToClipboard { text } => {
                studio_debug!("Copy bytes={}", text.len());
                self.engine.copy(text);
            }
            Effect::SaveDocument {
                kind,
                path,
                contents,
            } => {
                let contents = match kind {
                    DocumentKind::Markdown => contents,
                    DocumentKind::Html => build_preview_document(
                        markdown_title(markdown),
                        &contents,
                        &(self.rendered_utc)(),
                    ),
                };
                studio_debug!("Save kind={:?} path={:?}", kind, path);
                self.engine.save(path, contents);
            }
            Effect::Notify(_) => return,
        }
        self.outstanding += 1;
    }

    /// Block for the next engine result. `None` when nothing is outstanding.
    pub fn next_msg(&mut self) -> Option<Msg> {
        if self.outstanding == 0 {
            return None;
        }
        let event = self.engine.recv()?;
        Some(self.received(event))
    }

    /// Next result if one has already arrived.
    pub fn try_next_msg(&mut self) -> Option<Msg> {
        if self.outstanding == 0 {
            return None;
        }
        let event = self.engine.try_recv()?;
        Some(self.received(event))
    }

    pub fn next_msg_timeout(&mut self, timeout: Duration) -> Option<Msg> {
        if self.outstanding == 0 {
            return None;
        }
        let event = self.engine.recv_timeout(timeout)?;
        Some(self.received(event))
    }

    fn received(&mut self, event: EngineEvent) -> Msg {
        self.outstanding = self.outstanding.saturating_sub(1);
        event_to_msg(event)
    }
}

pub fn to_readme_request(request: GenerationRequest) -> ReadmeRequest {
    ReadmeRequest {
        project_name: request.project_name,
        description: request.description,
        features: request.features,
        technologies: request.technologies,
        license: request.license,
    }
}

pub fn map_failure(err: ClientError) -> FailureReason {
    let class = match err.kind {
        FailureKind::Transport => FailureClass::Transport,
        FailureKind::ServiceStatus(code) => FailureClass::ServiceStatus(code),
        FailureKind::ContractViolation => FailureClass::ContractViolation,
    };
    FailureReason::new(class, err.message)
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::GenerationCompleted { request_id, result } => Msg::GenerationFinished {
            request_id,
            result: result.map_err(map_failure),
        },
        EngineEvent::RenderCompleted { request_id, result } => Msg::RenderFinished {
            request_id,
            result: result.map_err(map_failure),
        },
        EngineEvent::CopyCompleted(result) => {
            Msg::CopyFinished(result.map_err(|err| err.to_string()))
        }
        EngineEvent::SaveCompleted { path, result } => Msg::SaveFinished {
            path,
            result: result.map(|_| ()).map_err(|err| err.to_string()),
        },
    }
}
