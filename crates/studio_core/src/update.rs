use crate::{
    to_request, AppState, DocumentKind, Effect, FailureClass, FailureReason, Msg, Notice,
    PipelineStatus,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::NameChanged(name) => {
            state.descriptor_mut().name = name;
            Vec::new()
        }
        Msg::DescriptionChanged(description) => {
            state.descriptor_mut().description = description;
            Vec::new()
        }
        Msg::FeaturesChanged(raw) => {
            state.descriptor_mut().set_features(&raw);
            Vec::new()
        }
        Msg::TechnologiesChanged(raw) => {
            state.descriptor_mut().set_technologies(&raw);
            Vec::new()
        }
        Msg::LicenseChanged(raw) => {
            state.descriptor_mut().set_license(&raw);
            Vec::new()
        }
        Msg::Submitted => {
            // No mutual exclusion here: a resubmit supersedes whatever is in flight.
            let request = to_request(state.descriptor());
            let request_id = state.begin_generation();
            vec![Effect::Generate {
                request_id,
                request,
            }]
        }
        Msg::GenerationFinished { request_id, result } => {
            if !state.accepts_generation(request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(readme) if !readme.trim().is_empty() => {
                    let request_id = state.complete_generation(readme);
                    vec![Effect::Render {
                        request_id,
                        markdown: state.raw_text().to_string(),
                    }]
                }
                Ok(_) => {
                    let reason =
                        FailureReason::new(FailureClass::ContractViolation, "generation failed");
                    let notice = generation_failed_notice(&reason);
                    state.fail_generation(reason);
                    vec![notice]
                }
                Err(reason) => {
                    let notice = generation_failed_notice(&reason);
                    state.fail_generation(reason);
                    vec![notice]
                }
            }
        }
        Msg::TextEdited(text) => {
            state.set_raw_text(text);
            Vec::new()
        }
        Msg::RenderRequested => {
            if state.can_render() {
                let request_id = state.begin_render();
                vec![Effect::Render {
                    request_id,
                    markdown: state.raw_text().to_string(),
                }]
            } else if state.status() == PipelineStatus::Generating {
                Vec::new()
            } else {
                vec![Effect::Notify(Notice::info("Nothing to render yet."))]
            }
        }
        Msg::RenderFinished { request_id, result } => {
            if !state.accepts_render(request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(html) => {
                    state.complete_render(html);
                    Vec::new()
                }
                Err(reason) => {
                    let notice = Notice::error(format!("Preview could not be rendered: {reason}"));
                    state.fail_render(reason);
                    vec![Effect::Notify(notice)]
                }
            }
        }
        Msg::CopyRequested => {
            if state.raw_text().is_empty() {
                vec![Effect::Notify(Notice::info("Nothing to copy yet."))]
            } else {
                vec![Effect::CopyToClipboard {
                    text: state.raw_text().to_string(),
                }]
            }
        }
        Msg::CopyFinished(Ok(())) => vec![Effect::Notify(Notice::success("Copied to clipboard!"))],
        Msg::CopyFinished(Err(reason)) => vec![Effect::Notify(Notice::error(format!(
            "Failed to copy to clipboard: {reason}"
        )))],
        Msg::SaveRequested { kind, path } => {
            let contents = match kind {
                DocumentKind::Markdown => {
                    Some(state.raw_text()).filter(|text| !text.is_empty())
                }
                DocumentKind::Html => state.rendered_html(),
            };
            match contents {
                Some(contents) => vec![Effect::SaveDocument {
                    kind,
                    path,
                    contents: contents.to_string(),
                }],
                None => vec![Effect::Notify(Notice::info(match kind {
                    DocumentKind::Markdown => "Nothing to save yet.",
                    DocumentKind::Html => "No rendered preview to save yet.",
                }))],
            }
        }
        Msg::SaveFinished { path, result } => match result {
            Ok(()) => vec![Effect::Notify(Notice::success(format!(
                "Saved {}",
                path.display()
            )))],
            Err(reason) => vec![Effect::Notify(Notice::error(format!(
                "Failed to save {}: {reason}",
                path.display()
            )))],
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn generation_failed_notice(reason: &FailureReason) -> Effect {
    Effect::Notify(Notice::error(format!(
        "There was an error generating the README: {reason}"
    )))
}
