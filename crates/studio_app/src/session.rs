use std::time::{Duration, Instant};

use studio_core::{update, AppState, AppViewModel, Effect, Msg, Notice, NoticeLevel};
use studio_logging::{studio_debug, studio_error, studio_info, studio_warn};

use crate::effects::EffectRunner;

/// One user's pipeline: the core state plus the engine that serves its effects.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Whether the visible state changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        studio_debug!("dispatch {}", msg_label(&msg));
        let stale = match &msg {
            Msg::GenerationFinished { request_id, .. } => {
                !self.state.accepts_generation(*request_id)
            }
            Msg::RenderFinished { request_id, .. } => !self.state.accepts_render(*request_id),
            _ => false,
        };
        if stale {
            studio_debug!("discarded stale {}", msg_label(&msg));
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            match effect {
                Effect::Notify(notice) => {
                    log_notice(&notice);
                    self.notices.push(notice);
                }
                effect => self.runner.run(effect, self.state.raw_text()),
            }
        }
    }

    /// Requests issued but not yet answered, superseded ones included.
    pub fn outstanding(&self) -> usize {
        self.runner.outstanding()
    }

    /// Dispatch every engine result that is already available. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(msg) = self.runner.try_next_msg() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    /// Like [`Session::settle`], but gives up after `timeout`.
    /// Returns whether everything answered.
    pub fn settle_for(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.runner.outstanding() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(msg) = self.runner.next_msg_timeout(remaining) {
                self.dispatch(msg);
            }
        }
        true
    }

    /// Feed engine results back in until every issued command has answered.
    ///
    /// Blocks without limit; meant for one-shot runs. Results for superseded
    /// requests are still collected and `update` ignores them.
    pub fn settle(&mut self) {
        while let Some(msg) = self.runner.next_msg() {
            self.dispatch(msg);
        }
        if self.runner.outstanding() > 0 {
            studio_error!("engine stopped with {} results pending", self.runner.outstanding());
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

fn log_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info | NoticeLevel::Success => studio_info!("notice: {}", notice.message),
        NoticeLevel::Error => studio_warn!("notice: {}", notice.message),
    }
}

/// Message name without its payload; raw text and HTML can be large.
fn msg_label(msg: &Msg) -> &'static str {
    match msg {
        Msg::NameChanged(_) => "NameChanged",
        Msg::DescriptionChanged(_) => "DescriptionChanged",
        Msg::FeaturesChanged(_) => "FeaturesChanged",
        Msg::TechnologiesChanged(_) => "TechnologiesChanged",
        Msg::LicenseChanged(_) => "LicenseChanged",
        Msg::Submitted => "Submitted",
        Msg::GenerationFinished { .. } => "GenerationFinished",
        Msg::TextEdited(_) => "TextEdited",
        Msg::RenderRequested => "RenderRequested",
        Msg::RenderFinished { .. } => "RenderFinished",
        Msg::CopyRequested => "CopyRequested",
        Msg::CopyFinished(_) => "CopyFinished",
        Msg::SaveRequested { .. } => "SaveRequested",
        Msg::SaveFinished { .. } => "SaveFinished",
        Msg::NoOp => "NoOp",
    }
}
