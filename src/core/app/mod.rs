//! Application state: the session, the auth flow, the conversation, the
//! mood trend, and the chart, composed behind the action dispatcher that
//! the event loop drives.

mod actions;
pub mod ui_state;


pub use actions::{apply_action, ActionDispatcher, AppAction, AppCommand};

use tracing::debug;

use crate::core::conversation::Conversation;
use crate::core::language::Language;
use crate::core::mood::MoodTrend;
use crate::core::session::{AuthFlow, Session};
use crate::ui::chart::{ChartAdapter, TuiChartSurface};
use crate::utils::logging::TranscriptLog;

use self::ui_state::{Screen, UiState};

pub struct App {
    pub session: Session,
    pub auth: AuthFlow,
    pub conversation: Conversation,
    pub trend: MoodTrend,
    pub chart: ChartAdapter<TuiChartSurface>,
    pub ui: UiState,
    pub language: Language,
    pub transcript: TranscriptLog,
    /// Bumped on logout; completions stamped with an older epoch are
    /// dropped instead of mutating the new session's state.
    pub epoch: u64,
}

impl App {
    pub fn new(session: Session, language: Language, transcript: TranscriptLog) -> Self {
        let restored = session.is_authenticated();
        let auth = if restored {
            AuthFlow::restored()
        } else {
            AuthFlow::new()
        };
        let mut app = Self {
            session,
            auth,
            conversation: Conversation::new(),
            trend: MoodTrend::new(),
            chart: ChartAdapter::new(TuiChartSurface::new()),
            ui: UiState::new(Screen::Login),
            language,
            transcript,
            epoch: 0,
        };
        if restored {
            app.ui.screen = Screen::Chat;
            app.chart.surface_mut().mount();
        }
        app
    }

    /// Work to kick off before the first frame: a session restored from the
    /// token store is already authenticated, so its one trend fetch happens
    /// at startup instead of behind a login transition.
    pub fn startup_command(&self) -> Option<AppCommand> {
        if !self.auth.is_authenticated() {
            return None;
        }
        let token = self.session.token()?.to_string();
        Some(AppCommand::FetchTrend {
            epoch: self.epoch,
            token,
        })
    }

    /// Tear the session down: forget the token, drop the transcript and
    /// series, destroy the chart, and return to the login screen. In-flight
    /// completions are invalidated by the epoch bump.
    pub fn logout(&mut self) {
        self.epoch += 1;
        self.auth.reset();
        match self.session.clear_token() {
            Ok(()) => self.ui.set_status("Logged out."),
            Err(err) => self.ui.set_status(format!("Could not clear session: {err}")),
        }
        self.conversation.clear();
        self.trend.clear();
        self.chart.teardown();
        self.chart.surface_mut().unmount();
        self.ui.screen = Screen::Login;
        self.ui.password_input.clear();
        self.ui.input.clear();
        self.ui.scroll_offset = 0;
        self.ui.auto_scroll = true;
        debug!(epoch = self.epoch, "session ended");
    }
}
