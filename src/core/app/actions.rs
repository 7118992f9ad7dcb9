//! Action dispatch: every user intent and every network completion becomes
//! an [`AppAction`] applied to the app state on the event loop's thread.
//! Applying an action may emit an [`AppCommand`] naming async work for the
//! loop to spawn; spawned tasks report back by dispatching further actions
//! through the [`ActionDispatcher`].

use tokio::sync::mpsc;
use tracing::debug;

use super::App;
use crate::api::ChatReply;
use crate::core::conversation::OutboundChat;
use crate::core::mood::MoodPoint;
use crate::core::session::LoginResolution;
use crate::core::app::ui_state::Screen;

pub enum AppAction {
    /// Submit the login form.
    SubmitLogin,
    /// Submit the login form's credentials as a registration.
    SubmitRegister,
    LoginCompleted {
        attempt: u64,
        result: Result<String, String>,
    },
    RegisterCompleted {
        result: Result<(), String>,
    },
    /// Send the pending chat input.
    SubmitMessage,
    ChatCompleted {
        epoch: u64,
        request_id: u64,
        result: Result<ChatReply, String>,
    },
    TrendCompleted {
        epoch: u64,
        result: Result<Vec<MoodPoint>, String>,
    },
    CycleLanguage,
    Logout,
    SetStatus {
        message: String,
    },
    ClearStatus,
}

/// Async work for the event loop to spawn. Authenticated commands carry the
/// bearer token captured from the session at emission time.
#[derive(Debug, PartialEq, Eq)]
pub enum AppCommand {
    Login {
        attempt: u64,
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
    },
    SendChat {
        epoch: u64,
        token: String,
        outbound: OutboundChat,
    },
    FetchTrend {
        epoch: u64,
        token: String,
    },
}

/// Cloneable handle that spawned tasks use to feed completions back into
/// the event loop.
#[derive(Clone)]
pub struct ActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl ActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitLogin => submit_login(app),
        AppAction::SubmitRegister => submit_register(app),
        AppAction::LoginCompleted { attempt, result } => login_completed(app, attempt, result),
        AppAction::RegisterCompleted { result } => {
            match result {
                Ok(()) => app
                    .ui
                    .set_status("Registered successfully! Please log in."),
                Err(reason) => app.ui.set_status(format!("Registration failed: {reason}")),
            }
            None
        }
        AppAction::SubmitMessage => submit_message(app),
        AppAction::ChatCompleted {
            epoch,
            request_id,
            result,
        } => chat_completed(app, epoch, request_id, result),
        AppAction::TrendCompleted { epoch, result } => trend_completed(app, epoch, result),
        AppAction::CycleLanguage => {
            app.language = app.language.cycle();
            app.ui.set_status(format!(
                "Language: {} ({})",
                app.language.display_name(),
                app.language
            ));
            None
        }
        AppAction::Logout => {
            app.logout();
            None
        }
        AppAction::SetStatus { message } => {
            app.ui.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
    }
}

fn submit_login(app: &mut App) -> Option<AppCommand> {
    let username = app.ui.username_input.trim().to_string();
    let password = app.ui.password_input.clone();
    if username.is_empty() || password.is_empty() {
        app.ui.set_status("Enter a username and password to log in.");
        return None;
    }
    app.ui.clear_status();
    let attempt = app.auth.begin_login();
    Some(AppCommand::Login {
        attempt,
        username,
        password,
    })
}

fn submit_register(app: &mut App) -> Option<AppCommand> {
    let username = app.ui.username_input.trim().to_string();
    let password = app.ui.password_input.clone();
    if username.is_empty() || password.is_empty() {
        app.ui
            .set_status("Enter a username and password to register.");
        return None;
    }
    app.ui.clear_status();
    Some(AppCommand::Register { username, password })
}

fn login_completed(
    app: &mut App,
    attempt: u64,
    result: Result<String, String>,
) -> Option<AppCommand> {
    let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
    match app.auth.resolve_login(attempt, outcome) {
        LoginResolution::Authenticated => {
            let token = result.expect("authenticated resolution carries a token");
            if let Err(err) = app.session.set_token(token.clone()) {
                // The in-memory session is still live; only persistence
                // failed, so the user can keep going but should know.
                app.ui.set_status(format!("Could not save session: {err}"));
            } else {
                app.ui.clear_status();
            }
            app.ui.password_input.clear();
            app.ui.screen = Screen::Chat;
            app.chart.surface_mut().mount();
            Some(AppCommand::FetchTrend {
                epoch: app.epoch,
                token,
            })
        }
        LoginResolution::Failed | LoginResolution::Stale => None,
    }
}

fn submit_message(app: &mut App) -> Option<AppCommand> {
    let token = app.session.token()?.to_string();
    let text = app.ui.input.clone();
    let outbound = app.conversation.prepare_send(&text, app.language)?;
    if let Some(message) = app.conversation.messages().last() {
        if let Err(err) = app.transcript.record(message) {
            debug!("transcript write failed: {err}");
        }
    }
    app.ui.input.clear();
    app.ui.auto_scroll = true;
    Some(AppCommand::SendChat {
        epoch: app.epoch,
        token,
        outbound,
    })
}

fn chat_completed(
    app: &mut App,
    epoch: u64,
    request_id: u64,
    result: Result<ChatReply, String>,
) -> Option<AppCommand> {
    if epoch != app.epoch {
        debug!(request_id, "chat completion from a previous session dropped");
        return None;
    }
    match result {
        Ok(reply) => {
            let message = app.conversation.merge_reply(&reply);
            if let Err(err) = app.transcript.record(message) {
                debug!("transcript write failed: {err}");
            }
        }
        Err(reason) => {
            app.ui.set_status(format!("Message send failed: {reason}"));
        }
    }
    None
}

fn trend_completed(
    app: &mut App,
    epoch: u64,
    result: Result<Vec<MoodPoint>, String>,
) -> Option<AppCommand> {
    if epoch != app.epoch {
        debug!("trend completion from a previous session dropped");
        return None;
    }
    match result {
        Ok(points) => {
            app.trend.replace(points);
            app.chart.render(&app.trend.plot_points());
        }
        Err(reason) => {
            app.ui.set_status(format!("Trend fetch failed: {reason}"));
        }
    }
    None
}
