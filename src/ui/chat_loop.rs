//! Main event loop: terminal setup, key handling, and the bridge between
//! applied actions and the async work they spawn.
//!
//! All state mutation happens on this loop. Spawned tasks only talk to the
//! backend and report completions through the [`ActionDispatcher`]; the
//! loop drains those completions between frames, so ordering concerns
//! reduce to the order actions are applied.

use std::{error::Error, io, sync::Arc, time::Duration};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::{http::HttpBackend, Backend};
use crate::auth::KeyringTokenStore;
use crate::core::app::ui_state::Screen;
use crate::core::app::{apply_action, ActionDispatcher, App, AppAction, AppCommand};
use crate::core::language::Language;
use crate::core::session::Session;
use crate::ui::renderer::{max_scroll_offset, transcript_view_height, ui};
use crate::utils::logging::TranscriptLog;

/// Everything `run_chat` needs from the CLI/config layer.
pub struct ChatSetup {
    pub server_url: String,
    pub language: Language,
    pub log_file: Option<String>,
}

pub async fn run_chat(setup: ChatSetup) -> Result<(), Box<dyn Error>> {
    let transcript = TranscriptLog::new(setup.log_file)?;
    let session = Session::load(Box::new(KeyringTokenStore::new()));
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&setup.server_url));
    let mut app = App::new(session, setup.language, transcript);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = ActionDispatcher::new(action_tx);

    // A restored session fetches its mood trend before the first frame.
    if let Some(command) = app.startup_command() {
        execute_command(command, &backend, &dispatcher);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let result = run_event_loop(&mut terminal, &mut app, &backend, &dispatcher, &mut action_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: &Arc<dyn Backend>,
    dispatcher: &ActionDispatcher,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let viewport = transcript_view_height(terminal.size()?.height);
                    if let Some(action) = handle_key(app, key, viewport) {
                        if let Some(command) = apply_action(app, action) {
                            execute_command(command, backend, dispatcher);
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    let viewport = transcript_view_height(terminal.size()?.height);
                    match mouse.kind {
                        MouseEventKind::ScrollUp => scroll_transcript_up(app, 3, viewport),
                        MouseEventKind::ScrollDown => {
                            let max = max_scroll_offset(app, viewport);
                            app.ui.scroll_down(3, max);
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Drain completions from spawned tasks in arrival order.
        while let Ok(action) = action_rx.try_recv() {
            if let Some(command) = apply_action(app, action) {
                execute_command(command, backend, dispatcher);
            }
        }

        if app.ui.exit_requested {
            break Ok(());
        }
    }
}

/// Translate a key press into an action, mutating pure input state (typing,
/// focus, scrolling) directly.
fn handle_key(app: &mut App, key: KeyEvent, viewport: u16) -> Option<AppAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.ui.exit_requested = true;
                return None;
            }
            KeyCode::Char('n') if app.ui.screen == Screen::Login => {
                return Some(AppAction::SubmitRegister);
            }
            KeyCode::Char('g') if app.ui.screen == Screen::Chat => {
                return Some(AppAction::CycleLanguage);
            }
            KeyCode::Char('d') if app.ui.screen == Screen::Chat => {
                return Some(AppAction::Logout);
            }
            _ => return None,
        }
    }

    match app.ui.screen {
        Screen::Login => match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                app.ui.cycle_login_focus();
                None
            }
            KeyCode::Enter => Some(AppAction::SubmitLogin),
            KeyCode::Char(c) => {
                app.ui.active_input_mut().push(c);
                None
            }
            KeyCode::Backspace => {
                app.ui.active_input_mut().pop();
                None
            }
            _ => None,
        },
        Screen::Chat => match key.code {
            KeyCode::Enter => Some(AppAction::SubmitMessage),
            KeyCode::Char(c) => {
                app.ui.input.push(c);
                None
            }
            KeyCode::Backspace => {
                app.ui.input.pop();
                None
            }
            KeyCode::Up => {
                scroll_transcript_up(app, 1, viewport);
                None
            }
            KeyCode::Down => {
                let max = max_scroll_offset(app, viewport);
                app.ui.scroll_down(1, max);
                None
            }
            _ => None,
        },
    }
}

/// Leaving auto-scroll means picking up from the pinned bottom position,
/// not from whatever stale offset was last stored.
fn scroll_transcript_up(app: &mut App, lines: u16, viewport: u16) {
    if app.ui.auto_scroll {
        app.ui.scroll_offset = max_scroll_offset(app, viewport);
    }
    app.ui.scroll_up(lines);
}

/// Spawn the async work named by a command. Completions come back through
/// the dispatcher; nothing here touches app state.
fn execute_command(command: AppCommand, backend: &Arc<dyn Backend>, dispatcher: &ActionDispatcher) {
    let backend = Arc::clone(backend);
    let dispatcher = dispatcher.clone();
    match command {
        AppCommand::Login {
            attempt,
            username,
            password,
        } => {
            tokio::spawn(async move {
                let result = backend
                    .login(&username, &password)
                    .await
                    .map_err(|e| e.to_string());
                dispatcher.dispatch(AppAction::LoginCompleted { attempt, result });
            });
        }
        AppCommand::Register { username, password } => {
            tokio::spawn(async move {
                let result = backend
                    .register(&username, &password)
                    .await
                    .map_err(|e| e.to_string());
                dispatcher.dispatch(AppAction::RegisterCompleted { result });
            });
        }
        AppCommand::SendChat {
            epoch,
            token,
            outbound,
        } => {
            tokio::spawn(async move {
                let result = backend
                    .send_chat(&token, &outbound.message, outbound.language)
                    .await
                    .map_err(|e| e.to_string());
                dispatcher.dispatch(AppAction::ChatCompleted {
                    epoch,
                    request_id: outbound.request_id,
                    result,
                });
            });
        }
        AppCommand::FetchTrend { epoch, token } => {
            tokio::spawn(async move {
                let result = backend
                    .fetch_mood_trend(&token)
                    .await
                    .map_err(|e| e.to_string());
                dispatcher.dispatch(AppAction::TrendCompleted { epoch, result });
            });
        }
    }
}
