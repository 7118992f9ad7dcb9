//! Mutable interface state: which screen is showing, the input buffers,
//! scroll position, and the one-line status display.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

pub struct UiState {
    pub screen: Screen,
    pub username_input: String,
    pub password_input: String,
    pub login_focus: LoginField,
    /// Pending chat input buffer.
    pub input: String,
    /// One-line status/notice display; `None` when clear.
    pub status: Option<String>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            username_input: String::new(),
            password_input: String::new(),
            login_focus: LoginField::Username,
            input: String::new(),
            status: None,
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// The input buffer the next typed character lands in.
    pub fn active_input_mut(&mut self) -> &mut String {
        match self.screen {
            Screen::Chat => &mut self.input,
            Screen::Login => match self.login_focus {
                LoginField::Username => &mut self.username_input,
                LoginField::Password => &mut self.password_input,
            },
        }
    }

    pub fn cycle_login_focus(&mut self) {
        self.login_focus = self.login_focus.next();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }
}
