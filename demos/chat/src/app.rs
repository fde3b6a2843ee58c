use chainpad::{
    FeatureMode,
    chat::{ChatMessage, ChatSession, HttpChatApi, Pending},
};
use ratatui::widgets::ScrollbarState;
use tracing::debug;

pub struct App {
    pub session: ChatSession<HttpChatApi>,
    pub server: String,

    // Input state
    pub input: String,
    /// Line submitted with Enter. The session log already ends with the
    /// thinking placeholder; the reply is fetched on the next loop turn,
    /// after that placeholder has been drawn.
    pub pending: Option<Pending>,

    pub scroll_state: ScrollbarState,
    pub scroll_position: usize,

    pub status_message: Option<String>,

    pub should_quit: bool,
}

impl App {
    pub fn new(api: HttpChatApi, mode: FeatureMode) -> Self {
        let server = api.base_url().to_string();
        let mut session = ChatSession::new(api);
        session.set_mode(mode);
        let mut app = Self {
            session,
            server,
            input: String::new(),
            pending: None,
            scroll_state: ScrollbarState::default(),
            scroll_position: 0,
            status_message: None,
            should_quit: false,
        };
        app.update_scroll();
        app
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.log().messages()
    }

    pub fn mode(&self) -> FeatureMode {
        self.session.mode()
    }

    /// Submits the current input; the log shows the thinking placeholder
    /// until [`send_pending`](Self::send_pending) completes it.
    pub fn queue_input(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.pending = self.session.begin(&line);
        self.update_scroll();
    }

    /// Fetches the reply for the queued line, if any.
    pub async fn send_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!(dispatch = ?pending.dispatch(), mode = ?self.mode(), "Resolving chat line");
        let reply = pending.resolve(self.session.api()).await;
        self.session.complete(reply);
        self.update_scroll();
    }

    pub fn toggle_mode(&mut self) {
        let mode = self.mode().toggled();
        self.session.set_mode(mode);
        self.input.clear();
        self.status_message = Some(format!("Switched to {mode}"));
        self.update_scroll();
    }

    pub fn update_scroll(&mut self) {
        let count = self.messages().len();
        self.scroll_state = self.scroll_state.content_length(count);
        if count > 0 {
            self.scroll_position = count.saturating_sub(1);
            self.scroll_state = self.scroll_state.position(self.scroll_position);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_position = self.scroll_position.saturating_sub(1);
        self.scroll_state = self.scroll_state.position(self.scroll_position);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_position < self.messages().len().saturating_sub(1) {
            self.scroll_position = self.scroll_position.saturating_add(1);
            self.scroll_state = self.scroll_state.position(self.scroll_position);
        }
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }
}
