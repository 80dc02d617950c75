use parley_core::{ChatError, ConversationState, Reply, TurnController};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

/// Text the input box starts with
pub const DEFAULT_PROMPT: &str = "Hello bot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// A turn whose remote half is still running
pub struct PendingTurn {
    pub user_text: String,
    pub task: JoinHandle<Result<Reply, ChatError>>,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input box
    pub input: String,
    pub cursor: usize,

    // Session
    pub conversation: ConversationState,
    pub turns: TurnController,
    pub pending: Option<PendingTurn>,
    pub last_error: Option<String>,

    // Transcript viewport, refreshed on every render
    pub chat_scroll: u16,
    pub chat_max_scroll: u16,
    pub chat_height: u16,
    pub follow_bottom: bool,
    pub chat_area: Option<Rect>,

    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(turns: TurnController) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: DEFAULT_PROMPT.to_string(),
            cursor: DEFAULT_PROMPT.chars().count(),

            conversation: ConversationState::new(),
            turns,
            pending: None,
            last_error: None,

            chat_scroll: 0,
            chat_max_scroll: 0,
            chat_height: 0,
            follow_bottom: true,
            chat_area: None,

            animation_frame: 0,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a turn with the current input. Ignored while another turn is in
    /// flight or when the input is blank.
    pub fn submit(&mut self) {
        if self.is_waiting() || self.input.trim().is_empty() {
            return;
        }

        let user_text = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.follow_bottom = true;

        let turns = self.turns.clone();
        let summary = self.conversation.summary().to_string();
        let prompt = user_text.clone();
        tracing::info!(turn = self.conversation.turn_count() + 1, "submitting turn");

        let task = tokio::spawn(async move { turns.respond(&summary, &prompt).await });
        self.pending = Some(PendingTurn { user_text, task });
    }

    /// Collect the pending turn if its task has finished.
    pub async fn poll_pending(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map(|p| p.task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(PendingTurn { user_text, task }) = self.pending.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(ChatError::RemoteCallFailed(format!("request task failed: {e}"))),
            };
            self.finish_turn(user_text, result);
        }
    }

    /// Commit a finished turn, or discard it and surface the error.
    pub fn finish_turn(&mut self, user_text: String, result: Result<Reply, ChatError>) {
        match result {
            Ok(reply) => {
                self.conversation.commit_turn(user_text, reply);
                self.last_error = None;
                tracing::info!(
                    turns = self.conversation.turn_count(),
                    tokens = self.conversation.token_count(),
                    "turn committed"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                self.last_error = Some(e.to_string());
                // Give the draft back unless the user already typed something new
                if self.input.is_empty() {
                    self.cursor = user_text.chars().count();
                    self.input = user_text;
                }
            }
        }
        self.follow_bottom = true;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.chat_max_scroll);
        if self.chat_scroll == self.chat_max_scroll {
            self.follow_bottom = true;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_bottom = false;
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
        self.follow_bottom = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.chat_max_scroll;
        self.follow_bottom = true;
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}
