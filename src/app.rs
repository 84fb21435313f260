use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::config::Config;
use crate::format::{format_answer, parse_markup};
use crate::phonebook::{HealthResponse, PhonebookClient};
use crate::texts::Language;
use crate::tui::AppEvent;

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    /// Transcript markup, not raw text; see `format::parse_markup`.
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// Last known state of the RAG backend, shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Healthy,
    Degraded,
    Unreachable,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub language: Language,

    // Chat transcript
    pub messages: Vec<ChatMessage>,

    // Input line
    pub input: String,
    pub cursor: usize, // char position in input

    // In-flight query state; also gates editing and resubmission
    pub loading: bool,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Transcript viewport (height/width updated during render)
    pub transcript_scroll: u16,
    pub transcript_height: u16,
    pub transcript_width: u16,

    pub backend_status: BackendStatus,

    pub client: PhonebookClient,
    pub events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            language: Language::default(),
            messages: Vec::new(),
            input: String::new(),
            cursor: 0,
            loading: false,
            animation_frame: 0,
            transcript_scroll: 0,
            transcript_height: 0,
            transcript_width: 0,
            backend_status: BackendStatus::default(),
            client: PhonebookClient::new(config.base_url()),
            events,
        }
    }

    /// Switch the UI language. Unknown codes are ignored; the transcript is
    /// never touched, so existing messages keep the language they arrived in.
    pub fn set_language(&mut self, code: &str) {
        if let Some(language) = Language::from_code(code) {
            self.language = language;
        }
    }

    /// Start a query submission: record the user message, clear the input
    /// and flip into loading. Returns the trimmed query for the caller to
    /// dispatch, or `None` when there is nothing to send (blank input, or a
    /// query already in flight).
    pub fn begin_submission(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }

        let query = self.input.trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: query.clone(),
        });
        self.input.clear();
        self.cursor = 0;
        self.loading = true;
        self.animation_frame = 0;
        self.scroll_to_bottom();

        Some(query)
    }

    /// Record the outcome of the in-flight query. On failure the transcript
    /// gets the generic error text in whatever language is active now.
    /// Loading is cleared on every path.
    pub fn finish_query(&mut self, result: anyhow::Result<String>) {
        let content = match result {
            Ok(answer) => format_answer(&answer),
            Err(err) => {
                warn!(error = %err, "query failed");
                self.language.texts().error_message.to_string()
            }
        };
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content,
        });

        self.loading = false;
        self.scroll_to_bottom();
    }

    pub fn apply_health(&mut self, result: anyhow::Result<HealthResponse>) {
        self.backend_status = match result {
            Ok(health) if health.status == "healthy" => BackendStatus::Healthy,
            Ok(_) => BackendStatus::Degraded,
            Err(err) => {
                warn!(error = %err, "health check failed");
                BackendStatus::Unreachable
            }
        };
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling
    pub fn scroll_down(&mut self) {
        let max_scroll = self
            .transcript_line_count()
            .saturating_sub(self.transcript_height);
        if self.transcript_scroll < max_scroll {
            self.transcript_scroll = self.transcript_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.transcript_height / 2;
        let max_scroll = self
            .transcript_line_count()
            .saturating_sub(self.transcript_height);
        self.transcript_scroll = (self.transcript_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.transcript_height / 2;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(half_page);
    }

    /// Scroll so the newest message (or the sending indicator) is visible.
    pub fn scroll_to_bottom(&mut self) {
        let total_lines = self.transcript_line_count();

        let visible_height = if self.transcript_height > 0 {
            self.transcript_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.transcript_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    /// Estimate rendered transcript height, mirroring the wrap the renderer
    /// applies. Counts characters, not bytes, so accented text wraps the same.
    pub fn transcript_line_count(&self) -> u16 {
        let wrap_width = if self.transcript_width > 0 {
            self.transcript_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // Role line ("You:" / "AI:")
            for line in parse_markup(&msg.content) {
                let char_count: usize = line.iter().map(|s| s.text.chars().count()).sum();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.loading {
            total_lines += 2; // Role line + sending indicator
        }

        total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tokio::sync::mpsc;

    fn make_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(&Config::default(), tx)
    }

    #[test]
    fn test_begin_submission_records_trimmed_query() {
        let mut app = make_app();
        app.input = "  Ki a rektor?  ".to_string();
        app.cursor = 5;

        let query = app.begin_submission();

        assert_eq!(query.as_deref(), Some("Ki a rektor?"));
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, ChatRole::User);
        assert_eq!(app.messages[0].content, "Ki a rektor?");
        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
        assert!(app.loading);
    }

    #[test]
    fn test_begin_submission_blank_input_is_a_noop() {
        let mut app = make_app();
        app.input = "   ".to_string();

        assert_eq!(app.begin_submission(), None);
        assert!(app.messages.is_empty());
        assert!(!app.loading);
        // The input is left alone, not cleared
        assert_eq!(app.input, "   ");
    }

    #[test]
    fn test_begin_submission_blocked_while_loading() {
        let mut app = make_app();
        app.input = "első".to_string();
        assert!(app.begin_submission().is_some());

        app.input = "második".to_string();
        assert_eq!(app.begin_submission(), None);
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.input, "második");
    }

    #[test]
    fn test_finish_query_success_appends_formatted_answer() {
        let mut app = make_app();
        app.input = "telefonszám?".to_string();
        app.begin_submission();

        app.finish_query(Ok("Hívd: 06-1-666-5000".to_string()));

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[1].role, ChatRole::Assistant);
        assert!(app.messages[1]
            .content
            .contains("<a href=\"tel:0616665000\">06-1-666-5000</a>"));
        assert!(!app.loading);
    }

    #[test]
    fn test_finish_query_failure_uses_language_at_completion() {
        let mut app = make_app();
        app.input = "kérdés".to_string();
        app.begin_submission();

        // Language switched while the request was in flight
        app.set_language("en");
        app.finish_query(Err(anyhow!("connection refused")));

        assert_eq!(app.messages.len(), 2);
        assert_eq!(
            app.messages[1].content,
            Language::En.texts().error_message
        );
        assert!(!app.loading);
    }

    #[test]
    fn test_set_language_ignores_unknown_codes() {
        let mut app = make_app();
        assert_eq!(app.language, Language::Hu);

        app.set_language("de");
        assert_eq!(app.language, Language::Hu);

        app.set_language("en");
        assert_eq!(app.language, Language::En);

        app.set_language("");
        assert_eq!(app.language, Language::En);
    }

    #[test]
    fn test_apply_health_maps_status() {
        let mut app = make_app();
        assert_eq!(app.backend_status, BackendStatus::Unknown);

        app.apply_health(Ok(HealthResponse {
            status: "healthy".to_string(),
            qdrant_connected: true,
            collection_exists: true,
        }));
        assert_eq!(app.backend_status, BackendStatus::Healthy);

        app.apply_health(Ok(HealthResponse {
            status: "degraded".to_string(),
            qdrant_connected: true,
            collection_exists: false,
        }));
        assert_eq!(app.backend_status, BackendStatus::Degraded);

        app.apply_health(Err(anyhow!("connect error")));
        assert_eq!(app.backend_status, BackendStatus::Unreachable);
    }

    #[test]
    fn test_tick_animation_only_advances_while_loading() {
        let mut app = make_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.input = "q".to_string();
        app.begin_submission();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 2);
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
    }

    #[test]
    fn test_scroll_down_clamps_to_content() {
        let mut app = make_app();
        app.transcript_height = 5;
        app.transcript_width = 50;
        app.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: "egy<br>kettő<br>három<br>négy<br>öt<br>hat".to_string(),
        });

        // 1 role line + 6 content lines + 1 blank = 8; max scroll = 3
        for _ in 0..10 {
            app.scroll_down();
        }
        assert_eq!(app.transcript_scroll, 3);

        app.scroll_up();
        assert_eq!(app.transcript_scroll, 2);
        for _ in 0..10 {
            app.scroll_up();
        }
        assert_eq!(app.transcript_scroll, 0);
    }

    #[test]
    fn test_scroll_to_bottom_tracks_new_messages() {
        let mut app = make_app();
        app.transcript_height = 4;
        app.transcript_width = 50;

        for _ in 0..3 {
            app.messages.push(ChatMessage {
                role: ChatRole::User,
                content: "rövid".to_string(),
            });
        }

        app.scroll_to_bottom();
        // 3 messages x (role + content + blank) = 9 lines; 9 - 4 = 5
        assert_eq!(app.transcript_scroll, 5);
    }
}
