//! Language selection and the static UI text tables.
//!
//! Every user-visible string outside the transcript comes from one of the
//! per-language tables below. The tables are fully static; switching language
//! only changes which table the renderer reads on the next frame.

/// Supported UI languages. The set is closed: anything that does not parse
/// via [`Language::from_code`] is silently rejected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Hungarian, the startup default.
    #[default]
    Hu,
    En,
}

impl Language {
    /// Parse a wire-format language code ("hu" / "en").
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hu" => Some(Language::Hu),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// The code sent to the backend in query requests.
    pub fn code(self) -> &'static str {
        match self {
            Language::Hu => "hu",
            Language::En => "en",
        }
    }

    /// Short label for the footer language toggle.
    pub fn label(self) -> &'static str {
        match self {
            Language::Hu => "HU",
            Language::En => "EN",
        }
    }

    pub fn texts(self) -> &'static TextTable {
        match self {
            Language::Hu => &HU,
            Language::En => &EN,
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::Hu, Language::En]
    }
}

/// One language's worth of UI strings.
pub struct TextTable {
    pub title: &'static str,
    pub welcome: &'static str,
    pub placeholder: &'static str,
    /// Stem of the loading line; the renderer animates the trailing dots.
    pub sending: &'static str,
    pub error_message: &'static str,
    pub assistant_label: &'static str,
    pub user_label: &'static str,
    pub status_healthy: &'static str,
    pub status_degraded: &'static str,
    pub status_unreachable: &'static str,
    pub hint_send: &'static str,
    pub hint_language: &'static str,
    pub hint_scroll: &'static str,
    pub hint_quit: &'static str,
}

impl TextTable {
    /// Symbolic-key lookup kept from the page markup's `data-translate`
    /// convention. The key set is closed; unknown keys yield `None`.
    #[allow(dead_code)]
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        match key {
            "page-title" => Some(self.title),
            "welcome" => Some(self.welcome),
            "placeholder" => Some(self.placeholder),
            "sending" => Some(self.sending),
            "error-message" => Some(self.error_message),
            "ai-assistant" => Some(self.assistant_label),
            _ => None,
        }
    }
}

static HU: TextTable = TextTable {
    title: "Telefonkönyv",
    welcome: "Üdvözöllek! Kérdezz bármit az Óbudai Egyetem telefonkönyvéből. \
              Például: \"Ki a mérnöki intézet dékánja?\" vagy \"Melyik a Györök György telefonszáma?\"",
    placeholder: "Kérdezz valamit...",
    sending: "Küldés",
    error_message: "Hiba történt a kérés feldolgozása során. Kérlek, próbáld újra.",
    assistant_label: "AI Asszisztens",
    user_label: "Te",
    status_healthy: "elérhető",
    status_degraded: "korlátozott",
    status_unreachable: "nem elérhető",
    hint_send: "küldés",
    hint_language: "nyelv",
    hint_scroll: "görgetés",
    hint_quit: "kilépés",
};

static EN: TextTable = TextTable {
    title: "Phonebook",
    welcome: "Welcome! Ask anything about Óbuda University's phonebook. \
              For example: \"Who is the dean of the engineering institute?\" or \"What is Györök György's phone number?\"",
    placeholder: "Ask something...",
    sending: "Sending",
    error_message: "An error occurred while processing your request. Please try again.",
    assistant_label: "AI Assistant",
    user_label: "You",
    status_healthy: "online",
    status_degraded: "degraded",
    status_unreachable: "unreachable",
    hint_send: "send",
    hint_language: "language",
    hint_scroll: "scroll",
    hint_quit: "quit",
};
