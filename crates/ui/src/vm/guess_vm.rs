use services::{FetchRequest, GuessSession, SessionError, SessionPhase};

pub const ERROR_MESSAGE: &str = "An error occurred while fetching the images. Try again later.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessIntent {
    Edit(String),
    Submit,
    Next,
}

/// Display-ready snapshot of a guess session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessVm {
    pub phase: SessionPhase,
    pub guess_text: String,
}

impl GuessVm {
    #[must_use]
    pub fn from_session(session: &GuessSession) -> Self {
        Self {
            phase: session.phase(),
            guess_text: session.guess_text().to_string(),
        }
    }

    /// View for a session that could not be started at all.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            phase: SessionPhase::Errored,
            guess_text: String::new(),
        }
    }

    /// The image is masked until the answer is revealed.
    #[must_use]
    pub fn hidden(&self) -> bool {
        self.phase != SessionPhase::Revealed
    }

    #[must_use]
    pub fn actual_label(name: &str) -> String {
        format!("Actual: {name}")
    }

    #[must_use]
    pub fn guess_label(&self) -> String {
        format!("Guess: {}", self.guess_text)
    }
}

/// Apply one user intent and return the fetches it caused.
///
/// # Errors
///
/// Returns `SessionError` when the intent does not fit the current phase or
/// the guess is empty.
pub fn apply_intent(
    session: &mut GuessSession,
    intent: GuessIntent,
) -> Result<Vec<FetchRequest>, SessionError> {
    match intent {
        GuessIntent::Edit(text) => {
            session.edit_guess(&text)?;
            Ok(Vec::new())
        }
        GuessIntent::Submit => {
            let guess = session.guess_text().to_string();
            session.submit_guess(&guess)?;
            Ok(Vec::new())
        }
        GuessIntent::Next => session.advance(),
    }
}
