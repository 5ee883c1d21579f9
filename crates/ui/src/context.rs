use std::sync::Arc;

use beast_core::model::Roster;
use beast_core::render::Viewport;
use services::GuessLoopService;

pub trait UiApp: Send + Sync {
    fn roster(&self) -> Arc<Roster>;
    fn guess_loop(&self) -> Arc<GuessLoopService>;

    fn viewport(&self) -> Viewport {
        Viewport::default()
    }
}

#[derive(Clone)]
pub struct AppContext {
    roster: Arc<Roster>,
    guess_loop: Arc<GuessLoopService>,
    viewport: Viewport,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            roster: app.roster(),
            guess_loop: app.guess_loop(),
            viewport: app.viewport(),
        }
    }

    #[must_use]
    pub fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    #[must_use]
    pub fn guess_loop(&self) -> Arc<GuessLoopService> {
        Arc::clone(&self.guess_loop)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
