use std::sync::Arc;

use tracing::debug;

use beast_core::model::Roster;
use beast_core::render::SourceImage;

use crate::asset_source::AssetSource;
use crate::chooser::{IndexChooser, RandomChooser};
use crate::error::{FetchError, SessionError};
use super::machine::{Completion, FetchRequest, GuessSession};

/// Orchestrates guess sessions against an asset source.
#[derive(Clone)]
pub struct GuessLoopService {
    source: Arc<dyn AssetSource>,
    chooser: Arc<dyn IndexChooser>,
}

impl GuessLoopService {
    #[must_use]
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            chooser: Arc::new(RandomChooser),
        }
    }

    #[must_use]
    pub fn with_chooser(mut self, chooser: Arc<dyn IndexChooser>) -> Self {
        self.chooser = chooser;
        self
    }

    /// Create a session over `roster` without initializing it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyRoster` if the roster has no entries.
    pub fn new_session(&self, roster: Arc<Roster>) -> Result<GuessSession, SessionError> {
        GuessSession::new(roster, Arc::clone(&self.chooser))
    }

    /// Create and initialize a session over `roster`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyRoster` if the roster has no entries.
    pub fn start_session(
        &self,
        roster: Arc<Roster>,
    ) -> Result<(GuessSession, Vec<FetchRequest>), SessionError> {
        let mut session = self.new_session(roster)?;
        let requests = session.initialize();
        Ok((session, requests))
    }

    /// Fetch and decode the image behind one request.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the proxy fails or the payload does not decode.
    pub async fn resolve(&self, request: &FetchRequest) -> Result<SourceImage, FetchError> {
        debug!(slot = ?request.slot(), route = %request.route, "resolving image");
        let bytes = self.source.fetch(&request.route).await?;
        Ok(SourceImage::decode(&bytes)?)
    }

    /// Resolve each request in order and commit it to `session`.
    pub async fn settle(
        &self,
        session: &mut GuessSession,
        requests: Vec<FetchRequest>,
    ) -> Vec<Completion> {
        let mut completions = Vec::with_capacity(requests.len());
        for request in requests {
            let outcome = self.resolve(&request).await;
            completions.push(session.complete(request.ticket, outcome));
        }
        completions
    }
}
