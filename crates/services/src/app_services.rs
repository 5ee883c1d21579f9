use std::sync::Arc;

use reqwest::Client;

use beast_core::model::Roster;

use crate::asset_proxy::AssetProxy;
use crate::asset_source::AssetSource;
use crate::config::WikiConfig;
use crate::error::{AppServicesError, ProxyError};
use crate::roster_loader::RosterLoader;
use crate::sessions::GuessLoopService;

const USER_AGENT: &str = concat!("beast-guesser/", env!("CARGO_PKG_VERSION"));

/// Assembles app-facing services around a roster loaded once per launch.
#[derive(Clone)]
pub struct AppServices {
    roster: Arc<Roster>,
    guess_loop: Arc<GuessLoopService>,
}

impl AppServices {
    /// Scrape the roster from the wiki and wire the proxy into the guess loop.
    ///
    /// Both share one http client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the http client cannot be built or the
    /// roster cannot be loaded.
    pub async fn from_wiki(config: WikiConfig) -> Result<Self, AppServicesError> {
        let client = build_client()?;
        let roster = RosterLoader::with_client(client.clone(), config.clone())
            .load()
            .await?;
        let source: Arc<dyn AssetSource> = Arc::new(AssetProxy::with_client(client, config));
        Ok(Self {
            roster: Arc::new(roster),
            guess_loop: Arc::new(GuessLoopService::new(source)),
        })
    }

    #[must_use]
    pub fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    #[must_use]
    pub fn guess_loop(&self) -> Arc<GuessLoopService> {
        Arc::clone(&self.guess_loop)
    }
}

fn build_client() -> Result<Client, ProxyError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}
