use std::env;

use url::Url;

pub const DEFAULT_WIKI_URL: &str = "https://wiki.cassettebeasts.com";
pub const DEFAULT_SPECIES_PAGE: &str = "Species";

/// Where the roster and the creature images come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiConfig {
    pub base_url: Url,
    pub species_page: String,
}

impl WikiConfig {
    /// # Errors
    ///
    /// Returns `url::ParseError` when `base_url` is not an absolute url.
    pub fn new(base_url: &str, species_page: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            species_page: species_page.into(),
        })
    }

    /// Reads `BEAST_WIKI_URL` and `BEAST_SPECIES_PAGE`, falling back to the
    /// public Cassette Beasts wiki.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when `BEAST_WIKI_URL` is set but malformed.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let base_url = env::var("BEAST_WIKI_URL").unwrap_or_else(|_| DEFAULT_WIKI_URL.into());
        let species_page =
            env::var("BEAST_SPECIES_PAGE").unwrap_or_else(|_| DEFAULT_SPECIES_PAGE.into());
        Self::new(&base_url, species_page)
    }

    /// Base url without a trailing slash, ready for `base + "/path"` joins.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `api.php` parse request for the species page.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined url is invalid.
    pub fn species_api_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/api.php", self.base()))?;
        url.query_pairs_mut()
            .append_pair("action", "parse")
            .append_pair("page", &self.species_page)
            .append_pair("format", "json");
        Ok(url)
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_WIKI_URL).expect("default wiki url is valid"),
            species_page: DEFAULT_SPECIES_PAGE.into(),
        }
    }
}
