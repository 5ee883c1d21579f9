use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info};

use beast_core::model::{Roster, RosterEntry, RosterError};

use crate::config::WikiConfig;
use crate::error::RosterLoadError;

/// Cells per species table row.
const CELLS_PER_ROW: usize = 10;

static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("`td` is a valid selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("`img` is a valid selector"));

/// Scrapes the species table once and turns it into a `Roster`.
#[derive(Clone)]
pub struct RosterLoader {
    client: Client,
    config: WikiConfig,
}

impl RosterLoader {
    #[must_use]
    pub fn new(config: WikiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: WikiConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the species page through the MediaWiki parse API and scrape it.
    ///
    /// # Errors
    ///
    /// Returns `RosterLoadError` when the request fails, the payload has no
    /// rendered html, or no complete rows were found.
    pub async fn load(&self) -> Result<Roster, RosterLoadError> {
        let url = self.config.species_api_url()?;
        info!(%url, "loading species roster");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(RosterLoadError::HttpStatus(response.status()));
        }

        let body: ParseResponse = response.json().await?;
        let html = body.parse.ok_or(RosterLoadError::MissingText)?.text.html;
        let roster = parse_species_html(&html)?;
        info!(entries = roster.len(), "species roster loaded");
        Ok(roster)
    }
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    text: ParsedText,
}

#[derive(Debug, Deserialize)]
struct ParsedText {
    #[serde(rename = "*")]
    html: String,
}

#[derive(Debug, Default)]
struct RowCells {
    image: Option<String>,
    name: Option<String>,
}

/// Extract `(name, image path)` pairs from the rendered species table.
///
/// The first row is skipped. In every other row the first cell carries the
/// thumbnail and the second the name. Rows missing either are dropped so names
/// and images stay index-aligned.
///
/// # Errors
///
/// Returns `RosterError::Empty` when no complete row is found.
pub fn parse_species_html(html: &str) -> Result<Roster, RosterError> {
    let document = Html::parse_document(html);
    let mut rows: Vec<RowCells> = Vec::new();

    for (i, cell) in document.select(&CELL).enumerate() {
        if i < CELLS_PER_ROW {
            continue;
        }
        let row = i / CELLS_PER_ROW - 1;
        if rows.len() <= row {
            rows.resize_with(row + 1, RowCells::default);
        }
        match i % CELLS_PER_ROW {
            0 => {
                rows[row].image = cell
                    .select(&IMG)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .map(full_resolution_path);
            }
            1 => {
                let name = cell.text().collect::<String>();
                rows[row].name = Some(name.trim().to_string());
            }
            _ => {}
        }
    }

    let entries: Vec<RosterEntry> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row, cells)| match (cells.name, cells.image) {
            (Some(name), Some(image)) if !name.is_empty() => Some(RosterEntry::new(name, image)),
            _ => {
                debug!(row, "skipping incomplete species row");
                None
            }
        })
        .collect();

    Roster::new(entries)
}

/// Maps a thumbnail path to the original upload.
///
/// `/images/thumb/3/3c/Springheel.png/30px-Springheel.png` becomes
/// `/images/3/3c/Springheel.png`. Paths that are not thumbnails are returned as-is.
#[must_use]
pub fn full_resolution_path(src: &str) -> String {
    let parts: Vec<&str> = src.split('/').collect();
    if !parts.contains(&"thumb") {
        return src.to_string();
    }
    let kept: Vec<&str> = parts.into_iter().filter(|part| *part != "thumb").collect();
    match kept.split_last() {
        Some((_, rest)) => rest.join("/"),
        None => String::new(),
    }
}
