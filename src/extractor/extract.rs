use crate::app_config::AppConfig;
use crate::domain::Coordinate;
use crate::extractor::csv::parse_csv;
use crate::extractor::map_url::parse_map_url;
use crate::extractor::patterns::{CSV, EMBEDDED};
use crate::extractor::short_url::{ResolveError, resolve_redirects};
use reqwest::Client;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Turns free-form text into a [`Coordinate`].
///
/// The input is classified in a fixed order, the first match wins:
/// 1. a full map URL, parsed for `@<lat>,<lon>,<alt>z`
/// 2. a `<lat>,<lon>[,<alt>]` pair anywhere in the text
/// 3. a short link, resolved over HTTP and parsed for `!3d<lat>!4d<lon>`
#[derive(Clone, Debug)]
pub struct Extractor {
    client: Client,
    map_url_prefix: String,
    short_link_prefixes: Vec<String>,
    max_redirects: usize,
}

impl Extractor {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Extractor {
            client,
            map_url_prefix: config.resolver().map_url_prefix().to_string(),
            short_link_prefixes: config.resolver().short_link_prefixes().to_vec(),
            max_redirects: config.resolver().max_redirects(),
        }
    }

    #[instrument(skip(self))]
    pub async fn extract(&self, input: &str) -> Result<Coordinate, ExtractError> {
        let input = input.trim();

        let result = if input.starts_with(&self.map_url_prefix) {
            debug!("📍 Extracting coordinate from map URL...");
            parse_map_url(input)
        } else if CSV.is_match(input) {
            debug!("📍 Extracting coordinate from comma separated values...");
            parse_csv(input)
        } else if self.is_short_link(input) {
            debug!("📍 Extracting coordinate from short link...");
            self.extract_from_short_link(input).await
        } else {
            Err(ExtractError::InvalidFormat(format!("'{}' is not a map URL, coordinate pair or short link", input)))
        };

        match &result {
            Ok(coordinate) => info!("📍 Extracted coordinate {}", coordinate),
            Err(e) => warn!("⚠️ Unable to extract a coordinate: {}", e),
        }
        result
    }

    /// Runs [`extract`](Self::extract) on its own task.
    pub fn spawn(&self, input: String) -> JoinHandle<Result<Coordinate, ExtractError>> {
        let extractor = self.clone();
        tokio::spawn(async move { extractor.extract(&input).await })
    }

    fn is_short_link(&self, input: &str) -> bool {
        self.short_link_prefixes.iter().any(|prefix| input.starts_with(prefix.as_str()))
    }

    async fn extract_from_short_link(&self, short_link: &str) -> Result<Coordinate, ExtractError> {
        let resolved = resolve_redirects(&self.client, short_link, self.max_redirects).await?;

        let captures = EMBEDDED
            .captures(&resolved)
            .ok_or_else(|| ExtractError::InvalidFormat(format!("no coordinates found in resolved URL '{}'", resolved)))?;

        // The embedded format carries no altitude
        Ok(Coordinate::new(&captures[1], &captures[2], None::<&str>))
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("failed to resolve short link: {0}")]
    ResolutionFailure(#[from] ResolveError),
}
