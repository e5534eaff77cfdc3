use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Follows the redirect chain starting at `url` and returns the first URL that answers with a
/// success status.
///
/// At most `max_redirects` hops are followed. A redirect without a `Location` header, a redirect
/// to the current URL, one hop too many, or any status outside 2xx/3xx fails the resolution.
#[instrument(skip(client))]
pub async fn resolve_redirects(client: &Client, url: &str, max_redirects: usize) -> Result<String, ResolveError> {
    let mut current = Url::parse(url).map_err(|e| ResolveError::InvalidUrl(url.to_string(), e.to_string()))?;
    let mut hops = 0;

    info!("🔗 Resolving short link...");
    loop {
        let response = client.get(current.clone()).send().await?;
        let status = response.status();

        if status.is_success() {
            info!(hops, resolved = %current, "🔗 Resolving short link... OK");
            return Ok(current.into());
        }

        if !status.is_redirection() {
            return Err(ResolveError::UnexpectedStatus(status));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .ok_or_else(|| ResolveError::MissingLocationHeader(current.to_string()))?
            .to_str()
            .map_err(|e| ResolveError::InvalidLocationHeader(e.to_string()))?;

        // Relative locations are resolved against the URL that issued the redirect
        let next = current.join(location).map_err(|e| ResolveError::InvalidLocationHeader(format!("'{}': {}", location, e)))?;
        if next == current {
            return Err(ResolveError::RedirectLoop(current.to_string()));
        }

        if hops == max_redirects {
            return Err(ResolveError::TooManyRedirects(max_redirects));
        }

        hops += 1;
        debug!(hop = hops, status = %status, "🔗 Redirected to {}", next);
        current = next;
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
    #[error("redirect from '{0}' has no Location header")]
    MissingLocationHeader(String),
    #[error("invalid Location header {0}")]
    InvalidLocationHeader(String),
    #[error("redirect loop at '{0}'")]
    RedirectLoop(String),
    #[error("more than {0} redirects")]
    TooManyRedirects(usize),
    #[error("unexpected response code: {0}")]
    UnexpectedStatus(StatusCode),
}
