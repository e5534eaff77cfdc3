use crate::app_config::AppConfig;
use reqwest::Client;
use reqwest::redirect::Policy;
use thiserror::Error;

/// Creates the HTTP client used to resolve short links.
///
/// Redirects are not followed automatically, every hop is inspected by the short link resolver.
pub fn new_client(config: &AppConfig) -> Result<Client, ClientError> {
    let client = Client::builder()
        .redirect(Policy::none())
        .timeout(config.resolver().request_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
}
