use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{CatalogSource, FetchFuture};
use crate::model::{CatalogPage, DetailResponse, EntryDetail, ListResponse, PageCursor};
use crate::{Config, FetchError};

const USER_AGENT: &str = concat!("pokedex-explorer/", env!("CARGO_PKG_VERSION"));

/// [`CatalogSource`] backed by the public PokeAPI (or any server speaking
/// the same list/detail JSON).
pub struct PokeApi {
    client: reqwest::Client,
    config: Config,
}

impl PokeApi {
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Use an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: reqwest::Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET `url` and decode the JSON body. 404 maps to [`FetchError::NotFound`]
    /// with `what` as the subject.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, FetchError> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "non-success response");
            return Err(FetchError::Response {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl CatalogSource for PokeApi {
    fn name(&self) -> &str {
        "PokeAPI"
    }

    fn fetch_page<'a>(&'a self, cursor: &'a PageCursor) -> FetchFuture<'a, CatalogPage> {
        Box::pin(async move {
            let url = match cursor {
                PageCursor::First => self.config.first_page_url(),
                PageCursor::Url(url) => url.clone(),
            };
            let list: ListResponse = self.get_json(&url, &url).await?;
            Ok(list.into_page(&self.config.artwork_template))
        })
    }

    fn fetch_detail<'a>(&'a self, name: &'a str) -> FetchFuture<'a, EntryDetail> {
        Box::pin(async move {
            let name = name.trim();
            if name.is_empty() {
                return Err(FetchError::NotFound("<unresolved>".to_string()));
            }
            let url = self.config.detail_url_for(name);
            let detail: DetailResponse = self.get_json(&url, name).await?;
            Ok(detail.into())
        })
    }
}
