use crate::errors::AppError;
use crate::models::{SetFavoriteRequest, SetFavoriteResponse};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Where favorite changes are persisted.
pub trait FavoriteEndpoint {
    fn set_favorite(
        &self,
        request: &SetFavoriteRequest,
    ) -> impl Future<Output = Result<SetFavoriteResponse, AppError>>;
}

/// `POST {root}/entry/set-favorite` with a form body, JSON answer.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    url: String,
}

impl HttpEndpoint {
    pub fn new(root_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: set_favorite_url(root_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FavoriteEndpoint for HttpEndpoint {
    async fn set_favorite(
        &self,
        request: &SetFavoriteRequest,
    ) -> Result<SetFavoriteResponse, AppError> {
        debug!(url = %self.url, entry_id = %request.entry_id, "sending favorite change");
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .form(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

pub fn set_favorite_url(root_url: &str) -> String {
    format!("{}/entry/set-favorite", root_url.trim_end_matches('/'))
}
