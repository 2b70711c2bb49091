use serde_json::{json, Value};

use super::Listing;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{MediaType, WatchStatus, WatchlistAdd, WatchlistEntry};

pub struct WatchlistApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WatchlistApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Add a title, or move it between `watchlist` and `watched`.
    pub async fn add(
        &self,
        tmdb_id: u64,
        status: WatchStatus,
        media_type: Option<MediaType>,
    ) -> Result<Value, ApiError> {
        let body = WatchlistAdd {
            tmdb_id,
            status,
            media_type,
        };
        let resp = self.client.post("/watchlist/", &body).await?;
        tracing::debug!(tmdb_id, %status, "Watchlist updated");
        Ok(resp)
    }

    pub async fn set_status(&self, tmdb_id: u64, status: WatchStatus) -> Result<Value, ApiError> {
        self.client
            .patch(&format!("/watchlist/{tmdb_id}/"), &json!({ "status": status }))
            .await
    }

    pub async fn remove(&self, tmdb_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/watchlist/{tmdb_id}/")).await
    }

    /// The signed-in user's entries, both statuses.
    pub async fn mine(&self) -> Result<Vec<WatchlistEntry>, ApiError> {
        let listing: Listing<WatchlistEntry> = self.client.get("/auth/me/watchlist/").await?;
        Ok(listing.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Outcome, ScriptedTransport};

    #[tokio::test]
    async fn test_add_posts_status() {
        let transport = ScriptedTransport::new(vec![Outcome::ok(r#"{"status": "watched"}"#)]);
        let client = ApiClient::builder().transport(transport.clone()).build().unwrap();

        client
            .watchlist()
            .add(550, WatchStatus::Watched, Some(MediaType::Movie))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, reqwest::Method::POST);
        assert_eq!(
            sent.body,
            Some(json!({"tmdb_id": 550, "status": "watched", "media_type": "movie"}))
        );
    }

    #[tokio::test]
    async fn test_mine_reads_plain_array() {
        let transport = ScriptedTransport::new(vec![Outcome::ok(
            r#"[{"movie": {"tmdb_id": 550, "title": "Fight Club"}, "status": "watchlist"}]"#,
        )]);
        let client = ApiClient::builder().transport(transport).build().unwrap();

        let entries = client.watchlist().mine().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, WatchStatus::Watchlist);
        assert_eq!(entries[0].movie.display_title(), "Fight Club");
    }

    #[tokio::test]
    async fn test_remove_uses_delete() {
        let transport = ScriptedTransport::new(vec![Outcome::status(204, "")]);
        let client = ApiClient::builder().transport(transport.clone()).build().unwrap();
        client.watchlist().remove(550).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, reqwest::Method::DELETE);
        assert_eq!(sent.path, "/watchlist/550/");
    }
}
