use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{FavoriteAdd, MediaType};

pub struct FavoritesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FavoritesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn add(&self, tmdb_id: u64, media_type: Option<MediaType>) -> Result<Value, ApiError> {
        self.client
            .post("/favorites/", &FavoriteAdd { tmdb_id, media_type })
            .await
    }

    pub async fn remove(&self, tmdb_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/favorites/{tmdb_id}/")).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{Outcome, RecordingNotifier, ScriptedTransport};

    #[tokio::test]
    async fn test_add_and_remove() {
        let transport = ScriptedTransport::new(vec![Outcome::ok("{}")]);
        let client = ApiClient::builder().transport(transport.clone()).build().unwrap();

        client.favorites().add(13, None).await.unwrap();
        client.favorites().remove(13).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].body, Some(json!({"tmdb_id": 13})));
        assert_eq!(sent[1].path, "/favorites/13/");
    }

    #[tokio::test]
    async fn test_duplicate_favorite_surfaces_server_message() {
        let transport = ScriptedTransport::new(vec![Outcome::status(
            400,
            r#"{"message": "Already in favorites"}"#,
        )]);
        let notifier = RecordingNotifier::new();
        let client = ApiClient::builder()
            .transport(transport)
            .notifier(notifier.clone())
            .build()
            .unwrap();

        assert!(client.favorites().add(13, None).await.is_err());
        assert_eq!(notifier.messages(), ["Already in favorites"]);
    }
}
