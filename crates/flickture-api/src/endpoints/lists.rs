use serde_json::Value;

use super::Listing;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{LikeToggle, ListDraft, ListTitleRef, MediaType, UserList};

/// User-curated lists and the community feeds built on them.
pub struct ListsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ListsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn collection(&self, path: &str) -> Result<Vec<UserList>, ApiError> {
        let listing: Listing<UserList> = self.client.get(path).await?;
        Ok(listing.into_vec())
    }

    pub async fn mine(&self) -> Result<Vec<UserList>, ApiError> {
        self.collection("/lists/my_lists").await
    }

    pub async fn featured(&self) -> Result<Vec<UserList>, ApiError> {
        self.collection("/lists/featured").await
    }

    pub async fn community(&self) -> Result<Vec<UserList>, ApiError> {
        self.collection("/lists/community").await
    }

    pub async fn liked(&self) -> Result<Vec<UserList>, ApiError> {
        self.collection("/lists/liked").await
    }

    pub async fn get(&self, list_id: u64) -> Result<UserList, ApiError> {
        self.client.get(&format!("/lists/{list_id}")).await
    }

    pub async fn create(&self, draft: &ListDraft) -> Result<UserList, ApiError> {
        let list: UserList = self.client.post("/lists/", draft).await?;
        tracing::info!(list_id = list.id, name = %list.name, "List created");
        Ok(list)
    }

    pub async fn update(&self, list_id: u64, draft: &ListDraft) -> Result<UserList, ApiError> {
        self.client.patch(&format!("/lists/{list_id}/"), draft).await
    }

    pub async fn delete(&self, list_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/lists/{list_id}/")).await
    }

    pub async fn add_title(
        &self,
        list_id: u64,
        tmdb_id: u64,
        media_type: Option<MediaType>,
    ) -> Result<Value, ApiError> {
        self.client
            .post(
                &format!("/lists/{list_id}/add_movie/"),
                &ListTitleRef { tmdb_id, media_type },
            )
            .await
    }

    pub async fn remove_title(
        &self,
        list_id: u64,
        tmdb_id: u64,
        media_type: Option<MediaType>,
    ) -> Result<Value, ApiError> {
        self.client
            .post(
                &format!("/lists/{list_id}/remove_movie/"),
                &ListTitleRef { tmdb_id, media_type },
            )
            .await
    }

    pub async fn toggle_like(&self, list_id: u64) -> Result<LikeToggle, ApiError> {
        self.client.post_empty(&format!("/lists/{list_id}/like/")).await
    }
}
