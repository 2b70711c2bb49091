use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{FollowToggle, PersonFollow, User};

/// Profiles and follow relationships, for users and for cast/crew.
pub struct SocialApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SocialApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self, username: &str) -> Result<User, ApiError> {
        self.client.get(&format!("/auth/user/{username}/")).await
    }

    /// Follow the user, or unfollow if already following.
    pub async fn toggle_follow_user(&self, username: &str) -> Result<FollowToggle, ApiError> {
        self.client
            .post_empty(&format!("/auth/user/{username}/follow/"))
            .await
    }

    pub async fn person_follow(&self, person_id: u64) -> Result<PersonFollow, ApiError> {
        self.client.get(&format!("/persons/{person_id}/follow/")).await
    }

    pub async fn follow_person(&self, person_id: u64) -> Result<PersonFollow, ApiError> {
        self.client
            .post_empty(&format!("/persons/{person_id}/follow/"))
            .await
    }

    pub async fn unfollow_person(&self, person_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/persons/{person_id}/follow/")).await
    }
}
