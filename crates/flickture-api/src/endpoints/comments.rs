use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Comment, CommentDraft, CommentQuery, LikeToggle, Page};

/// Reviews and replies attached to movies and TV shows.
pub struct CommentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn movie_comments(
        &self,
        movie_id: u64,
        query: &CommentQuery,
    ) -> Result<Page<Comment>, ApiError> {
        self.client
            .get_with_query(&format!("/movies/{movie_id}/comments/"), query)
            .await
    }

    pub async fn tv_comments(
        &self,
        tv_id: u64,
        query: &CommentQuery,
    ) -> Result<Page<Comment>, ApiError> {
        self.client
            .get_with_query(&format!("/tv-shows/{tv_id}/comments/"), query)
            .await
    }

    pub async fn post_movie_comment(
        &self,
        movie_id: u64,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        validate(draft)?;
        self.client
            .post(&format!("/movies/{movie_id}/comments/"), draft)
            .await
    }

    pub async fn post_tv_comment(
        &self,
        tv_id: u64,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        validate(draft)?;
        self.client
            .post(&format!("/tv-shows/{tv_id}/comments/"), draft)
            .await
    }

    pub async fn delete_comment(&self, movie_id: u64, comment_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/movies/{movie_id}/comments/{comment_id}/"))
            .await
    }

    pub async fn toggle_like(&self, movie_id: u64, comment_id: u64) -> Result<LikeToggle, ApiError> {
        self.client
            .post_empty(&format!("/movies/{movie_id}/comments/{comment_id}/like/"))
            .await
    }

    /// Replies to one comment.
    pub async fn replies(&self, movie_id: u64, comment_id: u64) -> Result<Value, ApiError> {
        self.client
            .get(&format!("/movies/{movie_id}/comments/{comment_id}/replies/"))
            .await
    }
}

/// Ratings run 1..=5; replies may omit one (0).
fn validate(draft: &CommentDraft) -> Result<(), ApiError> {
    if draft.content.trim().is_empty() {
        return Err(ApiError::Invalid("comment text is empty".into()));
    }
    if draft.rating > 5 || (draft.parent.is_none() && draft.rating == 0) {
        return Err(ApiError::Invalid(format!(
            "rating must be between 1 and 5, got {}",
            draft.rating
        )));
    }
    Ok(())
}
