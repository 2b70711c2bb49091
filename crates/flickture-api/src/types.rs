//! Wire types for the Flickture API.
//!
//! The server owns these shapes; fields the client doesn't display are left
//! out and unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A DRF-style paginated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        match (self.next.as_ref(), self.page, self.total_pages) {
            (Some(_), _, _) => true,
            (None, Some(page), Some(total)) => page < total,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde(default)]
    pub is_following: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    Watchlist,
    Watched,
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Watchlist => write!(f, "watchlist"),
            Self::Watched => write!(f, "watched"),
        }
    }
}

/// A movie or TV show as it appears in lists, search results and watchlists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    #[serde(default)]
    pub id: Option<u64>,
    pub tmdb_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// TV shows carry `name` instead of `title`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default, alias = "type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub watchlist_status: Option<WatchStatus>,
}

impl Title {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("(untitled)")
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub movie: Title,
    pub status: WatchStatus,
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistAdd {
    pub tmdb_id: u64,
    pub status: WatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteAdd {
    pub tmdb_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub creator_id: Option<u64>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub movies_count: Option<u64>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub movies: Vec<Title>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListDraft {
    pub name: String,
    pub description: String,
    /// TMDB ids of the titles in the list.
    pub movie_ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTitleRef {
    pub tmdb_id: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
    #[serde(default)]
    pub likes_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowState {
    Followed,
    Unfollowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FollowToggle {
    pub status: FollowState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PersonFollow {
    pub is_following: bool,
    #[serde(default)]
    pub followers_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentDraft {
    pub content: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    /// Server-side id of the movie being commented on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tv_show: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentQuery {
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}
