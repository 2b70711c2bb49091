//! Typed wrappers over [`ApiClient`] for the Flickture REST API.
//!
//! Each facade borrows the client, so every call still goes through the
//! shared pipeline.

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod favorites;
pub mod lists;
pub mod social;
pub mod watchlist;

use serde::Deserialize;

use crate::client::ApiClient;
use crate::types::Page;

pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use comments::CommentsApi;
pub use favorites::FavoritesApi;
pub use lists::ListsApi;
pub use social::SocialApi;
pub use watchlist::WatchlistApi;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn catalog(&self) -> CatalogApi<'_> {
        CatalogApi::new(self)
    }

    pub fn comments(&self) -> CommentsApi<'_> {
        CommentsApi::new(self)
    }

    pub fn favorites(&self) -> FavoritesApi<'_> {
        FavoritesApi::new(self)
    }

    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi::new(self)
    }

    pub fn social(&self) -> SocialApi<'_> {
        SocialApi::new(self)
    }

    pub fn watchlist(&self) -> WatchlistApi<'_> {
        WatchlistApi::new(self)
    }
}

/// Collection endpoints answer with either a bare array or a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.results,
            Self::Plain(items) => items,
        }
    }
}
