use serde::Serialize;
use serde_json::Value;

use super::Listing;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{Genre, Page, Title};

/// Curated movie feeds served by `/movies/discover`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    NowPlaying,
    TopRated,
    Upcoming,
}

impl Category {
    pub const ALL: &[Category] = &[
        Self::Popular,
        Self::NowPlaying,
        Self::TopRated,
        Self::Upcoming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::NowPlaying => "now_playing",
            Self::TopRated => "top_rated",
            Self::Upcoming => "upcoming",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Read-only catalog: movies, TV shows, people, collections, search.
pub struct CatalogApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CatalogApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Full movie page payload, including the caller's watchlist/favorite state.
    pub async fn movie_detail(&self, tmdb_id: u64) -> Result<Value, ApiError> {
        self.client.get(&format!("/movies/{tmdb_id}/detail")).await
    }

    pub async fn movie(&self, movie_id: u64) -> Result<Value, ApiError> {
        self.client.get(&format!("/movies/{movie_id}")).await
    }

    /// A movie sub-resource such as `credits`, `videos` or `similar`.
    pub async fn movie_extra(&self, tmdb_id: u64, kind: &str) -> Result<Value, ApiError> {
        self.client.get(&format!("/movies/{tmdb_id}/{kind}")).await
    }

    pub async fn discover(&self, category: Category) -> Result<Page<Title>, ApiError> {
        self.client
            .send_json(ApiRequest::get("/movies/discover").query_pair("category", category.as_str()))
            .await
    }

    /// A named list such as `popular` or `trending`.
    pub async fn movie_list(&self, kind: &str) -> Result<Vec<Title>, ApiError> {
        let listing: Listing<Title> = self.client.get(&format!("/movies/lists/{kind}")).await?;
        Ok(listing.into_vec())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Title>, ApiError> {
        let listing: Listing<Title> = self
            .client
            .send_json(ApiRequest::get("/movies/search").query_pair("query", query.trim()))
            .await?;
        Ok(listing.into_vec())
    }

    /// Movies, shows and people in one result set. Entries are heterogeneous.
    pub async fn search_multi(&self, query: &str) -> Result<Vec<Value>, ApiError> {
        let listing: Listing<Value> = self
            .client
            .send_json(ApiRequest::get("/movies/search/multi/").query_pair("query", query.trim()))
            .await?;
        Ok(listing.into_vec())
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let listing: Listing<Genre> = self.client.get("/genres/").await?;
        Ok(listing.into_vec())
    }

    pub async fn tv_show(&self, tmdb_id: u64) -> Result<Value, ApiError> {
        self.client.get(&format!("/tv-shows/{tmdb_id}")).await
    }

    pub async fn collection(&self, collection_id: u64) -> Result<Value, ApiError> {
        self.client.get(&format!("/collections/{collection_id}")).await
    }

    pub async fn person(&self, person_id: u64) -> Result<Value, ApiError> {
        self.client.get(&format!("/persons/{person_id}")).await
    }

    pub async fn filmography(&self, person_id: u64) -> Result<Vec<Title>, ApiError> {
        let listing: Listing<Title> = self
            .client
            .get(&format!("/persons/{person_id}/filmography/"))
            .await?;
        Ok(listing.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Outcome, ScriptedTransport};

    #[test]
    fn test_category_parse() {
        assert_eq!("top_rated".parse::<Category>().unwrap(), Category::TopRated);
        assert!("nope".parse::<Category>().is_err());
    }

    #[tokio::test]
    async fn test_discover_sends_category() {
        let transport = ScriptedTransport::new(vec![Outcome::ok(
            r#"{"results": [{"tmdb_id": 603, "title": "The Matrix"}], "page": 1, "total_pages": 4}"#,
        )]);
        let client = ApiClient::builder().transport(transport.clone()).build().unwrap();

        let page = client.catalog().discover(Category::NowPlaying).await.unwrap();
        assert_eq!(page.results[0].display_title(), "The Matrix");
        assert!(page.has_next());

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/movies/discover");
        assert_eq!(sent.query, [("category".to_string(), "now_playing".to_string())]);
    }

    #[tokio::test]
    async fn test_search_trims_query() {
        let transport = ScriptedTransport::new(vec![Outcome::ok(r#"{"results": []}"#)]);
        let client = ApiClient::builder().transport(transport.clone()).build().unwrap();

        let results = client.catalog().search("  alien ").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(transport.requests()[0].query[0].1, "alien");
    }
}
