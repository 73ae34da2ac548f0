//! Episode data and the query client that fetches it

pub mod graphql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use graphql::GraphqlClient;

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub air_date: String,
    #[serde(default)]
    pub episode: String,  // Season/episode code, e.g. "S01E01"
}

/// One page of episodes as returned by the query service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodesPage {
    pub info: PageInfo,
    pub results: Vec<Episode>,
}

/// Why a query failed. The UI treats every variant the same way.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("query error: {0}")]
    Graphql(String),

    #[error("response contained no episodes")]
    MissingData,
}

/// Something that can fetch a page of episodes
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn fetch_episodes(&self, page: u32) -> Result<EpisodesPage, QueryError>;
}
