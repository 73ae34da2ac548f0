//! GraphQL implementation of the episode query client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{EpisodesPage, QueryClient, QueryError};

pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/graphql";

const GET_EPISODES: &str = r#"
query getEpisodes($page: Int) {
  episodes(page: $page) {
    info {
      pages
      next
      prev
      count
    }
    results {
      id
      name
      air_date
      episode
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<EpisodesData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct EpisodesData {
    episodes: Option<EpisodesPage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

pub struct GraphqlClient {
    endpoint: String,
    client: reqwest::Client,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl QueryClient for GraphqlClient {
    async fn fetch_episodes(&self, page: u32) -> Result<EpisodesPage, QueryError> {
        tracing::debug!("Fetching episodes page {} from {}", page, self.endpoint);

        let body = json!({
            "query": GET_EPISODES,
            "variables": { "page": page },
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

/// Decode a GraphQL response body into a page of episodes
fn parse_response(body: &str) -> Result<EpisodesPage, QueryError> {
    let response: GraphqlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        return Err(QueryError::Graphql(messages.join("; ")));
    }

    response
        .data
        .and_then(|data| data.episodes)
        .ok_or(QueryError::MissingData)
}
