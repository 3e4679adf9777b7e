use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tagsync_model::CanonicalTag;
use url::Url;

use super::{TagPage, TagSource};
use crate::{error::Result, graphql::GraphQlClient};

const QUERY_TAGS: &str = r#"
query Tags($input: TagQueryInput!) {
  queryTags(input: $input) {
    count
    tags { id name aliases description }
  }
}"#;

#[derive(Deserialize)]
struct QueryTagsData {
    #[serde(rename = "queryTags")]
    query_tags: QueryTagsPage,
}

#[derive(Deserialize)]
struct QueryTagsPage {
    count: usize,
    #[serde(default)]
    tags: Vec<CanonicalTag>,
}

/// Canonical tag source backed by a stash-box GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct StashBoxClient {
    client: GraphQlClient,
}

impl StashBoxClient {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: GraphQlClient::new(endpoint, Some(api_key.into()))?,
        })
    }
}

fn page_variables(page: u32, per_page: u32) -> serde_json::Value {
    json!({
        "input": {
            "page": page,
            "per_page": per_page,
            "sort": "NAME",
            "direction": "DESC",
        }
    })
}

#[async_trait]
impl TagSource for StashBoxClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<TagPage> {
        let data: QueryTagsData = self
            .client
            .execute(QUERY_TAGS, &page_variables(page, per_page))
            .await?;
        Ok(TagPage {
            count: data.query_tags.count,
            tags: data.query_tags.tags,
        })
    }
}
