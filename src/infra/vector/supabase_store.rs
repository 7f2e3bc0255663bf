// =============================================================================
// SUPABASE VECTOR STORE
// =============================================================================
//
// Talks to Supabase through its PostgREST API:
// - inserts go to `POST /rest/v1/{table}`
// - similarity search calls the SQL function `POST /rest/v1/rpc/{function}`,
//   which takes `query_embedding`, `match_threshold` and `match_count` and
//   returns rows of `{ content, metadata, similarity }` ordered by similarity.
//
// The table and function are provisioned by hand (pgvector extension, a
// `vector(768)` column). This client never creates or migrates them.

use crate::core::rag::models::{KnowledgeRecord, MatchResult};
use crate::core::rag::providers::{VectorStore, VectorStoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

pub const DEFAULT_TABLE: &str = "turf_knowledge";
pub const DEFAULT_MATCH_FUNCTION: &str = "match_turf_knowledge";

#[derive(Debug, Serialize)]
struct MatchParams<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

pub struct SupabaseVectorStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
    match_function: String,
}

impl SupabaseVectorStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table: DEFAULT_TABLE.to_string(),
            match_function: DEFAULT_MATCH_FUNCTION.to_string(),
        }
    }

    /// Overrides the table and search function names.
    pub fn with_names(mut self, table: String, match_function: String) -> Self {
        self.table = table;
        self.match_function = match_function;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, self.match_function)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl VectorStore for SupabaseVectorStore {
    async fn insert(&self, record: &KnowledgeRecord) -> Result<(), VectorStoreError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| VectorStoreError::Write(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Write(format!("{} - {}", status, text)));
        }

        Ok(())
    }

    async fn match_records(
        &self,
        query_embedding: &[f32],
        match_threshold: f32,
        match_count: usize,
    ) -> Result<Vec<MatchResult>, VectorStoreError> {
        let params = MatchParams {
            query_embedding,
            match_threshold,
            match_count,
        };

        let response = self
            .authorized(self.client.post(self.rpc_url()))
            .json(&params)
            .send()
            .await
            .map_err(|e| VectorStoreError::Query(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Query(format!("{} - {}", status, text)));
        }

        // PostgREST returns `null` for a set-returning function with no rows
        // on some versions, so accept that as "no matches".
        let matches: Option<Vec<MatchResult>> = response
            .json()
            .await
            .map_err(|e| VectorStoreError::Query(e.to_string()))?;

        Ok(matches.unwrap_or_default())
    }
}
