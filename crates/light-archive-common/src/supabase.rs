//! Supabase client for Light Archive
//!
//! Talks to the PostgREST endpoint for `archive_items` and to Supabase Storage
//! for uploaded images.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    Client, Response,
};
use tracing::{debug, instrument};

use crate::{
    config::SupabaseConfig,
    error::{Error, Result},
    storage::ObjectStore,
    store::{ArchiveListParams, ArchiveSearchParams, ArchiveStore},
    types::{ArchiveItem, ArchiveStatus, ArchiveUpdate, NewArchive, Pagination},
};

/// Supabase REST and Storage client
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    table: String,
    bucket: String,
}

impl SupabaseClient {
    /// Create a new Supabase client from configuration
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(Error::NotConfigured("Supabase"));
        }

        let key = config.anon_key.trim();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).map_err(|e| Error::Config(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| Error::Config(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn fetch_rows(&self, query: &[(&str, String)]) -> Result<Vec<ArchiveItem>> {
        let resp = self.client.get(self.table_url()).query(query).send().await?;
        decode_rows(&checked_body(resp).await?)
    }
}

/// Body of a successful response, or a store error carrying status and body
async fn checked_body(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::Store(format!("{status}: {body}")))
    }
}

/// Decode a PostgREST row array
pub(crate) fn decode_rows(body: &str) -> Result<Vec<ArchiveItem>> {
    serde_json::from_str(body)
        .map_err(|e| Error::InvalidInput(format!("malformed archive row: {e}")))
}

/// Quote a value for use inside a PostgREST logic tree
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `or` filter matching `text` anywhere in title, description or content
pub(crate) fn search_filter(text: &str) -> String {
    let pattern = quote(&format!("*{text}*"));
    format!("(title.ilike.{pattern},description.ilike.{pattern},content.ilike.{pattern})")
}

fn page_query(query: &mut Vec<(&'static str, String)>, pagination: Pagination) {
    query.push(("order", "created_at.desc".to_string()));
    query.push(("offset", pagination.offset.to_string()));
    query.push(("limit", pagination.limit.to_string()));
}

pub(crate) fn search_query(params: &ArchiveSearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("select", "*".to_string())];
    if let Some(category) = &params.category {
        query.push(("category", format!("eq.{category}")));
    }
    query.push(("status", format!("eq.{}", ArchiveStatus::Published)));
    query.push(("or", search_filter(&params.query)));
    page_query(&mut query, params.pagination);
    query
}

/// Candidate pool for ranking. Ordered so equal scores tie-break the same way
/// on every call.
pub(crate) fn pool_query(id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("status", format!("eq.{}", ArchiveStatus::Published)),
        ("id", format!("neq.{id}")),
        ("order", "created_at.desc,id.asc".to_string()),
    ]
}

pub(crate) fn list_query(params: &ArchiveListParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("select", "*".to_string())];
    if let Some(category) = &params.category {
        query.push(("category", format!("eq.{category}")));
    }
    if let Some(status) = &params.status {
        query.push(("status", format!("eq.{status}")));
    }
    page_query(&mut query, params.pagination);
    query
}

#[async_trait]
impl ArchiveStore for SupabaseClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool> {
        let resp = self
            .client
            .get(self.table_url())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<ArchiveItem>> {
        let rows = self
            .fetch_rows(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn search(&self, params: &ArchiveSearchParams) -> Result<Vec<ArchiveItem>> {
        let rows = self.fetch_rows(&search_query(params)).await?;
        debug!(count = rows.len(), "Search complete");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn list(&self, params: &ArchiveListParams) -> Result<Vec<ArchiveItem>> {
        self.fetch_rows(&list_query(params)).await
    }

    #[instrument(skip(self, archive), fields(id = %archive.id))]
    async fn insert(&self, archive: &NewArchive) -> Result<ArchiveItem> {
        let resp = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(archive)
            .send()
            .await?;

        decode_rows(&checked_body(resp).await?)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Store("Failed to create archive".to_string()))
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: &str, update: &ArchiveUpdate) -> Result<Option<ArchiveItem>> {
        let mut body = serde_json::to_value(update)?;
        body["updated_at"] = serde_json::to_value(Utc::now())?;

        let resp = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        Ok(decode_rows(&checked_body(resp).await?)?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn published_excluding(&self, id: &str) -> Result<Vec<ArchiveItem>> {
        self.fetch_rows(&pool_query(id)).await
    }
}

#[async_trait]
impl ObjectStore for SupabaseClient {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::Storage(format!("{status}: {body}")))
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
