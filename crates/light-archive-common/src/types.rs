//! Core types for Light Archive
//!
//! These types match the `archive_items` table used by the Light Archive web app.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Archive category
///
/// Stored as its Korean label. Rows carrying a label outside the known set
/// decode to [`ArchiveCategory::Other`] instead of failing the whole query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArchiveCategory {
    Tech,
    Project,
    Research,
    News,
    Other(String),
}

impl ArchiveCategory {
    /// The four categories the web app offers
    pub const KNOWN: [ArchiveCategory; 4] = [
        ArchiveCategory::Tech,
        ArchiveCategory::Project,
        ArchiveCategory::Research,
        ArchiveCategory::News,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ArchiveCategory::Tech => "기술",
            ArchiveCategory::Project => "프로젝트",
            ArchiveCategory::Research => "리서치",
            ArchiveCategory::News => "뉴스",
            ArchiveCategory::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ArchiveCategory::Other(_))
    }

    /// Parse a known category from its label or English alias.
    ///
    /// Lenient; meant for tool input. Stored rows go through [`From<String>`],
    /// which only recognizes the exact labels.
    pub fn parse_known(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "기술" | "tech" => Some(ArchiveCategory::Tech),
            "프로젝트" | "project" => Some(ArchiveCategory::Project),
            "리서치" | "research" => Some(ArchiveCategory::Research),
            "뉴스" | "news" => Some(ArchiveCategory::News),
            _ => None,
        }
    }
}

impl From<String> for ArchiveCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "기술" => ArchiveCategory::Tech,
            "프로젝트" => ArchiveCategory::Project,
            "리서치" => ArchiveCategory::Research,
            "뉴스" => ArchiveCategory::News,
            _ => ArchiveCategory::Other(s),
        }
    }
}

impl From<ArchiveCategory> for String {
    fn from(c: ArchiveCategory) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for ArchiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of an archive
///
/// Rows carrying a value outside the known set decode to
/// [`ArchiveStatus::Other`], like [`ArchiveCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArchiveStatus {
    Draft,
    Published,
    Archived,
    Other(String),
}

impl ArchiveStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ArchiveStatus::Draft => "draft",
            ArchiveStatus::Published => "published",
            ArchiveStatus::Archived => "archived",
            ArchiveStatus::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ArchiveStatus::Other(_))
    }
}

impl From<String> for ArchiveStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "draft" => ArchiveStatus::Draft,
            "published" => ArchiveStatus::Published,
            "archived" => ArchiveStatus::Archived,
            _ => ArchiveStatus::Other(s),
        }
    }
}

impl From<ArchiveStatus> for String {
    fn from(s: ArchiveStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for ArchiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for tool input; only the three known statuses are accepted
impl FromStr for ArchiveStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ArchiveStatus::Draft),
            "published" => Ok(ArchiveStatus::Published),
            "archived" => Ok(ArchiveStatus::Archived),
            other => Err(crate::Error::InvalidParameter(format!(
                "unknown status '{other}' (expected draft, published or archived)"
            ))),
        }
    }
}

/// Output format of tool responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

/// One row of the `archive_items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveItem {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// HTML body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    pub category: ArchiveCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub technologies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArchiveStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,

    /// Columns this crate does not model, passed through as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Missing and `null` arrays both become empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 and offset-less ISO 8601 (assumed UTC)
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// Parse a database timestamp
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A record to insert into `archive_items`
#[derive(Debug, Clone, Serialize)]
pub struct NewArchive {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: ArchiveCategory,
    pub description: String,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub status: ArchiveStatus,
    pub view_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl NewArchive {
    /// A fresh draft with a generated id and all timestamps set to now
    pub fn draft(
        title: String,
        content: String,
        category: ArchiveCategory,
        description: String,
        tags: Vec<String>,
        technologies: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_archive_id(),
            title,
            content,
            category,
            description,
            tags,
            technologies,
            status: ArchiveStatus::Draft,
            view_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            published_at: now,
            sub_category: None,
            excerpt: None,
            author: None,
            difficulty: None,
            thumbnail_url: None,
        }
    }
}

/// Partial update of an archive; only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ArchiveCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl ArchiveUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items to skip
    #[serde(default)]
    pub offset: u64,

    /// Maximum number of items to return
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an archive id in the web app's `{unix_millis}-{6 base36 chars}` form,
/// e.g. `1761901131544-a2mnqr`.
pub fn generate_archive_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(6)
        .map(|b| char::from(ID_ALPHABET[usize::from(*b) % ID_ALPHABET.len()]))
        .collect();
    format!("{millis}-{suffix}")
}
