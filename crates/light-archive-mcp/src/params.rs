//! Tool input parameters and their validation
//!
//! Every string is trimmed before its bounds are checked. Lengths count
//! characters, not bytes.

use serde::Deserialize;

use light_archive_common::{
    types::ArchiveUpdate, ArchiveCategory, ArchiveStatus, Error, ResponseFormat, Result,
};

pub const DEFAULT_LIMIT: u64 = 20;
pub const DEFAULT_RELATED_LIMIT: usize = 4;

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn default_related_limit() -> usize {
    DEFAULT_RELATED_LIMIT
}

fn default_target_length() -> u32 {
    100
}

fn default_max_suggestions() -> u32 {
    10
}

/// Trim a required string and check its length
fn text(field: &str, value: String, min: usize, max: Option<usize>) -> Result<String> {
    let value = value.trim().to_string();
    let len = value.chars().count();
    if len < min {
        return Err(Error::InvalidParameter(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if let Some(max) = max.filter(|max| len > *max) {
        return Err(Error::InvalidParameter(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

/// Like [`text`], but blank values become `None`
fn opt_text(
    field: &str,
    value: Option<String>,
    min: usize,
    max: Option<usize>,
) -> Result<Option<String>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => text(field, v, min, max).map(Some),
        None => Ok(None),
    }
}

/// Trim items, drop blanks, and check the item count
fn items(field: &str, values: Vec<String>, min: usize, max: usize) -> Result<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.len() < min {
        return Err(Error::InvalidParameter(format!(
            "{field} must contain at least {min} item(s)"
        )));
    }
    if values.len() > max {
        return Err(Error::InvalidParameter(format!(
            "{field} must contain at most {max} items"
        )));
    }
    Ok(values)
}

fn range<T: PartialOrd + std::fmt::Display>(field: &str, value: T, min: T, max: T) -> Result<T> {
    if value < min || value > max {
        return Err(Error::InvalidParameter(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Labels of the categories accepted as input
pub fn category_labels() -> Vec<String> {
    ArchiveCategory::KNOWN
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}

fn id(value: String) -> Result<String> {
    text("archive_id", value, 1, None)
}

/// Accept a known category by label or English alias, whitespace ignored
fn known(category: ArchiveCategory) -> Result<ArchiveCategory> {
    ArchiveCategory::parse_known(category.as_str()).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "category must be one of {}",
            category_labels().join(", ")
        ))
    })
}

fn known_status(status: ArchiveStatus) -> Result<ArchiveStatus> {
    status.as_str().parse()
}

#[derive(Debug, Deserialize)]
pub struct SearchArchivesParams {
    pub query: String,
    pub category: Option<ArchiveCategory>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl SearchArchivesParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            query: text("query", self.query, 2, Some(200))?,
            category: self.category.map(known).transpose()?,
            limit: range("limit", self.limit, 1, 100)?,
            ..self
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GetArchiveParams {
    pub archive_id: String,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl GetArchiveParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            archive_id: id(self.archive_id)?,
            ..self
        })
    }
}

/// Content must be HTML (`<h2>`, `<p>`, `<ul>`, ...), not Markdown.
#[derive(Debug, Deserialize)]
pub struct CreateArchiveParams {
    pub title: String,
    pub content: String,
    pub category: ArchiveCategory,
    pub description: String,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub sub_category: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl CreateArchiveParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            title: text("title", self.title, 3, Some(200))?,
            content: text("content", self.content, 10, None)?,
            category: known(self.category)?,
            description: text("description", self.description, 10, Some(500))?,
            tags: items("tags", self.tags, 1, 10)?,
            technologies: items("technologies", self.technologies, 1, 20)?,
            sub_category: opt_text("sub_category", self.sub_category, 0, Some(100))?,
            excerpt: opt_text("excerpt", self.excerpt, 0, Some(500))?,
            author: opt_text("author", self.author, 0, Some(100))?,
            difficulty: opt_text("difficulty", self.difficulty, 0, None)?,
            thumbnail_url: opt_text("thumbnail_url", self.thumbnail_url, 0, None)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateArchiveParams {
    pub archive_id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<ArchiveCategory>,
    pub sub_category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub difficulty: Option<String>,
}

impl UpdateArchiveParams {
    /// Validate and split into the target id and the fields to write.
    ///
    /// Blank strings and empty lists count as "not supplied".
    pub fn into_update(self) -> Result<(String, ArchiveUpdate)> {
        let list = |field: &str, values: Option<Vec<String>>, max: usize| {
            values
                .map(|v| items(field, v, 0, max))
                .transpose()
                .map(|v| v.filter(|v| !v.is_empty()))
        };

        let update = ArchiveUpdate {
            title: opt_text("title", self.title, 3, Some(200))?,
            content: opt_text("content", self.content, 10, None)?,
            description: opt_text("description", self.description, 10, Some(500))?,
            excerpt: opt_text("excerpt", self.excerpt, 0, Some(500))?,
            category: self.category.map(known).transpose()?,
            sub_category: opt_text("sub_category", self.sub_category, 0, Some(100))?,
            tags: list("tags", self.tags, 10)?,
            technologies: list("technologies", self.technologies, 20)?,
            difficulty: opt_text("difficulty", self.difficulty, 0, None)?,
        };

        Ok((id(self.archive_id)?, update))
    }
}

#[derive(Debug, Deserialize)]
pub struct FindRelatedParams {
    pub archive_id: String,
    #[serde(default = "default_related_limit")]
    pub limit: usize,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl FindRelatedParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            archive_id: id(self.archive_id)?,
            limit: range("limit", self.limit, 1, 10)?,
            ..self
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListArchivesParams {
    pub category: Option<ArchiveCategory>,
    pub status: Option<ArchiveStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListArchivesParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            category: self.category.map(known).transpose()?,
            status: self.status.map(known_status).transpose()?,
            limit: range("limit", self.limit, 1, 100)?,
            ..self
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadImageParams {
    pub image_path: String,
    pub filename: Option<String>,
}

impl UploadImageParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            image_path: text("image_path", self.image_path, 1, None)?,
            filename: opt_text("filename", self.filename, 0, Some(200))?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryParams {
    pub content: String,
    #[serde(default = "default_target_length")]
    pub target_length: u32,
}

impl GenerateSummaryParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            content: text("content", self.content, 100, None)?,
            target_length: range("target_length", self.target_length, 80, 120)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestTagsParams {
    pub title: String,
    pub content: String,
    pub category: ArchiveCategory,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: u32,
}

impl SuggestTagsParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            title: text("title", self.title, 3, Some(200))?,
            content: text("content", self.content, 50, None)?,
            category: known(self.category)?,
            max_suggestions: range("max_suggestions", self.max_suggestions, 5, 15)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateDraftParams {
    pub category: ArchiveCategory,
    pub sub_category: String,
    pub topic: String,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
}

impl GenerateDraftParams {
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            category: known(self.category)?,
            sub_category: text("sub_category", self.sub_category, 3, Some(100))?,
            topic: text("topic", self.topic, 5, Some(200))?,
            technologies: self
                .technologies
                .map(|t| items("technologies", t, 0, 10))
                .transpose()?,
        })
    }
}
