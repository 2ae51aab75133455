//! MCP Tool implementations

use std::{collections::HashMap, path::Path, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use light_archive_common::{
    related::rank,
    storage::upload_image,
    store::{ArchiveListParams, ArchiveSearchParams},
    types::{NewArchive, Pagination},
    ArchiveStore, Config, Error, ObjectStore, OpenAiClient, ResponseFormat, Result,
    SupabaseClient, TextGenerator,
};

use crate::format;
use crate::params::{
    category_labels, CreateArchiveParams, FindRelatedParams, GenerateDraftParams,
    GenerateSummaryParams, GetArchiveParams, ListArchivesParams, SearchArchivesParams,
    SuggestTagsParams, UpdateArchiveParams, UploadImageParams,
};

/// Longest slice of an archive body sent along with a prompt
const PROMPT_CONTENT_LIMIT: usize = 4_000;

/// Hints describing a tool's side effects
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    pub title: String,
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    pub open_world_hint: bool,
}

impl ToolAnnotations {
    fn read_only(title: &str, idempotent: bool) -> Self {
        Self {
            title: title.to_string(),
            read_only_hint: true,
            destructive_hint: false,
            idempotent_hint: idempotent,
            open_world_hint: true,
        }
    }

    fn writes(title: &str) -> Self {
        Self {
            title: title.to_string(),
            read_only_hint: false,
            destructive_hint: false,
            idempotent_hint: false,
            open_world_hint: true,
        }
    }
}

/// MCP Tool definition
#[derive(Debug, Clone, Serialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    pub annotations: ToolAnnotations,
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, McpTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: McpTool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&McpTool> {
        self.tools.get(name)
    }

    /// All tools, sorted by name
    pub fn list(&self) -> Vec<&McpTool> {
        let mut tools: Vec<&McpTool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }
}

/// Remote services the tools depend on.
///
/// A service is `None` when its credentials are missing; tools needing it
/// then fail with a "not initialized" error instead of the server refusing
/// to start.
#[derive(Clone, Default)]
pub struct Services {
    pub store: Option<Arc<dyn ArchiveStore>>,
    pub storage: Option<Arc<dyn ObjectStore>>,
    pub llm: Option<Arc<dyn TextGenerator>>,
    /// Base URL of the admin editor
    pub admin_url: String,
}

impl Services {
    /// Build the Supabase and OpenAI clients that the configuration allows
    pub fn from_config(config: &Config) -> Self {
        let mut services = Self {
            admin_url: config.mcp.admin_url.clone(),
            ..Self::default()
        };

        match SupabaseClient::new(&config.supabase) {
            Ok(client) => {
                let client = Arc::new(client);
                services.store = Some(client.clone());
                services.storage = Some(client);
            }
            Err(e) => warn!(error = %e, "Supabase client unavailable"),
        }

        match OpenAiClient::new(&config.openai) {
            Ok(client) => services.llm = Some(Arc::new(client)),
            Err(e) => warn!(error = %e, "OpenAI client unavailable"),
        }

        services
    }

    fn store(&self) -> Result<&dyn ArchiveStore> {
        self.store.as_deref().ok_or(Error::NotConfigured("Supabase"))
    }

    fn storage(&self) -> Result<&dyn ObjectStore> {
        self.storage.as_deref().ok_or(Error::NotConfigured("Supabase"))
    }

    fn llm(&self) -> Result<&dyn TextGenerator> {
        self.llm.as_deref().ok_or(Error::NotConfigured("OpenAI"))
    }
}

fn format_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "description": "Output format (default: markdown)",
        "default": "markdown"
    })
}

fn category_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "enum": category_labels(),
        "description": description
    })
}

/// Create the default tool registry with all available tools
pub fn create_tool_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(McpTool {
        name: "archive_search_archives".to_string(),
        description: "Search published archives by text in title, description and content. Newest first.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 2,
                    "maxLength": 200,
                    "description": "Text to search for"
                },
                "category": category_schema("Filter by category"),
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Maximum number of results (default: 20)",
                    "default": 20
                },
                "offset": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Number of results to skip (default: 0)",
                    "default": 0
                },
                "response_format": format_schema()
            }
        }),
        annotations: ToolAnnotations::read_only("Search Archives", true),
    });

    registry.register(McpTool {
        name: "archive_get_archive".to_string(),
        description: "Get the full details and content of one archive.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["archive_id"],
            "properties": {
                "archive_id": {
                    "type": "string",
                    "description": "Archive ID"
                },
                "response_format": format_schema()
            }
        }),
        annotations: ToolAnnotations::read_only("Get Archive Details", true),
    });

    registry.register(McpTool {
        name: "archive_create_archive".to_string(),
        description: "Create a new draft archive. The id and timestamps are generated. Content MUST be HTML (<h2>, <p>, <ul>, <pre><code>), not Markdown.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["title", "content", "category", "description", "tags", "technologies"],
            "properties": {
                "title": {"type": "string", "minLength": 3, "maxLength": 200, "description": "Title"},
                "content": {"type": "string", "minLength": 10, "description": "Body as HTML"},
                "category": category_schema("Category"),
                "description": {"type": "string", "minLength": 10, "maxLength": 500, "description": "4-5 line summary"},
                "tags": {"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 10, "description": "Tags"},
                "technologies": {"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 20, "description": "Technology stack"},
                "sub_category": {"type": "string", "maxLength": 100, "description": "Sub category / field"},
                "excerpt": {"type": "string", "maxLength": 500, "description": "Excerpt"},
                "author": {"type": "string", "maxLength": 100, "description": "Author"},
                "difficulty": {"type": "string", "description": "Difficulty"},
                "thumbnail_url": {"type": "string", "description": "Thumbnail URL"}
            }
        }),
        annotations: ToolAnnotations::writes("Create Archive"),
    });

    registry.register(McpTool {
        name: "archive_update_archive".to_string(),
        description: "Update fields of an existing archive. Only supplied fields change.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["archive_id"],
            "properties": {
                "archive_id": {"type": "string", "description": "Archive ID"},
                "title": {"type": "string", "minLength": 3, "maxLength": 200},
                "content": {"type": "string", "minLength": 10, "description": "Body as HTML"},
                "description": {"type": "string", "minLength": 10, "maxLength": 500},
                "excerpt": {"type": "string", "maxLength": 500},
                "category": category_schema("Category"),
                "sub_category": {"type": "string", "maxLength": 100},
                "tags": {"type": "array", "items": {"type": "string"}, "maxItems": 10},
                "technologies": {"type": "array", "items": {"type": "string"}, "maxItems": 20},
                "difficulty": {"type": "string"}
            }
        }),
        annotations: ToolAnnotations::writes("Update Archive"),
    });

    registry.register(McpTool {
        name: "archive_find_related".to_string(),
        description: "Find published archives related to one archive, scored by shared category (30), tags (10 each) and technologies (5 each).".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["archive_id"],
            "properties": {
                "archive_id": {"type": "string", "description": "Reference archive ID"},
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 10,
                    "description": "Maximum number of related archives (default: 4)",
                    "default": 4
                },
                "response_format": format_schema()
            }
        }),
        annotations: ToolAnnotations::read_only("Find Related Archives", true),
    });

    registry.register(McpTool {
        name: "archive_list_archives".to_string(),
        description: "List archives, newest first, optionally filtered by category and status.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "category": category_schema("Filter by category"),
                "status": {
                    "type": "string",
                    "enum": ["draft", "published", "archived"],
                    "description": "Filter by status"
                },
                "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20},
                "offset": {"type": "integer", "minimum": 0, "default": 0},
                "response_format": format_schema()
            }
        }),
        annotations: ToolAnnotations::read_only("List Archives", true),
    });

    registry.register(McpTool {
        name: "archive_upload_image".to_string(),
        description: "Upload a local image file to archive storage and return its public URL.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["image_path"],
            "properties": {
                "image_path": {"type": "string", "description": "Path to the image file"},
                "filename": {"type": "string", "description": "File name without extension (generated when omitted)"}
            }
        }),
        annotations: ToolAnnotations::writes("Upload Image"),
    });

    registry.register(McpTool {
        name: "archive_generate_summary".to_string(),
        description: "Generate a short Korean summary of archive content with the LLM.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["content"],
            "properties": {
                "content": {"type": "string", "minLength": 100, "description": "Content to summarize"},
                "target_length": {
                    "type": "integer",
                    "minimum": 80,
                    "maximum": 120,
                    "description": "Target summary length in characters (default: 100)",
                    "default": 100
                }
            }
        }),
        annotations: ToolAnnotations::read_only("Generate Summary (AI)", false),
    });

    registry.register(McpTool {
        name: "archive_suggest_tags".to_string(),
        description: "Suggest tags for an archive with the LLM.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["title", "content", "category"],
            "properties": {
                "title": {"type": "string", "minLength": 3, "maxLength": 200},
                "content": {"type": "string", "minLength": 50},
                "category": category_schema("Category"),
                "max_suggestions": {"type": "integer", "minimum": 5, "maximum": 15, "default": 10}
            }
        }),
        annotations: ToolAnnotations::read_only("Suggest Tags (AI)", false),
    });

    registry.register(McpTool {
        name: "archive_generate_draft".to_string(),
        description: "Generate an HTML archive draft on a topic with the LLM.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "required": ["category", "sub_category", "topic"],
            "properties": {
                "category": category_schema("Category"),
                "sub_category": {"type": "string", "minLength": 3, "maxLength": 100},
                "topic": {"type": "string", "minLength": 5, "maxLength": 200},
                "technologies": {"type": "array", "items": {"type": "string"}, "maxItems": 10}
            }
        }),
        annotations: ToolAnnotations::read_only("Generate Draft (AI)", false),
    });

    registry
}

/// Accept both bare arguments and arguments wrapped as `{"params": {...}}`
fn unwrap_params(params: Value) -> Value {
    match params {
        Value::Object(mut map)
            if map.len() == 1 && map.get("params").is_some_and(Value::is_object) =>
        {
            map.remove("params").unwrap_or_default()
        }
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    }
}

fn parse<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| Error::InvalidParameter(e.to_string()))
}

/// Execute a tool by name
pub async fn execute_tool(services: &Services, tool_name: &str, params: Value) -> Result<String> {
    let params = unwrap_params(params);

    let text = match tool_name {
        "archive_search_archives" => execute_search_archives(services, params).await,
        "archive_get_archive" => execute_get_archive(services, params).await,
        "archive_create_archive" => execute_create_archive(services, params).await,
        "archive_update_archive" => execute_update_archive(services, params).await,
        "archive_find_related" => execute_find_related(services, params).await,
        "archive_list_archives" => execute_list_archives(services, params).await,
        "archive_upload_image" => execute_upload_image(services, params).await,
        "archive_generate_summary" => execute_generate_summary(services, params).await,
        "archive_suggest_tags" => execute_suggest_tags(services, params).await,
        "archive_generate_draft" => execute_generate_draft(services, params).await,
        _ => Err(Error::NotFound(format!("Tool not found: {tool_name}"))),
    }?;

    Ok(format::truncate(text))
}

/// Text handed back to the client when a tool fails
pub fn error_text(error: &Error) -> String {
    format!("Error: {error}")
}

// ============================================================================
// Tool implementations
// ============================================================================

async fn execute_search_archives(services: &Services, params: Value) -> Result<String> {
    let p = parse::<SearchArchivesParams>(params)?.validate()?;

    let archives = services
        .store()?
        .search(&ArchiveSearchParams {
            query: p.query.clone(),
            category: p.category,
            pagination: Pagination {
                offset: p.offset,
                limit: p.limit,
            },
        })
        .await?;

    if archives.is_empty() {
        return Ok(format!("검색 결과가 없습니다: '{}'", p.query));
    }

    match p.response_format {
        ResponseFormat::Markdown => Ok(format::search_markdown(&p.query, &archives)),
        ResponseFormat::Json => format::json(&serde_json::json!({
            "query": p.query,
            "archives": archives
        })),
    }
}

async fn execute_get_archive(services: &Services, params: Value) -> Result<String> {
    let p = parse::<GetArchiveParams>(params)?.validate()?;

    let archive = services
        .store()?
        .get(&p.archive_id)
        .await?
        .ok_or_else(|| Error::ArchiveNotFound(p.archive_id.clone()))?;

    match p.response_format {
        ResponseFormat::Markdown => Ok(format::archive_markdown(&archive)),
        ResponseFormat::Json => format::json(&archive),
    }
}

async fn execute_create_archive(services: &Services, params: Value) -> Result<String> {
    let p = parse::<CreateArchiveParams>(params)?.validate()?;
    let store = services.store()?;

    let mut archive = NewArchive::draft(
        p.title,
        p.content,
        p.category,
        p.description,
        p.tags,
        p.technologies,
    );
    archive.sub_category = p.sub_category;
    archive.excerpt = p.excerpt;
    archive.author = p.author;
    archive.difficulty = p.difficulty;
    archive.thumbnail_url = p.thumbnail_url;

    let created = store.insert(&archive).await?;
    info!(id = %created.id, "Archive created");

    Ok(format::created_html(
        &created,
        archive.created_at,
        &services.admin_url,
    ))
}

async fn execute_update_archive(services: &Services, params: Value) -> Result<String> {
    let (archive_id, update) = parse::<UpdateArchiveParams>(params)?.into_update()?;

    if update.is_empty() {
        return Ok("변경할 내용이 없습니다.".to_string());
    }

    let changed: Vec<String> = match serde_json::to_value(&update)? {
        Value::Object(map) => map.into_iter().map(|(k, _)| k).collect(),
        _ => Vec::new(),
    };

    services
        .store()?
        .update(&archive_id, &update)
        .await?
        .ok_or_else(|| Error::ArchiveNotFound(archive_id.clone()))?;
    info!(id = %archive_id, fields = ?changed, "Archive updated");

    Ok(format!(
        "# ✅ 아카이브 수정 완료\n\n**ID**: `{archive_id}`\n**수정된 항목**: {}",
        changed.join(", ")
    ))
}

async fn execute_find_related(services: &Services, params: Value) -> Result<String> {
    let p = parse::<FindRelatedParams>(params)?.validate()?;
    let store = services.store()?;

    let base = store
        .get(&p.archive_id)
        .await?
        .ok_or_else(|| Error::ArchiveNotFound(p.archive_id.clone()))?;

    let pool = store.published_excluding(&p.archive_id).await?;
    let related = rank(&base, &pool, p.limit);

    if related.is_empty() {
        return Ok(format!(
            "'{}'와 유사한 아카이브를 찾을 수 없습니다.",
            base.title
        ));
    }

    match p.response_format {
        ResponseFormat::Markdown => Ok(format::related_markdown(&base, &related)),
        ResponseFormat::Json => format::json(&serde_json::json!({
            "base_archive": base,
            "related": related
        })),
    }
}

async fn execute_list_archives(services: &Services, params: Value) -> Result<String> {
    let p = parse::<ListArchivesParams>(params)?.validate()?;

    let archives = services
        .store()?
        .list(&ArchiveListParams {
            category: p.category,
            status: p.status,
            pagination: Pagination {
                offset: p.offset,
                limit: p.limit,
            },
        })
        .await?;

    match p.response_format {
        ResponseFormat::Markdown => Ok(format::list_markdown(&archives)),
        ResponseFormat::Json => format::json(&serde_json::json!({ "archives": archives })),
    }
}

async fn execute_upload_image(services: &Services, params: Value) -> Result<String> {
    let p = parse::<UploadImageParams>(params)?.validate()?;

    let url = upload_image(
        services.storage()?,
        Path::new(&p.image_path),
        p.filename.as_deref(),
    )
    .await?;

    Ok(format!(
        "# ✅ 이미지 업로드 완료\n\n**URL**: {url}\n\n본문에서 사용: `<img src=\"{url}\" alt=\"\" />`"
    ))
}

/// At most [`PROMPT_CONTENT_LIMIT`] characters of `content`
fn prompt_content(content: &str) -> &str {
    content
        .char_indices()
        .nth(PROMPT_CONTENT_LIMIT)
        .map_or(content, |(cut, _)| &content[..cut])
}

async fn execute_generate_summary(services: &Services, params: Value) -> Result<String> {
    let p = parse::<GenerateSummaryParams>(params)?.validate()?;

    let prompt = format!(
        "다음 아카이브 본문을 {}자 내외의 한국어 요약문으로 작성해주세요.\n\
         요약문만 출력하고 따옴표나 머리말은 붙이지 마세요.\n\n{}",
        p.target_length,
        prompt_content(&p.content)
    );
    let summary = services.llm()?.generate(&prompt, 400).await?;

    Ok(format!(
        "# 📝 요약 ({}자)\n\n{summary}",
        summary.chars().count()
    ))
}

async fn execute_suggest_tags(services: &Services, params: Value) -> Result<String> {
    let p = parse::<SuggestTagsParams>(params)?.validate()?;

    let prompt = format!(
        "다음 '{}' 카테고리 아카이브에 어울리는 태그를 최대 {}개 추천해주세요.\n\
         태그만 쉼표로 구분해 한 줄로 출력하세요.\n\n제목: {}\n\n본문:\n{}",
        p.category,
        p.max_suggestions,
        p.title,
        prompt_content(&p.content)
    );
    let answer = services.llm()?.generate(&prompt, 200).await?;

    let max = usize::try_from(p.max_suggestions).unwrap_or(usize::MAX);
    let tags = format::parse_tags(&answer, max);
    if tags.is_empty() {
        return Err(Error::Llm("no tags in response".to_string()));
    }

    Ok(format::tags_markdown(&tags))
}

async fn execute_generate_draft(services: &Services, params: Value) -> Result<String> {
    let p = parse::<GenerateDraftParams>(params)?.validate()?;

    let technologies = p
        .technologies
        .filter(|t| !t.is_empty())
        .map(|t| format!("사용 기술: {}\n", t.join(", ")))
        .unwrap_or_default();

    let prompt = format!(
        "'{}' 카테고리의 '{}' 분야 아카이브 초안을 작성해주세요.\n주제: {}\n{technologies}\n\
         본문은 반드시 HTML(<h2>, <p>, <ul>, <pre><code> 등)로 작성하고 마크다운은 사용하지 마세요.\n\
         HTML만 출력하세요.",
        p.category, p.sub_category, p.topic
    );
    let draft = services.llm()?.generate(&prompt, 2000).await?;

    Ok(format::strip_code_fence(&draft).to_string())
}
