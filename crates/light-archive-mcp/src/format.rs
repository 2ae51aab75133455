//! Rendering of tool results as Markdown, JSON and HTML text

use chrono::{DateTime, Utc};
use serde::Serialize;

use light_archive_common::{ArchiveItem, RelatedArchive, Result};

/// Longest response handed back to the client, in characters
pub const CHARACTER_LIMIT: usize = 25_000;

/// Pretty JSON; non-ASCII text is kept as-is
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Cut `text` down to [`CHARACTER_LIMIT`] characters, appending a notice when cut
pub fn truncate(text: String) -> String {
    match text.char_indices().nth(CHARACTER_LIMIT) {
        Some((cut, _)) => format!(
            "{}\n\n... (응답이 {CHARACTER_LIMIT}자를 초과하여 잘렸습니다. limit 또는 offset을 조정하세요.)",
            &text[..cut]
        ),
        None => text,
    }
}

fn code_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("`{v}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Metadata lines shared by search results and detail views
fn detail_lines(lines: &mut Vec<String>, archive: &ArchiveItem) {
    if let Some(sub) = non_empty(archive.sub_category.as_ref()) {
        lines.push(format!("**분야**: {sub}"));
    }
    if let Some(description) = non_empty(archive.description.as_ref()) {
        lines.push(format!("**설명**: {description}"));
    }
    if !archive.tags.is_empty() {
        lines.push(format!("**태그**: {}", code_list(&archive.tags)));
    }
    if !archive.technologies.is_empty() {
        lines.push(format!("**기술**: {}", code_list(&archive.technologies)));
    }
}

pub fn search_markdown(query: &str, archives: &[ArchiveItem]) -> String {
    let mut lines = vec![format!("# 검색 결과: '{query}'"), String::new()];
    lines.push(format!("총 {}개 결과", archives.len()));
    lines.push(String::new());

    for (i, archive) in archives.iter().enumerate() {
        lines.push(format!("## {}. {}", i + 1, archive.title));
        lines.push(format!("**ID**: `{}`", archive.id));
        lines.push(format!("**카테고리**: {}", archive.category));
        detail_lines(&mut lines, archive);
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn archive_markdown(archive: &ArchiveItem) -> String {
    let mut lines = vec![format!("# {}", archive.title), String::new()];
    lines.push(format!("**카테고리**: {}", archive.category));
    detail_lines(&mut lines, archive);
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    if let Some(content) = non_empty(archive.content.as_ref()) {
        lines.push(content.to_string());
    }

    lines.join("\n")
}

/// Short entry used by listings and related results
fn summary_entry(lines: &mut Vec<String>, heading: String, archive: &ArchiveItem) {
    lines.push(heading);
    lines.push(format!("**ID**: `{}`", archive.id));
    lines.push(format!("**카테고리**: {}", archive.category));
    if !archive.tags.is_empty() {
        lines.push(format!("**태그**: {}", code_list(&archive.tags)));
    }
    lines.push(String::new());
}

pub fn related_markdown(base: &ArchiveItem, related: &[RelatedArchive<'_>]) -> String {
    let mut lines = vec![
        format!("# 🔍 '{}'와 관련된 아카이브", base.title),
        String::new(),
    ];
    lines.push(format!("총 {}개 발견", related.len()));
    lines.push(String::new());

    for (i, item) in related.iter().enumerate() {
        let heading = format!(
            "## {}. {} (유사도: {}점)",
            i + 1,
            item.archive.title,
            item.score
        );
        summary_entry(&mut lines, heading, item.archive);
    }

    lines.join("\n")
}

pub fn list_markdown(archives: &[ArchiveItem]) -> String {
    let mut lines = vec!["# 📚 아카이브 목록".to_string(), String::new()];
    lines.push(format!("총 {}개", archives.len()));
    lines.push(String::new());

    for (i, archive) in archives.iter().enumerate() {
        summary_entry(&mut lines, format!("## {}. {}", i + 1, archive.title), archive);
    }

    lines.join("\n")
}

pub fn tags_markdown(tags: &[String]) -> String {
    format!("# 🏷️ 추천 태그\n\n총 {}개\n\n{}", tags.len(), code_list(tags))
}

fn korean_datetime(at: DateTime<Utc>) -> String {
    at.format("%Y년 %m월 %d일 %H:%M").to_string()
}

/// HTML confirmation for a newly created archive
pub fn created_html(archive: &ArchiveItem, created_at: DateTime<Utc>, admin_url: &str) -> String {
    let date = korean_datetime(archive.created_at.unwrap_or(created_at));
    let id = &archive.id;
    let title = &archive.title;
    let category = &archive.category;
    let status = archive.status.as_ref().map_or("draft", |s| s.as_str());
    let admin_url = admin_url.trim_end_matches('/');

    let row = |label: &str, value: &str| {
        format!(
            "  <tr style=\"border-bottom: 1px solid #ddd;\">\n    \
             <td style=\"padding: 8px; font-weight: bold; width: 150px;\">{label}</td>\n    \
             <td style=\"padding: 8px;\">{value}</td>\n  </tr>"
        )
    };
    let rows = [
        row("ID", &format!("<code>{id}</code>")),
        row("제목", title.as_str()),
        row("카테고리", category.as_str()),
        row("상태", status),
        row("생성일시", &date),
        row("태그", &archive.tags.join(", ")),
        row("기술 스택", &archive.technologies.join(", ")),
    ]
    .join("\n");

    format!(
        r#"<h1>✅ 아카이브 생성 완료</h1>

<div style="background: #f5f5f5; padding: 16px; border-radius: 8px; margin: 16px 0;">
  <p><strong>요약:</strong> "{title}" 아카이브가 성공적으로 생성되었습니다.
  {category} 카테고리의 {status} 상태로 저장되었으며,
  {tag_count}개의 태그와 {tech_count}개의 기술 스택이 등록되었습니다.
  ID는 {id}이며, {date}에 생성되었습니다.</p>
</div>

<h2>생성된 아카이브 정보</h2>

<table style="width: 100%; border-collapse: collapse; margin: 16px 0;">
{rows}
</table>

<p style="color: #666; margin-top: 16px;">
  <strong>다음 단계:</strong>
  <a href="{admin_url}/edit/{id}">관리자 페이지</a>에서
  이미지 업로드 및 추가 편집이 가능합니다.
</p>
"#,
        tag_count = archive.tags.len(),
        tech_count = archive.technologies.len(),
    )
}

/// Strip a surrounding Markdown code fence (```` ```html ... ``` ````)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Drop a leading list number such as `1.` or `2)`
fn strip_numbering(s: &str) -> &str {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    s
}

/// Split an LLM tag answer into distinct tags, keeping at most `max`
pub fn parse_tags(text: &str, max: usize) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in text.split([',', '\n']) {
        let tag = raw.trim().trim_start_matches(['-', '*', '•']).trim_start();
        let tag = strip_numbering(tag)
            .trim_start_matches('#')
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '[' | ']'))
            .trim();
        if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        tags.push(tag.to_string());
        if tags.len() == max {
            break;
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(value: serde_json::Value) -> ArchiveItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_search_markdown() {
        let archives = vec![archive(serde_json::json!({
            "id": "1761901131544-a2mnqr",
            "title": "Tokio 정리",
            "category": "기술",
            "sub_category": "",
            "description": "런타임 개요",
            "tags": ["rust", "async"],
            "technologies": ["tokio"]
        }))];

        let md = search_markdown("tokio", &archives);
        assert!(md.starts_with("# 검색 결과: 'tokio'\n\n총 1개 결과\n"));
        assert!(md.contains("## 1. Tokio 정리\n**ID**: `1761901131544-a2mnqr`\n**카테고리**: 기술\n**설명**: 런타임 개요"));
        assert!(md.contains("**태그**: `rust`, `async`"));
        assert!(md.contains("**기술**: `tokio`"));
        assert!(!md.contains("**분야**"));
    }

    #[test]
    fn test_archive_markdown_includes_content() {
        let item = archive(serde_json::json!({
            "id": "1",
            "title": "Title",
            "category": "뉴스",
            "content": "<p>Hello</p>"
        }));
        let md = archive_markdown(&item);
        assert!(md.starts_with("# Title\n\n**카테고리**: 뉴스\n\n---\n\n<p>Hello</p>"));
    }

    #[test]
    fn test_related_markdown() {
        let base = archive(serde_json::json!({"id": "b", "title": "Base", "category": "기술"}));
        let other = archive(serde_json::json!({
            "id": "o", "title": "Other", "category": "기술", "tags": ["rust"]
        }));
        let related = vec![RelatedArchive { archive: &other, score: 40 }];

        let md = related_markdown(&base, &related);
        assert!(md.starts_with("# 🔍 'Base'와 관련된 아카이브\n\n총 1개 발견"));
        assert!(md.contains("## 1. Other (유사도: 40점)\n**ID**: `o`\n**카테고리**: 기술\n**태그**: `rust`"));
    }

    #[test]
    fn test_list_markdown_empty() {
        assert_eq!(list_markdown(&[]), "# 📚 아카이브 목록\n\n총 0개\n");
    }

    #[test]
    fn test_created_html() {
        let item = archive(serde_json::json!({
            "id": "1761901131544-a2mnqr",
            "title": "Rust 비동기",
            "category": "기술",
            "status": "draft",
            "tags": ["rust", "async"],
            "technologies": ["tokio"],
            "created_at": "2025-10-31T09:05:31.544+00:00"
        }));

        let html = created_html(&item, Utc::now(), "http://localhost:3000/admin/");
        assert!(html.contains("2025년 10월 31일 09:05"));
        assert!(html.contains("2개의 태그와 1개의 기술 스택"));
        assert!(html.contains("<code>1761901131544-a2mnqr</code>"));
        assert!(html.contains(r#"href="http://localhost:3000/admin/edit/1761901131544-a2mnqr""#));
    }

    #[test]
    fn test_truncate() {
        let short = "짧은 응답".to_string();
        assert_eq!(truncate(short.clone()), short);

        let long = "가".repeat(CHARACTER_LIMIT + 10);
        let cut = truncate(long);
        assert!(cut.starts_with(&"가".repeat(CHARACTER_LIMIT)));
        assert!(cut.contains("잘렸습니다"));
        assert!(!cut.starts_with(&"가".repeat(CHARACTER_LIMIT + 1)));
    }

    #[test]
    fn test_tags_markdown() {
        let tags = vec!["rust".to_string(), "tokio".to_string()];
        assert_eq!(tags_markdown(&tags), "# 🏷️ 추천 태그\n\n총 2개\n\n`rust`, `tokio`");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```html\n<h2>A</h2>\n```"), "<h2>A</h2>");
        assert_eq!(strip_code_fence("  <p>plain</p> "), "<p>plain</p>");
    }

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags("1. Rust, tokio\n- #async\n\"rust\", `axum`", 10);
        assert_eq!(tags, vec!["Rust", "tokio", "async", "axum"]);

        let tags = parse_tags("a, b, c, d, e, f", 5);
        assert_eq!(tags.len(), 5);
    }
}
