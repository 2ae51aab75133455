//! Tests for types module

use chrono::{Datelike, Timelike};

use crate::types::{
    generate_archive_id, parse_timestamp, ArchiveCategory, ArchiveItem, ArchiveStatus,
    ArchiveUpdate, NewArchive, Pagination, ResponseFormat,
};

#[test]
fn test_category_labels() {
    assert_eq!(ArchiveCategory::Tech.to_string(), "기술");
    assert_eq!(ArchiveCategory::Project.to_string(), "프로젝트");
    assert_eq!(ArchiveCategory::Research.to_string(), "리서치");
    assert_eq!(ArchiveCategory::News.to_string(), "뉴스");
}

#[test]
fn test_category_parse_known() {
    assert_eq!(ArchiveCategory::parse_known("기술"), Some(ArchiveCategory::Tech));
    assert_eq!(ArchiveCategory::parse_known(" News "), Some(ArchiveCategory::News));
    assert_eq!(ArchiveCategory::parse_known("블로그"), None);
}

#[test]
fn test_stored_category_decodes_exact_labels_only() {
    let category: ArchiveCategory = serde_json::from_str("\"뉴스\"").unwrap();
    assert_eq!(category, ArchiveCategory::News);

    let category: ArchiveCategory = serde_json::from_str("\" news \"").unwrap();
    assert_eq!(category, ArchiveCategory::Other(" news ".to_string()));
    assert_eq!(serde_json::to_string(&category).unwrap(), "\" news \"");
}

#[test]
fn test_category_unknown_label_is_preserved() {
    let category: ArchiveCategory = serde_json::from_str("\"블로그\"").unwrap();
    assert_eq!(category, ArchiveCategory::Other("블로그".to_string()));
    assert!(!category.is_known());
    assert_eq!(serde_json::to_string(&category).unwrap(), "\"블로그\"");
}

#[test]
fn test_status_from_str() {
    assert_eq!("published".parse::<ArchiveStatus>().unwrap(), ArchiveStatus::Published);
    assert_eq!("DRAFT".parse::<ArchiveStatus>().unwrap(), ArchiveStatus::Draft);
    assert!("deleted".parse::<ArchiveStatus>().is_err());
}

#[test]
fn test_stored_status_is_lenient() {
    let status: ArchiveStatus = serde_json::from_str("\"published\"").unwrap();
    assert_eq!(status, ArchiveStatus::Published);

    let status: ArchiveStatus = serde_json::from_str("\"hidden\"").unwrap();
    assert_eq!(status, ArchiveStatus::Other("hidden".to_string()));
    assert!(!status.is_known());
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"hidden\"");
}

#[test]
fn test_response_format_default() {
    assert_eq!(ResponseFormat::default(), ResponseFormat::Markdown);
    let format: ResponseFormat = serde_json::from_str("\"json\"").unwrap();
    assert_eq!(format, ResponseFormat::Json);
}

#[test]
fn test_archive_item_defaults_missing_arrays() {
    let item: ArchiveItem = serde_json::from_value(serde_json::json!({
        "id": "1",
        "title": "Rust",
        "category": "기술",
        "tags": null
    }))
    .unwrap();

    assert!(item.tags.is_empty());
    assert!(item.technologies.is_empty());
    assert!(item.status.is_none());
}

#[test]
fn test_archive_item_rejects_non_string_tags() {
    let result: Result<ArchiveItem, _> = serde_json::from_value(serde_json::json!({
        "id": "1",
        "category": "기술",
        "tags": [1, 2]
    }));
    assert!(result.is_err());
}

#[test]
fn test_archive_item_keeps_unknown_columns() {
    let item: ArchiveItem = serde_json::from_value(serde_json::json!({
        "id": "1",
        "title": "Rust",
        "category": "기술",
        "status": "published",
        "field": "backend",
        "created_at": "2025-10-31T09:05:31.544+00:00"
    }))
    .unwrap();

    assert_eq!(item.status, Some(ArchiveStatus::Published));
    assert_eq!(item.extra.get("field").unwrap(), "backend");

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["field"], "backend");
    assert_eq!(json["category"], "기술");
}

#[test]
fn test_parse_timestamp() {
    let dt = parse_timestamp("2025-10-31T09:05:31.544+09:00").unwrap();
    assert_eq!(dt.hour(), 0);

    let dt = parse_timestamp("2025-10-31T09:05:31.544123").unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2025, 10, 31, 9));

    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn test_generate_archive_id_shape() {
    let id = generate_archive_id();
    let (millis, suffix) = id.split_once('-').unwrap();

    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(suffix.len(), 6);
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_new_archive_draft() {
    let archive = NewArchive::draft(
        "Title".to_string(),
        "<p>Body text</p>".to_string(),
        ArchiveCategory::Tech,
        "Description".to_string(),
        vec!["rust".to_string()],
        vec!["tokio".to_string()],
    );

    assert_eq!(archive.status, ArchiveStatus::Draft);
    assert_eq!(archive.created_at, archive.updated_at);
    assert_eq!(archive.created_at, archive.published_at);

    let json = serde_json::to_value(&archive).unwrap();
    assert_eq!(json["status"], "draft");
    assert_eq!(json["view_count"], 0);
    assert!(json.get("excerpt").is_none());
}

#[test]
fn test_archive_update_is_empty() {
    assert!(ArchiveUpdate::default().is_empty());

    let update = ArchiveUpdate {
        title: Some("New".to_string()),
        ..ArchiveUpdate::default()
    };
    assert!(!update.is_empty());
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        serde_json::json!({"title": "New"})
    );
}

#[test]
fn test_pagination() {
    let pagination = Pagination::default();
    assert_eq!(pagination.offset, 0);
    assert_eq!(pagination.limit, 20);
}
