//! Tests for related module

use crate::related::{rank, score};
use crate::types::{ArchiveCategory, ArchiveItem};

fn archive(id: &str, category: &str, tags: &[&str], technologies: &[&str]) -> ArchiveItem {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Archive {id}"),
        "category": category,
        "tags": tags,
        "technologies": technologies,
        "status": "published",
    }))
    .unwrap()
}

fn ids(ranked: &[crate::related::RelatedArchive<'_>]) -> Vec<String> {
    ranked.iter().map(|r| r.archive.id.clone()).collect()
}

#[test]
fn test_same_category_and_one_tag() {
    let reference = archive("ref", "기술", &["rust", "wasm"], &["tokio"]);
    let candidate = archive("a", "기술", &["rust"], &[]);
    assert_eq!(score(&reference, &candidate), 40);
}

#[test]
fn test_nothing_shared_is_excluded() {
    let reference = archive("ref", "기술", &["rust"], &["tokio"]);
    let candidate = archive("a", "뉴스", &["design"], &["figma"]);

    assert_eq!(score(&reference, &candidate), 0);
    assert!(rank(&reference, &[candidate], 4).is_empty());
}

#[test]
fn test_cross_category_tags_and_technologies() {
    let reference = archive("ref", "뉴스", &["ai", "ml", "llm"], &["gpt"]);
    let candidate = archive("a", "프로젝트", &["ai", "ml"], &["gpt"]);
    assert_eq!(score(&reference, &candidate), 25);
}

#[test]
fn test_limit_drops_zero_scores() {
    let reference = archive("ref", "기술", &["rust", "wasm"], &["tokio"]);
    let candidates = vec![
        archive("forty", "기술", &["rust"], &[]),
        archive("zero", "뉴스", &[], &[]),
        archive("twenty-five", "리서치", &["rust", "wasm"], &["tokio"]),
    ];

    let ranked = rank(&reference, &candidates, 2);
    assert_eq!(ids(&ranked), vec!["forty", "twenty-five"]);
    assert_eq!(ranked[0].score, 40);
    assert_eq!(ranked[1].score, 25);
}

#[test]
fn test_category_contributes_exactly_thirty() {
    let reference = archive("ref", "리서치", &["a", "b"], &["x"]);
    for (tags, technologies) in [
        (vec![], vec![]),
        (vec!["a"], vec![]),
        (vec!["a", "b"], vec!["x"]),
    ] {
        let same = archive("s", "리서치", &tags, &technologies);
        let other = archive("o", "뉴스", &tags, &technologies);
        assert_eq!(score(&reference, &same) - score(&reference, &other), 30);
    }
}

#[test]
fn test_score_is_symmetric() {
    let pairs = [
        (
            archive("a", "기술", &["rust", "wasm", "cli"], &["tokio", "axum"]),
            archive("b", "기술", &["rust", "cli"], &["axum"]),
        ),
        (
            archive("a", "뉴스", &["ai"], &[]),
            archive("b", "프로젝트", &["ai", "ml"], &["gpt"]),
        ),
        (
            archive("a", "블로그", &[], &[]),
            archive("b", "블로그", &[], &[]),
        ),
    ];

    for (a, b) in &pairs {
        assert_eq!(score(a, b), score(b, a));
    }
}

#[test]
fn test_duplicate_tags_count_once() {
    let reference = archive("ref", "뉴스", &["a", "b"], &[]);
    let duplicated = archive("dup", "기술", &["a", "a", "b"], &[]);
    let distinct = archive("set", "기술", &["b", "a"], &[]);

    assert_eq!(score(&reference, &duplicated), 20);
    assert_eq!(score(&reference, &duplicated), score(&reference, &distinct));
}

#[test]
fn test_ties_keep_pool_order() {
    let reference = archive("ref", "기술", &["rust"], &[]);
    let candidates = vec![
        archive("first", "기술", &[], &[]),
        archive("best", "기술", &["rust"], &[]),
        archive("second", "기술", &[], &[]),
        archive("third", "기술", &[], &[]),
    ];

    let ranked = rank(&reference, &candidates, 10);
    assert_eq!(ids(&ranked), vec!["best", "first", "second", "third"]);
}

#[test]
fn test_length_and_ordering_properties() {
    let reference = archive("ref", "기술", &["rust", "wasm", "cli"], &["tokio", "serde"]);
    let candidates: Vec<ArchiveItem> = (0..12)
        .map(|i| {
            let category = if i % 3 == 0 { "기술" } else { "뉴스" };
            let tags: Vec<&str> = ["rust", "wasm", "cli"].into_iter().take(i % 4).collect();
            let technologies: Vec<&str> = ["tokio", "serde"].into_iter().take(i % 3).collect();
            archive(&i.to_string(), category, &tags, &technologies)
        })
        .collect();

    let qualifying = candidates
        .iter()
        .filter(|c| score(&reference, c) > 0)
        .count();

    for limit in 1..=15 {
        let ranked = rank(&reference, &candidates, limit);
        assert_eq!(ranked.len(), limit.min(qualifying));
        assert!(ranked.iter().all(|r| r.score >= 1));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_unknown_categories_still_match() {
    let reference = archive("ref", "블로그", &[], &[]);
    let candidate = archive("a", "블로그", &[], &[]);
    assert_eq!(reference.category, ArchiveCategory::Other("블로그".to_string()));
    assert_eq!(score(&reference, &candidate), 30);
}

#[test]
fn test_empty_pool() {
    let reference = archive("ref", "기술", &["rust"], &[]);
    assert!(rank(&reference, &[], 4).is_empty());
}

#[test]
fn test_category_match_is_exact() {
    let reference = archive("ref", "기술", &[], &[]);
    let english = archive("en", "Tech", &[], &[]);
    let padded = archive("pad", " 기술 ", &[], &[]);

    assert_eq!(score(&reference, &english), 0);
    assert_eq!(score(&reference, &padded), 0);
    assert!(rank(&reference, &[english, padded], 4).is_empty());
}
