//! Relatedness ranking between archives
//!
//! Scores candidates against a reference archive by shared category, tags and
//! technologies. Pure computation: no I/O, no shared state.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::ArchiveItem;

/// Points for sharing the reference's category
pub const CATEGORY_WEIGHT: u32 = 30;

/// Points per distinct shared tag
pub const TAG_WEIGHT: u32 = 10;

/// Points per distinct shared technology
pub const TECHNOLOGY_WEIGHT: u32 = 5;

/// A candidate archive with its relatedness score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedArchive<'a> {
    pub archive: &'a ArchiveItem,
    pub score: u32,
}

/// Relatedness score of `candidate` with respect to `reference`.
///
/// Tags and technologies are compared as sets, so duplicates within one
/// record count once. The score is symmetric in its arguments.
pub fn score(reference: &ArchiveItem, candidate: &ArchiveItem) -> u32 {
    let mut score = 0;

    if candidate.category == reference.category {
        score += CATEGORY_WEIGHT;
    }

    score += overlap(&reference.tags, &candidate.tags) * TAG_WEIGHT;
    score += overlap(&reference.technologies, &candidate.technologies) * TECHNOLOGY_WEIGHT;

    score
}

fn overlap(a: &[String], b: &[String]) -> u32 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    u32::try_from(a.intersection(&b).count()).unwrap_or(u32::MAX)
}

/// Rank `candidates` by relatedness to `reference` and keep the best `limit`.
///
/// Candidates scoring zero are dropped. Equal scores keep their order in
/// `candidates`. The caller must already have removed `reference` itself from
/// the pool.
pub fn rank<'a>(
    reference: &ArchiveItem,
    candidates: &'a [ArchiveItem],
    limit: usize,
) -> Vec<RelatedArchive<'a>> {
    let mut scored: Vec<RelatedArchive<'a>> = candidates
        .iter()
        .map(|archive| RelatedArchive {
            archive,
            score: score(reference, archive),
        })
        .filter(|related| related.score > 0)
        .collect();

    // stable: ties stay in pool order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
