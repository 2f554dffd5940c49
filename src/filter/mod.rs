// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Filter pipeline: predicates over graph nodes, AND-combined.
//!
//! Filtering is pure and idempotent; links are filtered afterwards so that
//! no surviving link dangles. Empty criteria are the identity filter, and
//! malformed criteria degrade to match-all rather than erroring.

use std::collections::BTreeSet;
use std::collections::HashSet;

use smol_str::SmolStr;

use crate::model::{GraphLink, GraphNode, NoteId};

const SECONDS_PER_DAY: i64 = 86_400;

/// Trailing creation-date windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    Today,
    Week,
    Month,
    Year,
}

impl DateBucket {
    fn window_seconds(self) -> i64 {
        match self {
            Self::Today => SECONDS_PER_DAY,
            Self::Week => 7 * SECONDS_PER_DAY,
            Self::Month => 30 * SECONDS_PER_DAY,
            Self::Year => 365 * SECONDS_PER_DAY,
        }
    }
}

/// Structural predicates over a note's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentPredicate {
    HasWikiRefs,
    HasTags,
    MinBodyLen(usize),
}

/// Derived-size buckets. Boundaries sit on the derived size scale
/// (20..=60): small ≤ 25, medium 25..=40, large > 40.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
}

impl SizeBucket {
    fn matches(self, size: f32) -> bool {
        match self {
            Self::Small => size <= 25.0,
            Self::Medium => size > 25.0 && size <= 40.0,
            Self::Large => size > 40.0,
        }
    }
}

/// The visible-subset criteria. All populated predicates must pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring over title or any tag.
    pub search: Option<String>,
    /// Non-empty intersection with the node's tags. Comparison is
    /// case-insensitive on both sides, so callers need not normalize.
    pub tags: BTreeSet<SmolStr>,
    pub created_within: Option<DateBucket>,
    pub content: Option<ContentPredicate>,
    pub size: Option<SizeBucket>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, str::is_empty)
            && self.tags.is_empty()
            && self.created_within.is_none()
            && self.content.is_none()
            && self.size.is_none()
    }

    fn matches(&self, node: &GraphNode, now: i64) -> bool {
        if let Some(needle) = self.search.as_deref() {
            if !needle.is_empty() && !search_matches(node, needle) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let intersects = node.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                self.tags
                    .iter()
                    .any(|selected| selected.to_lowercase() == tag)
            });
            if !intersects {
                return false;
            }
        }

        if let Some(bucket) = self.created_within {
            if node.created_at < now.saturating_sub(bucket.window_seconds()) {
                return false;
            }
        }

        if let Some(content) = self.content {
            let passes = match content {
                ContentPredicate::HasWikiRefs => node.has_wiki_refs,
                ContentPredicate::HasTags => !node.tags.is_empty(),
                ContentPredicate::MinBodyLen(min) => node.body_len >= min,
            };
            if !passes {
                return false;
            }
        }

        if let Some(bucket) = self.size {
            if !bucket.matches(node.size) {
                return false;
            }
        }

        true
    }
}

fn search_matches(node: &GraphNode, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if node.title.to_lowercase().contains(&needle) {
        return true;
    }
    node.tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keeps the nodes matching every populated predicate. `now` is passed in
/// so date windows stay testable.
pub fn filter_nodes(nodes: &[GraphNode], criteria: &FilterCriteria, now: i64) -> Vec<GraphNode> {
    if criteria.is_empty() {
        return nodes.to_vec();
    }
    nodes
        .iter()
        .filter(|node| criteria.matches(node, now))
        .cloned()
        .collect()
}

/// Keeps only the links whose both endpoints survived filtering.
pub fn filter_links(links: &[GraphLink], surviving: &HashSet<&NoteId>) -> Vec<GraphLink> {
    links
        .iter()
        .filter(|link| surviving.contains(&link.source) && surviving.contains(&link.target))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphLink, GraphNode, LinkKind, Note, NoteId};
    use rstest::rstest;

    fn node(id: &str, title: &str, tags: &[&str], created_at: i64, body: &str) -> GraphNode {
        GraphNode::from_note(&Note::new(
            NoteId::new(id).expect("id"),
            title,
            body,
            tags.iter().copied(),
            created_at,
            created_at,
        ))
    }

    const NOW: i64 = 1_000_000_000;

    fn sample_nodes() -> Vec<GraphNode> {
        vec![
            node("a", "Graph Engine", &["project"], NOW - 3_600, "see [[B]]"),
            node("b", "Daily Log", &["log"], NOW - 40 * 86_400, ""),
            node(
                "c",
                "Physics Notes",
                &["physics", "project"],
                NOW - 400 * 86_400,
                &"x".repeat(3_000),
            ),
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let nodes = sample_nodes();
        assert_eq!(filter_nodes(&nodes, &FilterCriteria::default(), NOW), nodes);
    }

    #[test]
    fn filtering_is_idempotent() {
        let nodes = sample_nodes();
        let criteria = FilterCriteria {
            search: Some("graph".to_owned()),
            ..FilterCriteria::default()
        };
        let once = filter_nodes(&nodes, &criteria, NOW);
        let twice = filter_nodes(&once, &criteria, NOW);
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case("graph", &["a"])]
    #[case("LOG", &["b"])]
    #[case("physics", &["c"])] // matches the tag, not the title
    #[case("zzz", &[])]
    fn search_matches_title_or_tag_case_insensitively(
        #[case] needle: &str,
        #[case] expected: &[&str],
    ) {
        let criteria = FilterCriteria {
            search: Some(needle.to_owned()),
            ..FilterCriteria::default()
        };
        let kept = filter_nodes(&sample_nodes(), &criteria, NOW);
        let ids: Vec<_> = kept.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn tag_set_requires_intersection() {
        let criteria = FilterCriteria {
            tags: BTreeSet::from([SmolStr::new("project")]),
            ..FilterCriteria::default()
        };
        let kept = filter_nodes(&sample_nodes(), &criteria, NOW);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn tag_criteria_match_case_insensitively_on_both_sides() {
        let nodes = vec![node("a", "A", &["Rust"], NOW, "")];

        let upper = FilterCriteria {
            tags: BTreeSet::from([SmolStr::new("RUST")]),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_nodes(&nodes, &upper, NOW).len(), 1);

        let lower = FilterCriteria {
            tags: BTreeSet::from([SmolStr::new("rust")]),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_nodes(&nodes, &lower, NOW).len(), 1);
    }

    #[rstest]
    #[case(DateBucket::Today, &["a"])]
    #[case(DateBucket::Month, &["a"])]
    #[case(DateBucket::Year, &["a", "b"])]
    fn date_buckets_are_trailing_windows(#[case] bucket: DateBucket, #[case] expected: &[&str]) {
        let criteria = FilterCriteria {
            created_within: Some(bucket),
            ..FilterCriteria::default()
        };
        let kept = filter_nodes(&sample_nodes(), &criteria, NOW);
        let ids: Vec<_> = kept.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn content_predicates_match_derived_metadata() {
        let nodes = sample_nodes();
        let wiki = FilterCriteria {
            content: Some(ContentPredicate::HasWikiRefs),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_nodes(&nodes, &wiki, NOW).len(), 1);

        let long = FilterCriteria {
            content: Some(ContentPredicate::MinBodyLen(1_000)),
            ..FilterCriteria::default()
        };
        let kept = filter_nodes(&nodes, &long, NOW);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.as_str(), "c");
    }

    #[test]
    fn size_buckets_partition_the_size_scale() {
        let nodes = sample_nodes();
        for node in &nodes {
            let matching = [SizeBucket::Small, SizeBucket::Medium, SizeBucket::Large]
                .into_iter()
                .filter(|b| b.matches(node.size))
                .count();
            assert_eq!(matching, 1, "size {} in several buckets", node.size);
        }
    }

    #[test]
    fn links_with_filtered_endpoints_are_dropped() {
        let a = NoteId::new("a").expect("id");
        let b = NoteId::new("b").expect("id");
        let c = NoteId::new("c").expect("id");
        let links = vec![
            GraphLink::new(a.clone(), b.clone(), LinkKind::Tag, 0.5),
            GraphLink::new(b.clone(), c.clone(), LinkKind::Tag, 0.5),
        ];
        let surviving: HashSet<&NoteId> = [&a, &b].into_iter().collect();
        let kept = filter_links(&links, &surviving);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].touches(&a) && kept[0].touches(&b));
    }

    #[test]
    fn blank_search_matches_all() {
        let criteria = FilterCriteria {
            search: Some(String::new()),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(filter_nodes(&sample_nodes(), &criteria, NOW).len(), 3);
    }
}
