// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Link generation: notes + an active strategy → typed, weighted links.
//!
//! Every strategy is a pure function of its inputs and produces output in a
//! stable order, so identical notes and mode always yield identical links.
//! Unresolvable references are dropped silently; they are expected input,
//! not errors.

use crate::model::{GraphLink, LinkKind, Note};

pub mod hierarchical;
pub mod internal;
pub mod similarity;
pub mod tag;

/// Tunable strategy constants. Kept as one named configuration value so
/// tuning never touches the strategy code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    /// Occurrence count at which an internal link saturates to strength 1.
    pub internal_saturation: u32,
    /// Minimum token-set Jaccard score for a similarity link.
    pub similarity_threshold: f32,
    /// Note count above which the O(n²) similarity scan is skipped outright
    /// and no similarity links are produced.
    pub similarity_note_ceiling: usize,
    /// Tokens shorter than this never count toward similarity.
    pub similarity_min_token_len: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            internal_saturation: 3,
            similarity_threshold: 0.15,
            similarity_note_ceiling: 250,
            similarity_min_token_len: 3,
        }
    }
}

/// Produces the active strategy's links for `notes`. Only one strategy runs
/// per call; switching modes is a full regeneration, never a merge.
pub fn generate_links(notes: &[Note], mode: LinkKind, config: &LinkConfig) -> Vec<GraphLink> {
    match mode {
        LinkKind::Internal => internal::generate(notes, config),
        LinkKind::Tag => tag::generate(notes),
        LinkKind::Similarity => similarity::generate(notes, config),
        LinkKind::Hierarchical => hierarchical::generate(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_links, LinkConfig};
    use crate::model::fixtures::notes_abc_internal;
    use crate::model::LinkKind;
    use rstest::rstest;

    #[rstest]
    #[case(LinkKind::Internal)]
    #[case(LinkKind::Tag)]
    #[case(LinkKind::Similarity)]
    #[case(LinkKind::Hierarchical)]
    fn generation_is_deterministic(#[case] mode: LinkKind) {
        let notes = crate::model::fixtures::demo_notes();
        let config = LinkConfig::default();
        let first = generate_links(&notes, mode, &config);
        let second = generate_links(&notes, mode, &config);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(LinkKind::Internal)]
    #[case(LinkKind::Tag)]
    #[case(LinkKind::Similarity)]
    #[case(LinkKind::Hierarchical)]
    fn empty_input_yields_no_links(#[case] mode: LinkKind) {
        let links = generate_links(&[], mode, &LinkConfig::default());
        assert!(links.is_empty());
    }

    #[test]
    fn only_the_active_mode_is_produced() {
        let notes = notes_abc_internal();
        let links = generate_links(&notes, LinkKind::Internal, &LinkConfig::default());
        assert!(links.iter().all(|l| l.kind == LinkKind::Internal));
    }

    #[test]
    fn strengths_stay_in_unit_range_for_all_modes() {
        let notes = crate::model::fixtures::demo_notes();
        for mode in LinkKind::ALL {
            for link in generate_links(&notes, mode, &LinkConfig::default()) {
                assert!(
                    (0.0..=1.0).contains(&link.strength),
                    "{mode} strength {} out of range",
                    link.strength
                );
            }
        }
    }
}
