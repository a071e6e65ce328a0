//! Conflict resolution for per-row symbol detections.
//!
//! Template matching reports every window above the match threshold, so a
//! row often carries several hits for the same symbol plus hits for symbols
//! that cannot coexist on one row. [`ConflictPolicy`] reduces the raw
//! detections to one confidence per symbol name and arbitrates exclusive
//! groups in favour of the strongest member.

use std::collections::BTreeMap;

use crate::matcher::Detection;

/// Final per-row symbol set: template name to best confidence score.
///
/// A `BTreeMap` keeps serialization order stable across runs.
pub type ResolvedSymbolSet = BTreeMap<String, f32>;

/// Policy for collapsing raw detections into a per-row symbol set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictPolicy {
    /// Minimum score a detection needs to count as a confirmed symbol.
    pub strong_threshold: f32,
    /// Groups of template names that cannot appear on the same row.
    /// Within a group only the highest-scoring present member survives.
    pub exclusive_groups: Vec<Vec<String>>,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            strong_threshold: 0.80,
            exclusive_groups: Vec::new(),
        }
    }
}

impl ConflictPolicy {
    /// Sets the confirmation threshold.
    #[must_use]
    pub fn with_strong_threshold(mut self, threshold: f32) -> Self {
        self.strong_threshold = threshold;
        self
    }

    /// Adds a group of mutually exclusive template names.
    #[must_use]
    pub fn with_exclusive_group<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusive_groups
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Collapses raw detections into the final symbol set for one row.
    ///
    /// Detections below the strong threshold are dropped, the rest are
    /// collapsed to the best score per name, and each exclusive group is
    /// reduced to its highest-scoring present member. On a score tie the
    /// member listed first in the group wins.
    pub fn resolve(&self, detections: &[Detection]) -> ResolvedSymbolSet {
        let mut best: ResolvedSymbolSet = BTreeMap::new();
        for detection in detections {
            if detection.score < self.strong_threshold {
                continue;
            }
            let entry = best
                .entry(detection.name.clone())
                .or_insert(f32::NEG_INFINITY);
            if detection.score > *entry {
                *entry = detection.score;
            }
        }

        for group in &self.exclusive_groups {
            let mut winner: Option<(usize, f32)> = None;
            let mut present = 0usize;
            for (idx, name) in group.iter().enumerate() {
                if let Some(&score) = best.get(name) {
                    present += 1;
                    let beats = match winner {
                        Some((_, best_score)) => score > best_score,
                        None => true,
                    };
                    if beats {
                        winner = Some((idx, score));
                    }
                }
            }
            if present > 1 {
                if let Some((winner_idx, _)) = winner {
                    let keep = &group[winner_idx];
                    best.retain(|name, _| !group.contains(name) || name == keep);
                }
            }
        }

        best
    }
}
