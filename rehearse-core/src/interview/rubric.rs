//! Versioned scoring rubric

use std::ops::RangeInclusive;

/// Version tag of the rubric below
pub const RUBRIC_VERSION: &str = "v1";

/// One score band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub scores: RangeInclusive<u8>,
    pub label: &'static str,
    pub criteria: &'static str,
}

const BANDS_V1: &[Band] = &[
    Band {
        scores: 0..=0,
        label: "Invalid",
        criteria: "copied from the question, gibberish, off-topic, under ~10 words, or no attempt to address the question",
    },
    Band {
        scores: 1..=3,
        label: "Poor",
        criteria: "lacks technical accuracy or understanding, vague or generic, missing key concepts, just buzzwords",
    },
    Band {
        scores: 4..=5,
        label: "Shallow",
        criteria: "correct ideas but little detail, misses edge cases, poor structure, uses terms without explaining them",
    },
    Band {
        scores: 6..=7,
        label: "Mostly correct",
        criteria: "technically correct with minor inaccuracies, lacks depth or examples, not fully structured",
    },
    Band {
        scores: 8..=9,
        label: "Strong",
        criteria: "technically sound, good depth and clarity, well structured, uses examples, minor polish issues",
    },
    Band {
        scores: 10..=10,
        label: "Excellent",
        criteria: "complete and deep, clearly structured, anticipates trade-offs, demonstrates expertise with examples",
    },
];

/// The fixed 0-10 scale answers are graded against
#[derive(Debug, Clone, Copy)]
pub struct Rubric {
    version: &'static str,
    bands: &'static [Band],
}

impl Default for Rubric {
    fn default() -> Self {
        Self::v1()
    }
}

impl Rubric {
    pub fn v1() -> Self {
        Self {
            version: RUBRIC_VERSION,
            bands: BANDS_V1,
        }
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn bands(&self) -> &'static [Band] {
        self.bands
    }

    /// Band containing `score`, if the score is on the scale
    pub fn band_for(&self, score: u8) -> Option<&'static Band> {
        self.bands.iter().find(|b| b.scores.contains(&score))
    }

    /// Render the bands as prompt lines
    pub fn render(&self) -> String {
        self.bands
            .iter()
            .map(|b| {
                let (lo, hi) = (*b.scores.start(), *b.scores.end());
                let range = if lo == hi {
                    lo.to_string()
                } else {
                    format!("{lo} to {hi}")
                };
                format!("- {range} ({}): {}", b.label, b.criteria)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
