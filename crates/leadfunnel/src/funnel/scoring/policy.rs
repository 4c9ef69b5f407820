use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Qualitative readiness tier. Ordering is Red < Amber < Green so
/// monotonicity of the banding policy is checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Red,
    Amber,
    Green,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Red => "red",
            ScoreBand::Amber => "amber",
            ScoreBand::Green => "green",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            ScoreBand::Red => "At Risk",
            ScoreBand::Amber => "Building Momentum",
            ScoreBand::Green => "Automation Ready",
        }
    }
}

/// Percentage banding policy. The absolute-count variant seen elsewhere in
/// this domain is deliberately not implemented; see DESIGN.md.
pub(crate) fn band_for_percentage(percentage: u8, config: &ScoringConfig) -> ScoreBand {
    if percentage >= config.green_threshold {
        ScoreBand::Green
    } else if percentage >= config.amber_threshold {
        ScoreBand::Amber
    } else {
        ScoreBand::Red
    }
}
