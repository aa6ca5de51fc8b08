//! Rod (equipment) state from the hotbar slot

use super::config::DetectionConfig;
use super::region::RegionImage;
use crate::template_matching::{MatchResult, Template, match_multi_scale};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RodState {
    /// Rod is in hand
    Engaged,
    /// Rod is in the hotbar and must be equipped
    Disengaged,
    /// Neither icon is recognizable
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RodReading {
    pub state: RodState,
    pub engaged_score: f32,
    pub disengaged_score: f32,
    /// Where the winning icon was found (region-local), if any
    pub location: Option<(u32, u32)>,
}

/// Disengaged wins whenever it passes its threshold, even against a higher
/// engaged score.
pub fn resolve_rod_state(
    engaged_score: f32,
    disengaged_score: f32,
    engaged_threshold: f32,
    disengaged_threshold: f32,
) -> RodState {
    if disengaged_score >= disengaged_threshold {
        RodState::Disengaged
    } else if engaged_score >= engaged_threshold {
        RodState::Engaged
    } else {
        RodState::Indeterminate
    }
}

pub struct RodStateDetector {
    engaged: Arc<Template>,
    disengaged: Arc<Template>,
    config: DetectionConfig,
}

impl RodStateDetector {
    pub fn new(engaged: Arc<Template>, disengaged: Arc<Template>, config: DetectionConfig) -> Self {
        Self {
            engaged,
            disengaged,
            config,
        }
    }

    pub fn detect(&self, frame: &RegionImage) -> RodReading {
        let engaged = match_multi_scale(&frame.search, &self.engaged, &self.config.scales);
        let disengaged = match_multi_scale(&frame.search, &self.disengaged, &self.config.scales);
        let engaged_score = MatchResult::score_of(engaged.as_ref());
        let disengaged_score = MatchResult::score_of(disengaged.as_ref());

        let state = resolve_rod_state(
            engaged_score,
            disengaged_score,
            self.config.rod_engaged_threshold,
            self.config.rod_disengaged_threshold,
        );
        let location = match state {
            RodState::Disengaged => disengaged.map(|m| m.center()),
            RodState::Engaged => engaged.map(|m| m.center()),
            RodState::Indeterminate => None,
        };

        log::debug!(
            "Rod state {:?} (engaged={:.3} disengaged={:.3})",
            state,
            engaged_score,
            disengaged_score
        );
        RodReading {
            state,
            engaged_score,
            disengaged_score,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disengaged_wins_ties_and_higher_engaged() {
        assert_eq!(resolve_rod_state(0.95, 0.55, 0.5, 0.5), RodState::Disengaged);
        assert_eq!(resolve_rod_state(0.6, 0.6, 0.5, 0.5), RodState::Disengaged);
    }

    #[test]
    fn test_engaged_when_only_engaged_passes() {
        assert_eq!(resolve_rod_state(0.8, 0.3, 0.5, 0.5), RodState::Engaged);
    }

    #[test]
    fn test_indeterminate_is_never_guessed() {
        assert_eq!(resolve_rod_state(0.49, 0.49, 0.5, 0.5), RodState::Indeterminate);
        assert_eq!(resolve_rod_state(-1.0, -1.0, 0.5, 0.5), RodState::Indeterminate);
    }
}
