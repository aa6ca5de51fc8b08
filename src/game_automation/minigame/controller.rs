//! Deadzone controller: position error in, timed corrective pulses out

use super::config::ControllerConfig;
use super::types::{ActionClass, ActionDecision, MinigameState, Pulse, clamp01};

/// Shortest unstable pulse, in seconds
const MIN_UNSTABLE_DURATION: f64 = 0.01;

/// Unstable duration cap for a given rod control stat.
///
/// Tiers: control >= 0.25, >= 0.20, >= 0.15, below.
pub fn unstable_max_duration(distance: f64, control: f64) -> f64 {
    let base = distance * 2.0;
    if control >= 0.25 {
        base * 0.75
    } else if control >= 0.2 {
        base * 0.8
    } else if control >= 0.15 {
        base * 0.88
    } else {
        base + distance * 0.2
    }
}

/// Stable-band pulse length for a normalized distance factor
fn stable_duration(distance_factor: f64) -> f64 {
    if distance_factor < 0.2 {
        0.15 + 0.15 * distance_factor
    } else {
        0.5 + 0.5 * distance_factor.powf(1.2)
    }
}

/// Primary move plus counter-strafe in the opposite direction
fn move_pulses(right: bool, duration: f64, counter: f64) -> Vec<Pulse> {
    if right {
        vec![Pulse::Hold(duration), Pulse::Release(counter)]
    } else {
        vec![Pulse::Release(duration), Pulse::Hold(counter)]
    }
}

/// Choose this cycle's action. Total over all inputs; never fails.
pub fn decide(state: &MinigameState, config: &ControllerConfig) -> ActionDecision {
    let indicator = clamp01(state.indicator);
    let target = clamp01(state.target);
    let direction = target - indicator;
    let distance = direction.abs();
    let distance_factor = distance / config.white_bar_half_width;

    // Boundaries take precedence over every deadzone band
    if indicator < config.max_left_bar {
        return ActionDecision {
            action: ActionClass::BoundaryRight,
            intensity: config.boundary_right_intensity,
            pulses: vec![Pulse::Hold(config.side_delay)],
            note: format!("indicator {indicator:.3} left of {:.3}", config.max_left_bar),
        };
    }
    if indicator > config.max_right_bar {
        return ActionDecision {
            action: ActionClass::BoundaryLeft,
            intensity: config.boundary_left_intensity,
            pulses: vec![Pulse::Release(config.side_delay)],
            note: format!("indicator {indicator:.3} right of {:.3}", config.max_right_bar),
        };
    }

    if distance <= config.deadzone {
        return ActionDecision {
            action: ActionClass::Stabilize,
            intensity: config.stabilize_intensity,
            pulses: vec![Pulse::Tap {
                period: config.stabilize_interval,
            }],
            note: format!("within deadzone ({distance:.3})"),
        };
    }

    // Zero error never reaches here; ties in sign go right
    let right = direction >= 0.0;

    if distance <= config.deadzone2 {
        let (multiplier, division, action) = if right {
            (
                config.stable_right_multiplier,
                config.stable_right_division,
                ActionClass::StableRight,
            )
        } else {
            (
                config.stable_left_multiplier,
                config.stable_left_division,
                ActionClass::StableLeft,
            )
        };
        let intensity = (distance * multiplier * config.pixel_scaling).min(config.max_intensity);
        let duration = stable_duration(distance_factor);
        return ActionDecision {
            action,
            intensity,
            pulses: move_pulses(right, duration, duration / division),
            note: format!("stable tracking, direction {direction:+.3}"),
        };
    }

    let (multiplier, division, action) = if right {
        (
            config.unstable_right_multiplier,
            config.unstable_right_division,
            ActionClass::UnstableRight,
        )
    } else {
        (
            config.unstable_left_multiplier,
            config.unstable_left_division,
            ActionClass::UnstableLeft,
        )
    };
    let raw = distance * multiplier * config.pixel_scaling;
    let max_duration = unstable_max_duration(distance, config.control);
    let duration = raw.min(max_duration).max(MIN_UNSTABLE_DURATION);
    ActionDecision {
        action,
        intensity: raw.min(1.0),
        pulses: move_pulses(right, duration, duration / division),
        note: format!("aggressive tracking, direction {direction:+.3}"),
    }
}

/// The controller bound to a swappable profile.
#[derive(Debug, Clone, Default)]
pub struct MinigameController {
    config: ControllerConfig,
}

impl MinigameController {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Swap the profile between decisions
    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    pub fn decide(
        &self,
        indicator: f64,
        target: f64,
        stable: bool,
        dt_hint: Option<f64>,
    ) -> ActionDecision {
        let mut state = MinigameState::new(Some(indicator), Some(target), stable);
        state.dt_hint = dt_hint;
        self.decide_state(&state)
    }

    pub fn decide_state(&self, state: &MinigameState) -> ActionDecision {
        let decision = decide(state, &self.config);
        log::debug!(
            "Indicator {:.3} target {:.3} -> {}",
            state.indicator,
            state.target,
            decision
        );
        decision
    }
}
