//! Controller inputs and decisions

use serde::Serialize;
use std::fmt;

/// Press time of a single stabilize tap, in seconds
pub const TAP_PRESS_SECS: f64 = 0.01;

/// Clamp to [0, 1]; NaN becomes the bar center.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.5;
    }
    value.clamp(0.0, 1.0)
}

/// Positions fed to the controller for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinigameState {
    pub indicator: f64,
    pub target: f64,
    pub stable: bool,
    /// Seconds since the previous decision, if known
    pub dt_hint: Option<f64>,
}

impl MinigameState {
    /// Missing positions default to the bar center; present ones are clamped.
    pub fn new(indicator: Option<f64>, target: Option<f64>, stable: bool) -> Self {
        Self {
            indicator: indicator.map_or(0.5, clamp01),
            target: target.map_or(0.5, clamp01),
            stable,
            dt_hint: None,
        }
    }

    pub fn with_dt_hint(mut self, dt: f64) -> Self {
        self.dt_hint = Some(dt);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionClass {
    Stabilize,
    StableLeft,
    StableRight,
    BoundaryLeft,
    BoundaryRight,
    UnstableLeft,
    UnstableRight,
}

impl ActionClass {
    /// Numeric id used in telemetry
    pub fn type_id(self) -> u8 {
        match self {
            ActionClass::Stabilize => 0,
            ActionClass::StableLeft => 1,
            ActionClass::StableRight => 2,
            ActionClass::BoundaryLeft => 3,
            ActionClass::BoundaryRight => 4,
            ActionClass::UnstableLeft => 5,
            ActionClass::UnstableRight => 6,
        }
    }
}

impl fmt::Display for ActionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionClass::Stabilize => "stabilize",
            ActionClass::StableLeft => "stable_left",
            ActionClass::StableRight => "stable_right",
            ActionClass::BoundaryLeft => "boundary_left",
            ActionClass::BoundaryRight => "boundary_right",
            ActionClass::UnstableLeft => "unstable_left",
            ActionClass::UnstableRight => "unstable_right",
        };
        write!(f, "{name}")
    }
}

/// One timed input step. Holding input moves the indicator right, releasing
/// lets it drift left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Pulse {
    Hold(f64),
    Release(f64),
    /// Short press then release for the rest of `period`
    Tap { period: f64 },
}

impl Pulse {
    pub fn seconds(&self) -> f64 {
        match *self {
            Pulse::Hold(s) | Pulse::Release(s) => s,
            Pulse::Tap { period } => period,
        }
    }
}

/// What the controller wants done this cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDecision {
    pub action: ActionClass,
    pub intensity: f64,
    /// Primary pulse followed by the optional counter-strafe
    pub pulses: Vec<Pulse>,
    pub note: String,
}

impl ActionDecision {
    pub fn action_type(&self) -> u8 {
        self.action.type_id()
    }

    /// Length of the primary pulse
    pub fn duration(&self) -> f64 {
        self.pulses.first().map_or(0.0, Pulse::seconds)
    }

    pub fn counter_strafe(&self) -> Option<f64> {
        self.pulses.get(1).map(Pulse::seconds)
    }

    /// Sum of all pulse lengths
    pub fn total_seconds(&self) -> f64 {
        self.pulses.iter().map(Pulse::seconds).sum()
    }
}

impl fmt::Display for ActionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Action {} {} intensity={:.3} duration={:.3}s",
            self.action_type(),
            self.action,
            self.intensity,
            self.duration()
        )?;
        if let Some(cs) = self.counter_strafe() {
            write!(f, " counter={:.3}s", cs)?;
        }
        write!(f, " ({})", self.note)
    }
}
