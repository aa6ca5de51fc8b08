// Types and enums for the fishing automation loop
use super::match_image::{DetectionMethod, RodState};
use super::minigame::{ActionDecision, ControllerProfile};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Idle,
    EquippingRod,
    Casting,
    WaitingForBite,
    Reeling,
    Paused,
}

#[derive(Debug, Clone)]
pub enum AutomationCommand {
    Start,
    Pause,
    Resume,
    Stop,
    SetProfile(ControllerProfile),
    Shutdown,
}

/// Why a cycle produced no action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    Capture(String),
    Input(String),
    RodIndeterminate,
    MinigameNotVisible { misses: u32 },
}

#[derive(Debug, Clone)]
pub enum AutomationEvent {
    StateChanged(GameState),
    Decision(ActionDecision),
    Notification {
        method: Option<DetectionMethod>,
        confidence: f32,
        hazard: bool,
    },
    RodState(RodState),
    CycleSkipped(SkipReason),
    Error(String),
}
