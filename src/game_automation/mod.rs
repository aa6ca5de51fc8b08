// Game automation module
// Detection, the minigame controller and the state machine that runs the
// fishing cycle on top of a capture provider and an input driver.

pub mod channels;
pub mod executor;
pub mod fsm;
pub mod match_image;
pub mod minigame;
pub mod types;

// Re-export the main types and functions for easy access
pub use channels::create_automation_channels;
pub use executor::ActionExecutor;
pub use fsm::{AutomationSettings, GameAutomation};
pub use match_image::{DetectionConfig, DetectorSet, RegionManager, TemplateStore};
pub use minigame::{ActionDecision, ControllerConfig, ControllerProfile, MinigameController, decide};
pub use types::{AutomationCommand, AutomationEvent, GameState, SkipReason};
