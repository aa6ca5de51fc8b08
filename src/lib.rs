pub mod backend;
pub mod error;
pub mod game_automation;
pub mod template_matching;

pub use error::{CaptureError, InputError, ReelError, ReelResult};
pub use game_automation::{GameAutomation, decide};
pub use template_matching::match_multi_scale;
