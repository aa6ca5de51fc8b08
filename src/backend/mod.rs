// Backend module - screen capture and input primitives
// The control loop only sees the two traits in `types`; replay capture and
// dry-run input let it run offline against recorded frames.

pub mod dry_run;
pub mod replay;
pub mod types;


// Re-export the main types for easy access
pub use dry_run::{DryRunInput, InputEvent, InputLog};
pub use replay::ReplayCapture;
pub use types::{CaptureProvider, InputDriver, Point};
