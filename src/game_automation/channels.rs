// Communication channels for the automation loop
use super::types::{AutomationCommand, AutomationEvent};
use tokio::sync::mpsc;

/// Bounded capacity of both channels
pub const CHANNEL_CAPACITY: usize = 32;

/// Helper function to create automation channels
pub fn create_automation_channels() -> (
    mpsc::Sender<AutomationCommand>,
    mpsc::Receiver<AutomationCommand>,
    mpsc::Sender<AutomationEvent>,
    mpsc::Receiver<AutomationEvent>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
    (cmd_tx, cmd_rx, event_tx, event_rx)
}
