// Input driver that logs and records instead of touching the OS
use super::types::{InputDriver, Point};
use crate::error::InputError;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum InputEvent {
    Press,
    Release,
    Move(Point),
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordedInput {
    pub event: InputEvent,
    /// Seconds since the driver was created
    pub at: f64,
}

#[derive(Debug, Default)]
struct LogState {
    events: Vec<RecordedInput>,
    held: bool,
    position: Option<Point>,
}

/// Shared view of what a [`DryRunInput`] has done; stays readable after the
/// driver has been moved into the control loop.
#[derive(Debug, Clone, Default)]
pub struct InputLog {
    inner: Arc<Mutex<LogState>>,
}

impl InputLog {
    fn lock(&self) -> MutexGuard<'_, LogState> {
        // A poisoned log is still a valid log
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.lock().events.iter().map(|r| r.event).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedInput> {
        self.lock().events.clone()
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    pub fn position(&self) -> Option<Point> {
        self.lock().position
    }

    pub fn count(&self, event: InputEvent) -> usize {
        self.lock().events.iter().filter(|r| r.event == event).count()
    }
}

pub struct DryRunInput {
    log: InputLog,
    started: Instant,
    reject_presses: bool,
}

impl DryRunInput {
    pub fn new() -> Self {
        Self {
            log: InputLog::default(),
            started: Instant::now(),
            reject_presses: false,
        }
    }

    /// Every `press` fails, for exercising the skip path
    pub fn rejecting_presses(mut self) -> Self {
        self.reject_presses = true;
        self
    }

    pub fn log(&self) -> InputLog {
        self.log.clone()
    }

    fn record(&self, event: InputEvent) {
        let at = self.started.elapsed().as_secs_f64();
        let mut state = self.log.lock();
        match event {
            InputEvent::Press => state.held = true,
            InputEvent::Release => state.held = false,
            InputEvent::Move(point) => state.position = Some(point),
        }
        state.events.push(RecordedInput { event, at });
        log::trace!("Dry-run input {:?} at {:.3}s", event, at);
    }
}

impl Default for DryRunInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDriver for DryRunInput {
    fn press(&mut self) -> Result<(), InputError> {
        if self.reject_presses {
            return Err(InputError::Rejected {
                op: "press",
                reason: "dry-run driver configured to reject presses".to_string(),
            });
        }
        self.record(InputEvent::Press);
        Ok(())
    }

    fn release(&mut self) -> Result<(), InputError> {
        self.record(InputEvent::Release);
        Ok(())
    }

    fn move_to(&mut self, point: Point) -> Result<(), InputError> {
        self.record(InputEvent::Move(point));
        Ok(())
    }
}
