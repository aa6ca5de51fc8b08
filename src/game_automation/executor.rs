// Action executor: turns controller decisions into timed press/release calls
use crate::backend::{InputDriver, Point};
use crate::error::InputError;
use crate::game_automation::minigame::{ActionDecision, Pulse, TAP_PRESS_SECS};
use tokio::time::{Duration, Instant, sleep};

/// Longest single wait accepted from a pulse
const MAX_PULSE_SECS: f64 = 10.0;

/// Pulse seconds to a sleep duration; non-finite or negative becomes zero
fn pulse_duration(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds.min(MAX_PULSE_SECS))
    } else {
        Duration::ZERO
    }
}

/// The only path from the control loop to the input driver.
///
/// Tracks whether the primary button is held so it can always be let go:
/// after every decision, on [`ActionExecutor::release_all`] and on drop.
pub struct ActionExecutor<I: InputDriver> {
    driver: I,
    held: bool,
}

impl<I: InputDriver> ActionExecutor<I> {
    pub fn new(driver: I) -> Self {
        Self {
            driver,
            held: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    fn press(&mut self) -> Result<(), InputError> {
        if !self.held {
            self.driver.press()?;
            self.held = true;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), InputError> {
        if self.held {
            self.driver.release()?;
            self.held = false;
        }
        Ok(())
    }

    /// Let go of anything still held
    pub fn release_all(&mut self) -> Result<(), InputError> {
        if self.held {
            log::debug!("Releasing held input");
        }
        self.release()
    }

    pub fn click(&mut self, point: Point) -> Result<(), InputError> {
        self.release()?;
        self.driver.move_to(point)?;
        self.press()?;
        self.release()
    }

    pub fn move_to(&mut self, point: Point) -> Result<(), InputError> {
        self.driver.move_to(point)
    }

    /// Press, wait, release (used for casting)
    pub async fn hold_for(&mut self, seconds: f64) -> Result<(), InputError> {
        self.press()?;
        sleep(pulse_duration(seconds)).await;
        self.release()
    }

    async fn run_pulse(&mut self, pulse: Pulse) -> Result<(), InputError> {
        match pulse {
            Pulse::Hold(seconds) => {
                self.press()?;
                sleep(pulse_duration(seconds)).await;
            }
            Pulse::Release(seconds) => {
                self.release()?;
                sleep(pulse_duration(seconds)).await;
            }
            Pulse::Tap { period } => {
                let started = Instant::now();
                self.press()?;
                sleep(pulse_duration(TAP_PRESS_SECS)).await;
                self.release()?;
                let remaining = pulse_duration(period).saturating_sub(started.elapsed());
                sleep(remaining).await;
            }
        }
        Ok(())
    }

    /// Play every pulse of `decision` in order and end released.
    ///
    /// On a driver failure the remaining pulses are dropped and input is
    /// released before the error is returned.
    pub async fn execute(&mut self, decision: &ActionDecision) -> Result<Duration, InputError> {
        let started = Instant::now();
        for pulse in &decision.pulses {
            if let Err(e) = self.run_pulse(*pulse).await {
                if let Err(release_err) = self.release_all() {
                    log::warn!("Release after failed pulse also failed: {}", release_err);
                }
                return Err(e);
            }
        }
        self.release()?;
        let elapsed = started.elapsed();
        log::trace!(
            "Executed {} in {:.3}s (planned {:.3}s)",
            decision.action,
            elapsed.as_secs_f64(),
            decision.total_seconds()
        );
        Ok(elapsed)
    }
}

impl<I: InputDriver> Drop for ActionExecutor<I> {
    fn drop(&mut self) {
        if let Err(e) = self.release_all() {
            log::error!("Failed to release held input on teardown: {}", e);
        }
    }
}
