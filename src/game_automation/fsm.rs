// Finite state machine driving the fishing cycle
use super::executor::ActionExecutor;
use super::match_image::region::{ACTION_POINT, BITE_ALERT, MINIGAME_BAR, ROD_SLOT};
use super::match_image::{DetectionRegion, DetectorSet, RegionImage, RodState};
use super::minigame::{ControllerConfig, ControllerProfile, MinigameController, MinigameState};
use super::types::{AutomationCommand, AutomationEvent, GameState, SkipReason};
use crate::backend::{CaptureProvider, InputDriver, Point};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::time::{Duration, Instant, sleep};

/// Timing knobs of the fishing cycle
#[derive(Debug, Clone)]
pub struct AutomationSettings {
    /// How long the cast button is held
    pub cast_hold_secs: f64,
    /// Give up waiting for a bite and recast after this long
    pub bite_timeout: Duration,
    pub bite_poll_interval: Duration,
    /// Wait after clicking the rod slot before checking again
    pub equip_settle: Duration,
    /// Reeling ends after this many cycles without a visible minigame
    pub max_bar_misses: u32,
    /// Sleep while idle, paused or after a skipped cycle
    pub idle_poll: Duration,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            cast_hold_secs: 0.894,
            bite_timeout: Duration::from_secs(30),
            bite_poll_interval: Duration::from_millis(100),
            equip_settle: Duration::from_millis(500),
            max_bar_misses: 3,
            idle_poll: Duration::from_millis(100),
        }
    }
}

/// Reeling-phase memory, reset on every new bite
#[derive(Debug, Default)]
struct ReelTracker {
    last_target: Option<f64>,
    misses: u32,
    last_decision: Option<Instant>,
}

pub struct GameAutomation<C: CaptureProvider, I: InputDriver> {
    state: GameState,
    paused_from: Option<GameState>,
    capture: C,
    executor: ActionExecutor<I>,
    detectors: DetectorSet,
    controller: MinigameController,
    settings: AutomationSettings,
    command_rx: mpsc::Receiver<AutomationCommand>,
    event_tx: mpsc::Sender<AutomationEvent>,
    is_running: bool,
    should_exit: bool,
    bite_started: Option<Instant>,
    reel: ReelTracker,
}

impl<C: CaptureProvider, I: InputDriver> GameAutomation<C, I> {
    pub fn new(
        capture: C,
        input: I,
        detectors: DetectorSet,
        controller: MinigameController,
        command_rx: mpsc::Receiver<AutomationCommand>,
        event_tx: mpsc::Sender<AutomationEvent>,
    ) -> Self {
        Self {
            state: GameState::Idle,
            paused_from: None,
            capture,
            executor: ActionExecutor::new(input),
            detectors,
            controller,
            settings: AutomationSettings::default(),
            command_rx,
            event_tx,
            is_running: false,
            should_exit: false,
            bite_started: None,
            reel: ReelTracker::default(),
        }
    }

    pub fn with_settings(mut self, settings: AutomationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn controller(&self) -> &MinigameController {
        &self.controller
    }

    /// Events are dropped rather than stalling the loop when nobody listens
    fn emit(&self, event: AutomationEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(event)) => {
                log::debug!("Event channel full, dropping {:?}", event);
            }
        }
    }

    fn change_state(&mut self, new_state: GameState) {
        if self.state != new_state {
            log::info!("🎮 Automation state: {:?} -> {:?}", self.state, new_state);
            self.state = new_state;
            match new_state {
                GameState::WaitingForBite => self.bite_started = Some(Instant::now()),
                GameState::Reeling => self.reel = ReelTracker::default(),
                _ => {}
            }
            self.emit(AutomationEvent::StateChanged(new_state));
        }
    }

    async fn skip_cycle(&mut self, reason: SkipReason) {
        log::warn!("Cycle skipped: {:?}", reason);
        self.emit(AutomationEvent::CycleSkipped(reason));
        sleep(self.settings.idle_poll).await;
    }

    fn release_input(&mut self) {
        if let Err(e) = self.executor.release_all() {
            log::error!("Failed to release input: {}", e);
            self.emit(AutomationEvent::Error(e.to_string()));
        }
    }

    fn process_command(&mut self, command: AutomationCommand) {
        log::debug!("Processing automation command: {:?}", command);
        match command {
            AutomationCommand::Start => {
                if !self.is_running {
                    self.is_running = true;
                    self.change_state(GameState::EquippingRod);
                    log::info!("🚀 Automation started ({} profile)", self.controller.config().profile);
                } else {
                    log::debug!("Automation already running, ignoring start command");
                }
            }
            AutomationCommand::Pause => {
                if self.is_running && self.state != GameState::Paused {
                    self.paused_from = Some(self.state);
                    self.release_input();
                    self.change_state(GameState::Paused);
                    log::info!("⏸️ Automation paused");
                }
            }
            AutomationCommand::Resume => {
                if self.is_running && self.state == GameState::Paused {
                    let resume_to = self.paused_from.take().unwrap_or(GameState::EquippingRod);
                    self.change_state(resume_to);
                    log::info!("▶️ Automation resumed");
                }
            }
            AutomationCommand::Stop => {
                self.is_running = false;
                self.paused_from = None;
                self.release_input();
                self.change_state(GameState::Idle);
                log::info!("⏹️ Automation stopped");
            }
            AutomationCommand::SetProfile(profile) => self.set_profile(profile),
            AutomationCommand::Shutdown => {
                self.should_exit = true;
                self.is_running = false;
                self.release_input();
                self.change_state(GameState::Idle);
                log::info!("🛑 Automation shutting down");
            }
        }
    }

    /// Swap profile constants, keeping the rod stat and calibration
    fn set_profile(&mut self, profile: ControllerProfile) {
        let current = self.controller.config();
        let config = ControllerConfig {
            control: current.control,
            pixel_scaling: current.pixel_scaling,
            ..ControllerConfig::for_profile(profile)
        };
        self.controller.set_config(config);
        log::info!("🔧 Controller profile set to {}", profile);
    }

    /// Drain pending commands; only called between cycles
    fn drain_commands(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(command) => self.process_command(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.should_exit {
                        log::info!("Command channel closed, shutting down");
                        self.process_command(AutomationCommand::Shutdown);
                    }
                    break;
                }
            }
        }
    }

    pub async fn run(&mut self) {
        log::debug!("🎮 Automation loop started");

        loop {
            self.drain_commands();
            if self.should_exit {
                break;
            }
            self.step().await;
        }

        self.release_input();
        log::debug!("🎮 Automation loop ended");
    }

    /// One cycle of the current state
    pub async fn step(&mut self) {
        match self.state {
            GameState::Idle | GameState::Paused => sleep(self.settings.idle_poll).await,
            GameState::EquippingRod => self.equip_rod().await,
            GameState::Casting => self.cast().await,
            GameState::WaitingForBite => self.wait_for_bite().await,
            GameState::Reeling => self.reel().await,
        }
    }

    async fn capture_region(&mut self, name: &str) -> Option<(DetectionRegion, RegionImage)> {
        let region = self.detectors.regions().resolve_region(name);
        match self.capture.capture(&region).await {
            Ok(rgb) => Some((region, RegionImage::new(rgb))),
            Err(e) => {
                self.skip_cycle(SkipReason::Capture(e.to_string())).await;
                None
            }
        }
    }

    fn action_point(&self) -> Point {
        self.detectors.regions().resolve_region(ACTION_POINT).center().into()
    }

    async fn equip_rod(&mut self) {
        let Some((region, frame)) = self.capture_region(ROD_SLOT).await else {
            return;
        };
        let reading = self.detectors.rod_state(&frame);
        self.emit(AutomationEvent::RodState(reading.state));

        match reading.state {
            RodState::Engaged => self.change_state(GameState::Casting),
            RodState::Disengaged => {
                let target = reading
                    .location
                    .map(|local| region.to_screen(local))
                    .unwrap_or_else(|| region.center());
                log::info!("🎣 Equipping rod at {:?}", target);
                if let Err(e) = self.executor.click(target.into()) {
                    self.skip_cycle(SkipReason::Input(e.to_string())).await;
                    return;
                }
                sleep(self.settings.equip_settle).await;
            }
            RodState::Indeterminate => self.skip_cycle(SkipReason::RodIndeterminate).await,
        }
    }

    async fn cast(&mut self) {
        let point = self.action_point();
        let result = match self.executor.move_to(point) {
            Ok(()) => self.executor.hold_for(self.settings.cast_hold_secs).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                log::info!("🎣 Cast ({:.3}s hold)", self.settings.cast_hold_secs);
                self.change_state(GameState::WaitingForBite);
            }
            Err(e) => self.skip_cycle(SkipReason::Input(e.to_string())).await,
        }
    }

    async fn wait_for_bite(&mut self) {
        let started = *self.bite_started.get_or_insert_with(Instant::now);
        if started.elapsed() >= self.settings.bite_timeout {
            log::warn!(
                "No bite within {}s, recasting",
                self.settings.bite_timeout.as_secs_f64()
            );
            self.change_state(GameState::EquippingRod);
            return;
        }

        let Some((_, frame)) = self.capture_region(BITE_ALERT).await else {
            return;
        };
        let detection = self.detectors.detect_notification(&frame);
        if !detection.found {
            sleep(self.settings.bite_poll_interval).await;
            return;
        }

        self.emit(AutomationEvent::Notification {
            method: detection.method,
            confidence: detection.confidence,
            hazard: detection.hazard,
        });
        let point = self.action_point();
        match self.executor.click(point) {
            Ok(()) => self.change_state(GameState::Reeling),
            Err(e) => self.skip_cycle(SkipReason::Input(e.to_string())).await,
        }
    }

    async fn reel(&mut self) {
        let Some((_, frame)) = self.capture_region(MINIGAME_BAR).await else {
            return;
        };
        let reading = self.detectors.analyze_bar(&frame);

        if !reading.is_active() {
            self.reel.misses += 1;
            let misses = self.reel.misses;
            if misses >= self.settings.max_bar_misses {
                log::info!("🐟 Minigame over after {} empty cycles", misses);
                self.change_state(GameState::EquippingRod);
            } else {
                self.skip_cycle(SkipReason::MinigameNotVisible { misses }).await;
            }
            return;
        }
        self.reel.misses = 0;

        if let Some(target) = &reading.target {
            self.reel.last_target = Some(target.position as f64);
        }
        let indicator = reading.indicator.as_ref().map(|l| l.position as f64);
        let mut state = MinigameState::new(indicator, self.reel.last_target, indicator.is_some());
        let now = Instant::now();
        if let Some(previous) = self.reel.last_decision.replace(now) {
            state = state.with_dt_hint(now.duration_since(previous).as_secs_f64());
        }

        let decision = self.controller.decide_state(&state);
        self.emit(AutomationEvent::Decision(decision.clone()));
        if let Err(e) = self.executor.execute(&decision).await {
            self.skip_cycle(SkipReason::Input(e.to_string())).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DryRunInput, InputEvent, InputLog, ReplayCapture};
    use crate::game_automation::channels::create_automation_channels;
    use crate::game_automation::match_image::{DetectionConfig, RegionManager, TemplateStore, names};
    use crate::game_automation::minigame::ActionClass;
    use crate::template_matching::Template;
    use image::{Rgb, RgbImage, imageops};

    const BACKGROUND: [u8; 3] = [20, 60, 90];

    fn noise_glyph(seed: u32, w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let mut v = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663) ^ seed.wrapping_mul(83_492_791);
            v ^= v >> 13;
            v = v.wrapping_mul(0x5bd1_e995);
            v ^= v >> 15;
            let c = (v % 200) as u8 + 40;
            Rgb([c, c / 3, 255 - c])
        })
    }

    fn screen() -> RgbImage {
        RgbImage::from_pixel(1920, 1080, Rgb(BACKGROUND))
    }

    fn paste(dst: &mut RgbImage, src: &RgbImage, x: u32, y: u32) {
        imageops::replace(dst, src, x as i64, y as i64);
    }

    fn block(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    fn detectors() -> DetectorSet {
        let store = TemplateStore::from_templates([
            Template::from_rgb(names::FISH_LEFT, noise_glyph(1, 16, 16)),
            Template::from_rgb(names::FISH_RIGHT, noise_glyph(2, 16, 16)),
            Template::from_rgb(names::ROD_ENGAGED, noise_glyph(3, 24, 24)),
            Template::from_rgb(names::ROD_DISENGAGED, noise_glyph(4, 24, 24)),
            Template::from_rgb(names::BITE_ALERT, noise_glyph(5, 20, 30)),
        ]);
        // Single scale keeps full-screen tests fast
        let config = DetectionConfig {
            scales: vec![1.0],
            glyph_scales: vec![1.0],
            ..DetectionConfig::default()
        };
        DetectorSet::new(&store, config, RegionManager::default()).unwrap()
    }

    fn fast_settings() -> AutomationSettings {
        AutomationSettings {
            cast_hold_secs: 0.02,
            bite_timeout: Duration::from_secs(30),
            bite_poll_interval: Duration::from_millis(5),
            equip_settle: Duration::from_millis(5),
            max_bar_misses: 3,
            idle_poll: Duration::from_millis(5),
        }
    }

    struct Harness {
        automation: GameAutomation<ReplayCapture, DryRunInput>,
        input: InputLog,
        cmd_tx: mpsc::Sender<AutomationCommand>,
        event_rx: mpsc::Receiver<AutomationEvent>,
    }

    fn harness(frames: Vec<RgbImage>, controller: ControllerConfig) -> Harness {
        let (cmd_tx, cmd_rx, event_tx, event_rx) = create_automation_channels();
        let input = DryRunInput::new();
        let log = input.log();
        let automation = GameAutomation::new(
            ReplayCapture::from_frames(frames).unwrap(),
            input,
            detectors(),
            MinigameController::new(controller),
            cmd_rx,
            event_tx,
        )
        .with_settings(fast_settings());
        Harness {
            automation,
            input: log,
            cmd_tx,
            event_rx,
        }
    }

    fn drain_events(rx: &mut mpsc::Receiver<AutomationEvent>) -> Vec<AutomationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Bar strip at the default minigame_bar region
    fn paste_bar(frame: &mut RgbImage, indicator_x: Option<u32>, target_x: Option<u32>) {
        let (left, top) = (498, 789);
        if let Some(x) = indicator_x {
            paste(frame, &block(10, 14, [250, 250, 250]), left + x, top + 10);
        }
        if let Some(x) = target_x {
            paste(frame, &block(12, 12, [91, 75, 67]), left + x, top + 10);
        }
    }

    #[tokio::test]
    async fn test_start_enters_equipping() {
        let mut h = harness(vec![screen()], ControllerConfig::ordinary());
        h.automation.process_command(AutomationCommand::Start);
        assert_eq!(h.automation.state(), GameState::EquippingRod);
        let events = drain_events(&mut h.event_rx);
        assert!(matches!(
            events.as_slice(),
            [AutomationEvent::StateChanged(GameState::EquippingRod)]
        ));
    }

    #[tokio::test]
    async fn test_disengaged_rod_clicks_slot_icon() {
        let mut frame = screen();
        paste(&mut frame, &noise_glyph(4, 24, 24), 725 + 40, 1004 + 20);
        let mut h = harness(vec![frame], ControllerConfig::ordinary());
        h.automation.change_state(GameState::EquippingRod);

        h.automation.step().await;

        assert_eq!(h.automation.state(), GameState::EquippingRod);
        let events = h.input.events();
        assert_eq!(
            events,
            vec![
                InputEvent::Move(Point::new(725 + 40 + 12, 1004 + 20 + 12)),
                InputEvent::Press,
                InputEvent::Release,
            ]
        );
    }

    #[tokio::test]
    async fn test_engaged_rod_casts_then_waits() {
        let mut frame = screen();
        paste(&mut frame, &noise_glyph(3, 24, 24), 725 + 100, 1004 + 20);
        let mut h = harness(vec![frame], ControllerConfig::ordinary());
        h.automation.change_state(GameState::EquippingRod);

        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::Casting);
        assert!(h.input.events().is_empty());

        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::WaitingForBite);
        let recorded = h.input.recorded();
        assert_eq!(recorded[0].event, InputEvent::Move(Point::new(960, 540)));
        assert_eq!(recorded[1].event, InputEvent::Press);
        assert_eq!(recorded[2].event, InputEvent::Release);
        assert!(recorded[2].at - recorded[1].at >= 0.02);
    }

    #[tokio::test]
    async fn test_indeterminate_rod_skips_cycle() {
        let mut h = harness(vec![screen()], ControllerConfig::ordinary());
        h.automation.change_state(GameState::EquippingRod);
        drain_events(&mut h.event_rx);

        h.automation.step().await;

        assert_eq!(h.automation.state(), GameState::EquippingRod);
        let events = drain_events(&mut h.event_rx);
        assert!(events.iter().any(|e| matches!(
            e,
            AutomationEvent::CycleSkipped(SkipReason::RodIndeterminate)
        )));
    }

    #[tokio::test]
    async fn test_bite_clicks_and_starts_reeling() {
        let mut frame = screen();
        paste(&mut frame, &noise_glyph(5, 20, 30), 900, 500);
        let mut h = harness(vec![frame], ControllerConfig::ordinary());
        h.automation.change_state(GameState::WaitingForBite);
        drain_events(&mut h.event_rx);

        h.automation.step().await;

        assert_eq!(h.automation.state(), GameState::Reeling);
        let events = drain_events(&mut h.event_rx);
        assert!(events.iter().any(|e| matches!(e, AutomationEvent::Notification { hazard: false, .. })));
        assert_eq!(h.input.count(InputEvent::Press), 1);
        assert_eq!(h.input.position(), Some(Point::new(960, 540)));
    }

    #[tokio::test]
    async fn test_no_bite_keeps_waiting_until_timeout() {
        let mut h = harness(vec![screen()], ControllerConfig::ordinary());
        h.automation.change_state(GameState::WaitingForBite);
        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::WaitingForBite);

        h.automation.settings.bite_timeout = Duration::ZERO;
        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::EquippingRod);
        assert!(h.input.events().is_empty());
    }

    #[tokio::test]
    async fn test_reeling_decides_and_remembers_target() {
        let mut with_target = screen();
        paste_bar(&mut with_target, Some(50), Some(600));
        let mut without_target = screen();
        paste_bar(&mut without_target, Some(50), None);

        let controller = ControllerConfig {
            side_delay: 0.01,
            ..ControllerConfig::ordinary()
        };
        let mut h = harness(vec![with_target, without_target], controller);
        h.automation.change_state(GameState::Reeling);
        drain_events(&mut h.event_rx);

        h.automation.step().await;
        let remembered = h.automation.reel.last_target.unwrap();
        assert!((remembered - 606.0 / 967.0).abs() < 0.01, "{remembered}");

        h.automation.step().await;
        assert_eq!(h.automation.reel.last_target, Some(remembered));
        assert_eq!(h.automation.state(), GameState::Reeling);

        let decisions: Vec<_> = drain_events(&mut h.event_rx)
            .into_iter()
            .filter_map(|e| match e {
                AutomationEvent::Decision(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(decisions.len(), 2);
        // Indicator sits left of the boundary
        assert!(decisions.iter().all(|d| d.action == ActionClass::BoundaryRight));
        assert!(!h.input.is_held());
        assert_eq!(h.input.count(InputEvent::Press), 2);
    }

    #[tokio::test]
    async fn test_reeling_ends_after_grace_period() {
        let mut h = harness(vec![screen()], ControllerConfig::ordinary());
        h.automation.change_state(GameState::Reeling);

        h.automation.step().await;
        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::Reeling);
        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::EquippingRod);
        assert!(h.input.events().is_empty());
    }

    #[tokio::test]
    async fn test_capture_failure_skips_cycle() {
        // Frame smaller than every default region
        let mut h = harness(vec![RgbImage::new(64, 64)], ControllerConfig::ordinary());
        h.automation.change_state(GameState::Reeling);
        drain_events(&mut h.event_rx);

        h.automation.step().await;

        assert_eq!(h.automation.state(), GameState::Reeling);
        assert_eq!(h.automation.reel.misses, 0);
        let events = drain_events(&mut h.event_rx);
        assert!(matches!(
            events.as_slice(),
            [AutomationEvent::CycleSkipped(SkipReason::Capture(_))]
        ));
    }

    #[tokio::test]
    async fn test_pause_resume_returns_to_previous_state() {
        let mut h = harness(vec![screen()], ControllerConfig::ordinary());
        h.automation.process_command(AutomationCommand::Start);
        h.automation.change_state(GameState::WaitingForBite);

        h.automation.process_command(AutomationCommand::Pause);
        assert_eq!(h.automation.state(), GameState::Paused);
        h.automation.step().await;
        assert_eq!(h.automation.state(), GameState::Paused);

        h.automation.process_command(AutomationCommand::Resume);
        assert_eq!(h.automation.state(), GameState::WaitingForBite);

        h.automation.process_command(AutomationCommand::Stop);
        assert_eq!(h.automation.state(), GameState::Idle);
    }

    #[tokio::test]
    async fn test_set_profile_keeps_calibration() {
        let config = ControllerConfig::ordinary()
            .with_control(0.2)
            .calibrated_for_width(1934);
        let mut h = harness(vec![screen()], config);
        h.automation
            .process_command(AutomationCommand::SetProfile(ControllerProfile::Alternate));

        let active = h.automation.controller().config();
        assert_eq!(active.profile, ControllerProfile::Alternate);
        assert_eq!(active.deadzone, 0.02);
        assert_eq!(active.control, 0.2);
        assert!((active.pixel_scaling - 2.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_run_loop_reels_then_shuts_down_released() {
        let mut frame = screen();
        paste(&mut frame, &noise_glyph(3, 24, 24), 725 + 100, 1004 + 20);
        paste(&mut frame, &noise_glyph(5, 20, 30), 900, 500);
        paste_bar(&mut frame, Some(50), Some(600));

        let controller = ControllerConfig {
            side_delay: 0.01,
            ..ControllerConfig::ordinary()
        };
        let Harness {
            mut automation,
            input,
            cmd_tx,
            mut event_rx,
        } = harness(vec![frame], controller);

        let driver = async move {
            cmd_tx.send(AutomationCommand::Start).await.unwrap();
            let mut states = Vec::new();
            let saw_decision = tokio::time::timeout(Duration::from_secs(30), async {
                while let Some(event) = event_rx.recv().await {
                    match event {
                        AutomationEvent::StateChanged(state) => states.push(state),
                        AutomationEvent::Decision(_) => return true,
                        _ => {}
                    }
                }
                false
            })
            .await
            .unwrap_or(false);
            cmd_tx.send(AutomationCommand::Shutdown).await.unwrap();
            (saw_decision, states)
        };

        let ((), (saw_decision, states)) = tokio::join!(automation.run(), driver);

        assert!(saw_decision);
        assert_eq!(
            states,
            vec![
                GameState::EquippingRod,
                GameState::Casting,
                GameState::WaitingForBite,
                GameState::Reeling,
            ]
        );
        assert_eq!(automation.state(), GameState::Idle);
        assert!(!input.is_held());
        assert_eq!(input.events().last(), Some(&InputEvent::Release));
    }
}
