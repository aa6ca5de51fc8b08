mod args;

use args::Args;
use reel_assist::backend::{CaptureProvider, DryRunInput, ReplayCapture};
use reel_assist::error::{ReelError, ReelResult};
use reel_assist::game_automation::match_image::region::MINIGAME_BAR;
use reel_assist::game_automation::{
    AutomationCommand, AutomationEvent, ControllerConfig, DetectionConfig, DetectorSet, GameAutomation,
    MinigameController, RegionManager, TemplateStore, create_automation_channels,
};
use tokio::time::{Duration, sleep};

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(run(args)) {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}

fn controller_config(args: &Args, bar_width: u32) -> ReelResult<ControllerConfig> {
    let mut config = ControllerConfig::for_profile(args.profile).calibrated_for_width(bar_width);
    if let Some(path) = &args.config {
        config = config.overlay_file(path)?;
    }
    if let Some(control) = args.control {
        config = config.with_control(control);
    }
    config.validate()?;
    Ok(config)
}

fn log_event(event: AutomationEvent) {
    match event {
        AutomationEvent::StateChanged(state) => log::debug!("State -> {:?}", state),
        AutomationEvent::Decision(decision) => log::debug!("{}", decision),
        AutomationEvent::Notification {
            method,
            confidence,
            hazard,
        } => log::info!("🐟 Bite via {:?} ({:.3}, hazard={})", method, confidence, hazard),
        AutomationEvent::RodState(state) => log::debug!("Rod {:?}", state),
        AutomationEvent::CycleSkipped(reason) => log::debug!("Skipped: {:?}", reason),
        AutomationEvent::Error(e) => log::error!("❌ {}", e),
    }
}

async fn run(args: Args) -> ReelResult<()> {
    let store = TemplateStore::load_from_directory(&args.templates)?;

    let Some(frames) = args.frames.as_ref() else {
        return Err(ReelError::InvalidConfig {
            reason: "no capture source, pass --frames=DIR".to_string(),
        });
    };
    let capture = ReplayCapture::from_dir(frames)?;
    let (width, height) = capture.screen_size();
    let regions = RegionManager::new(width, height);
    let bar_width = regions.resolve_region(MINIGAME_BAR).width;

    let config = controller_config(&args, bar_width)?;
    log::info!(
        "🎣 Profile {} (control {:.2}, pixel scaling {:.3}), screen {}x{} from {}",
        config.profile,
        config.control,
        config.pixel_scaling,
        width,
        height,
        capture.name()
    );

    let detectors = DetectorSet::new(&store, DetectionConfig::default(), regions)?;
    let (cmd_tx, cmd_rx, event_tx, mut event_rx) = create_automation_channels();
    let mut automation = GameAutomation::new(
        capture,
        DryRunInput::new(),
        detectors,
        MinigameController::new(config),
        cmd_rx,
        event_tx,
    );

    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            log_event(event);
        }
    });

    cmd_tx
        .send(AutomationCommand::Start)
        .await
        .map_err(|_| ReelError::ChannelClosed)?;

    if let Some(secs) = args.timeout_secs {
        let tx = cmd_tx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(secs)).await;
            log::info!("⏱️ Timeout of {}s reached", secs);
            let _ = tx.send(AutomationCommand::Shutdown).await;
        });
    }

    automation.run().await;
    drop(automation);
    drop(cmd_tx);
    let _ = event_task.await;
    Ok(())
}
