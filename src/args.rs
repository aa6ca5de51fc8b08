use reel_assist::game_automation::ControllerProfile;
use std::env;
use std::path::PathBuf;

const DEFAULT_TEMPLATE_DIR: &str = "templates";

#[derive(Debug)]
pub struct Args {
    pub templates: PathBuf,
    pub frames: Option<PathBuf>,
    pub profile: ControllerProfile,
    pub control: Option<f64>,
    pub config: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub debug_mode: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::parse_from(&args, |key| env::var(key).ok())
    }

    /// Flags win over `REEL_PROFILE` / `REEL_TEMPLATES`
    pub fn parse_from(args: &[String], env_var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let mut templates: Option<PathBuf> = None;
        let mut frames: Option<PathBuf> = None;
        let mut profile: Option<ControllerProfile> = None;
        let mut control: Option<f64> = None;
        let mut config: Option<PathBuf> = None;
        let mut timeout_secs: Option<u64> = None;
        let mut debug_mode = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Reel Assist v{}", env!("CARGO_PKG_VERSION"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--templates=") {
                templates = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--frames=") {
                frames = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--config=") {
                config = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--profile=") {
                match val.parse::<ControllerProfile>() {
                    Ok(p) => profile = Some(p),
                    Err(e) => {
                        eprintln!("❌ {}", e);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--control=") {
                match val.parse::<f64>() {
                    Ok(c) if c.is_finite() && c >= 0.0 => control = Some(c),
                    _ => {
                        eprintln!("❌ Invalid control value: {}", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                match val.parse::<u64>() {
                    Ok(secs) => timeout_secs = Some(secs),
                    Err(_) => {
                        eprintln!("❌ Invalid timeout value: {}", val);
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        let profile = match profile {
            Some(p) => p,
            None => match env_var("REEL_PROFILE") {
                Some(name) => match name.parse::<ControllerProfile>() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("❌ REEL_PROFILE: {}", e);
                        return None;
                    }
                },
                None => ControllerProfile::default(),
            },
        };
        let templates = templates
            .or_else(|| env_var("REEL_TEMPLATES").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));

        Some(Args {
            templates,
            frames,
            profile,
            control,
            config,
            timeout_secs,
            debug_mode,
        })
    }
}

fn print_help() {
    println!("🎣 Reel Assist - fishing minigame assistant");
    println!();
    println!("USAGE:");
    println!("    reel-assist --frames=DIR [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --templates=DIR     Template directory (default: templates, env REEL_TEMPLATES)");
    println!("    --frames=DIR        Replay recorded PNG/JPEG frames from DIR (input is dry-run)");
    println!("    --profile=NAME      Controller profile: ordinary | alternate (env REEL_PROFILE)");
    println!("    --control=F         Rod control stat, selects the pulse cap (default: 0)");
    println!("    --config=FILE       JSON file overriding controller fields");
    println!("    --debug             Enable debug logging (RUST_LOG takes precedence)");
    println!("    --timeout=N         Auto-exit after N seconds (for testing)");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    reel-assist --frames=recording/");
    println!("    reel-assist --frames=recording/ --profile=alternate --control=0.2");
    println!("    reel-assist --frames=recording/ --config=tuning.json --debug --timeout=60");
}
