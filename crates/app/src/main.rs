use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing::info;
use tracing_subscriber::EnvFilter;

use beast_core::model::Roster;
use beast_core::render::{Canvas, MAX_DEVICE_PIXEL_RATIO, SourceImage, Viewport};
use services::{
    AppServices, AssetProxy, AssetSource, GuessLoopService, RosterLoader, WikiConfig,
    fetch_image_route,
};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidDpr { raw: String },
    InvalidWikiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDpr { raw } => write!(
                f,
                "invalid --dpr value: {raw} (expected a number above 0 and at most {MAX_DEVICE_PIXEL_RATIO})"
            ),
            ArgsError::InvalidWikiUrl { raw } => write!(f, "invalid --wiki value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_dpr(raw: &str) -> Result<f64, ArgsError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= MAX_DEVICE_PIXEL_RATIO => Ok(value),
        _ => Err(ArgsError::InvalidDpr { raw: raw.to_string() }),
    }
}

struct DesktopApp {
    roster: Arc<Roster>,
    guess_loop: Arc<GuessLoopService>,
}

impl UiApp for DesktopApp {
    fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    fn guess_loop(&self) -> Arc<GuessLoopService> {
        Arc::clone(&self.guess_loop)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--wiki <url>] [--page <name>]");
    eprintln!("  cargo run -p app -- roster [--wiki <url>] [--page <name>]");
    eprintln!("  cargo run -p app -- render --path <image_path> --out <file.png> [--hidden] [--dpr <ratio>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --wiki https://wiki.cassettebeasts.com");
    eprintln!("  --page Species");
    eprintln!("  --dpr  1.0");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BEAST_WIKI_URL, BEAST_SPECIES_PAGE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Roster,
    Render,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "roster" => Some(Self::Roster),
            "render" => Some(Self::Render),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RenderArgs {
    path: Option<String>,
    out: Option<PathBuf>,
    hidden: bool,
    dpr: Option<f64>,
}

struct Args {
    config: WikiConfig,
    render: RenderArgs,
}

impl Args {
    fn parse(
        command: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = WikiConfig::from_env()?;
        let mut render = RenderArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wiki" => {
                    let value = require_value(args, "--wiki")?;
                    config = WikiConfig::new(&value, config.species_page.clone())
                        .map_err(|_| ArgsError::InvalidWikiUrl { raw: value.clone() })?;
                }
                "--page" => {
                    config.species_page = require_value(args, "--page")?;
                }
                "--path" if command == Command::Render => {
                    render.path = Some(require_value(args, "--path")?);
                }
                "--out" if command == Command::Render => {
                    render.out = Some(PathBuf::from(require_value(args, "--out")?));
                }
                "--hidden" if command == Command::Render => {
                    render.hidden = true;
                }
                "--dpr" if command == Command::Render => {
                    let value = require_value(args, "--dpr")?;
                    render.dpr = Some(parse_dpr(&value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg).into()),
            }
        }

        Ok(Self { config, render })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing();

    match cmd {
        Command::Ui => {
            let services = AppServices::from_wiki(parsed.config).await?;
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                roster: services.roster(),
                guess_loop: services.guess_loop(),
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Who's that Cassette Beast?")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Roster => {
            let roster = RosterLoader::new(parsed.config).load().await?;
            for entry in roster.entries() {
                println!("{}\t{}", entry.name(), entry.image_path());
            }
            Ok(())
        }
        Command::Render => {
            let RenderArgs {
                path,
                out,
                hidden,
                dpr,
            } = parsed.render;
            let path = path.ok_or(ArgsError::MissingFlag { flag: "--path" })?;
            let out = out.ok_or(ArgsError::MissingFlag { flag: "--out" })?;

            let proxy = AssetProxy::new(parsed.config);
            let bytes = proxy.fetch(&fetch_image_route(&path)).await?;
            let image = SourceImage::decode(&bytes)?;

            let mut canvas = Canvas::new(Viewport::default());
            canvas.mount(dpr.unwrap_or(1.0));
            canvas.draw(&image, hidden);
            std::fs::write(&out, canvas.encode_png()?)?;
            info!(
                path = %path,
                out = %out.display(),
                width = image.natural_width(),
                height = image.natural_height(),
                "frame written"
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
