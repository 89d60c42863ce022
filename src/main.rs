//! Binary entrypoint: runs a slideshow against the in-memory stage.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use humantime::format_duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use slideshow::config::SlideshowConfig;
use slideshow::events::{AnimationDone, Command, Interaction, SlideChanged};
use slideshow::headless::MemoryStage;
use slideshow::scheduler::ManualTimers;
use slideshow::tasks::driver::{self, IntervalTimers};
use slideshow::{Registry, Slideshow, SlideshowOptions};

#[derive(Debug, Parser)]
#[command(
    name = "slideshow",
    version,
    about = "Slideshow transition engine on a headless stage"
)]
struct Cli {
    /// Path to YAML config; built-in defaults when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Slides in the primary track
    #[arg(long, default_value_t = 5)]
    slides: usize,

    /// Slides in the secondary track (0 = no secondary track)
    #[arg(long, default_value_t = 0)]
    secondary: usize,

    /// Navigator indicators (0 = no navigator)
    #[arg(long, default_value_t = 0)]
    indicators: usize,

    /// Simulate this many auto-advance ticks without real timers and exit
    #[arg(long = "dry-run", value_name = "TICKS")]
    dry_run: Option<usize>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("slideshow={level}")
            .parse()
            .context("building log filter")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn build_stage(options: &SlideshowOptions, cli: &Cli) -> MemoryStage {
    let mut stage = MemoryStage::new();
    stage.add_track(options.slides.clone(), cli.slides);
    if cli.secondary > 0 {
        stage.add_track(options.secondary_slides.clone(), cli.secondary);
    }
    if cli.indicators > 0 {
        stage.add_track(options.navigator.clone(), cli.indicators);
    }
    stage
}

fn run_dry(cfg: &SlideshowConfig, stage: MemoryStage, ticks: usize) -> Result<()> {
    let options = cfg.to_options();
    let mut show = Slideshow::initialize(stage, ManualTimers::new(), &options, &Registry::default())
        .context("initializing slideshow")?;
    show.start();
    let Some(timer) = show.timer() else {
        return Ok(());
    };

    println!("start: counter {}\n{}", show.counter(), show.stage().describe(&options.current_class));
    for tick in 1..=ticks {
        let nav = show.on_timer(timer);
        let done = show.stage_mut().advance(cfg.speed());
        for id in done {
            show.complete(id);
        }
        println!(
            "tick {tick}: {nav:?} -> counter {}\n{}",
            show.counter(),
            show.stage().describe(&options.current_class)
        );
    }
    show.destroy();
    Ok(())
}

fn parse_command(line: &str) -> Option<Command> {
    let cmd = match line.trim() {
        "n" | "next" => Command::Interact(Interaction::Next),
        "p" | "prev" => Command::Interact(Interaction::Prev),
        "swipe-left" => Command::Interact(Interaction::SwipeLeft),
        "swipe-right" => Command::Interact(Interaction::SwipeRight),
        "start" => Command::Start,
        "stop" => Command::Stop,
        other => Command::Interact(Interaction::Jump(other.parse().ok()?)),
    };
    Some(cmd)
}

/// Forwards input lines to the driver from a dedicated thread. `q` or end of
/// input cancels the whole run.
fn spawn_stdin_reader<R>(
    input: R,
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            if cancel.is_cancelled() {
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("reading stdin: {err}");
                    break;
                }
            };
            if line.trim() == "q" {
                cancel.cancel();
                return;
            }
            match parse_command(&line) {
                Some(cmd) => {
                    if commands.blocking_send(cmd).is_err() {
                        return;
                    }
                }
                None => warn!(input = line.trim(), "unrecognized command"),
            }
        }
        info!("stdin closed; initiating shutdown");
        cancel.cancel();
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = match &cli.config {
        Some(path) => SlideshowConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SlideshowConfig::default(),
    }
    .validated()
    .context("validating configuration")?;
    info!(
        style = %cfg.style,
        interval = %format_duration(cfg.duration()),
        speed = %format_duration(cfg.speed()),
        next = %cfg.next_button(),
        prev = %cfg.prev_button(),
        "configuration loaded"
    );

    let options = cfg.to_options();
    if let Some(ticks) = cli.dry_run {
        return run_dry(&cfg, build_stage(&options, &cli), ticks);
    }

    let (done_tx, done_rx) = mpsc::unbounded_channel::<AnimationDone>(); // Stage -> Driver
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(16); // Stdin -> Driver
    let (change_tx, mut change_rx) = mpsc::channel::<SlideChanged>(16); // Driver -> Log

    let stage = build_stage(&options, &cli).with_notifier(done_tx);
    let show = Slideshow::initialize(stage, IntervalTimers::new(), &options, &Registry::default())
        .context("initializing slideshow")?;

    let cancel = CancellationToken::new();
    let mut tasks: JoinSet<Result<()>> = JoinSet::new();

    {
        let cancel = cancel.clone();
        let autoplay = cfg.autoplay;
        tasks.spawn(async move {
            driver::run(show, autoplay, cmd_rx, done_rx, change_tx, cancel)
                .await
                .map(|_| ())
        });
    }

    tasks.spawn(async move {
        while let Some(SlideChanged { from, to }) = change_rx.recv().await {
            info!(from, to, "slide changed");
        }
        Ok(())
    });

    // Not joined: a read still blocked at shutdown must not hold the process.
    spawn_stdin_reader(BufReader::new(io::stdin()), cmd_tx, cancel.clone());

    {
        let cancel = cancel.clone();
        tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                res = tokio::signal::ctrl_c() => {
                    res.context("installing Ctrl-C handler")?;
                    info!("Ctrl-C received; initiating shutdown");
                    cancel.cancel();
                }
            }
            Ok(())
        });
    }

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("task failed: {err:?}");
                cancel.cancel();
            }
            Err(err) => {
                warn!("task panicked: {err}");
                cancel.cancel();
            }
        }
    }
    Ok(())
}
