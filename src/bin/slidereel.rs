use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use slidereel::{
    AudioSource, HeadlessAudioBackend, HeadlessSurface, HostTime, PlaybackEvent, PreviewConfig,
    PreviewEvent, PreviewSession, RenderEvent, RevealSchedule, ScaleFit, ScheduleWarning, Size,
    SlideScript, TimingMode, effective_stagger_ms, normalize_json, pacing_by_id, secs_to_millis,
    theme_by_id,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Preview configuration JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a raw generation response into a slide script.
    Normalize(NormalizeArgs),
    /// Print one slide's reveal schedule and authoring warnings.
    Schedule(ScheduleArgs),
    /// Print the scale-to-fit transform for a container size.
    Fit(FitArgs),
    /// Simulate a slide preview headlessly and print its event log.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Raw response JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output script JSON. Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Normalized script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slide id.
    #[arg(long)]
    slide: u32,

    /// Theme id used for the fallback stagger.
    #[arg(long)]
    theme: Option<String>,

    /// Pacing id used for the fallback stagger.
    #[arg(long)]
    pacing: Option<String>,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Container width in CSS pixels.
    #[arg(long)]
    width: f64,

    /// Container height in CSS pixels.
    #[arg(long)]
    height: f64,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Normalized script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slide id.
    #[arg(long)]
    slide: u32,

    /// Narration WAV. Plays silently when omitted.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Container width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Container height in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Simulation step in milliseconds.
    #[arg(long, default_value_t = 250)]
    step_ms: u64,

    /// Override the configured reveal timing.
    #[arg(long, value_enum)]
    timing: Option<TimingChoice>,

    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimingChoice {
    ClockDriven,
    DocumentTimers,
}

impl From<TimingChoice> for TimingMode {
    fn from(c: TimingChoice) -> Self {
        match c {
            TimingChoice::ClockDriven => TimingMode::ClockDriven,
            TimingChoice::DocumentTimers => TimingMode::DocumentTimers,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Normalize(args) => cmd_normalize(args, &cfg),
        Command::Schedule(args) => cmd_schedule(args, &cfg),
        Command::Fit(args) => cmd_fit(args, &cfg),
        Command::Preview(args) => cmd_preview(args, cfg),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("slidereel=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PreviewConfig> {
    match path {
        Some(p) => PreviewConfig::from_path(p)
            .with_context(|| format!("load preview config '{}'", p.display())),
        None => Ok(PreviewConfig::default()),
    }
}

fn cmd_normalize(args: NormalizeArgs, cfg: &PreviewConfig) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read response '{}'", args.in_path.display()))?;
    let script = normalize_json(&text, &cfg.durations)?;
    let json = serde_json::to_string_pretty(&script).context("serialize slide script")?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json)
                .with_context(|| format!("write script '{}'", out.display()))?;
            eprintln!(
                "wrote {} ({} slides, {:.0}s)",
                out.display(),
                script.len(),
                script.total_duration()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_schedule(args: ScheduleArgs, cfg: &PreviewConfig) -> anyhow::Result<()> {
    let script = SlideScript::from_path(&args.in_path)?;
    let slide = script
        .slide(args.slide)
        .with_context(|| format!("slide {} not found", args.slide))?;

    let stagger = if args.theme.is_some() || args.pacing.is_some() {
        effective_stagger_ms(
            theme_by_id(args.theme.as_deref().unwrap_or_default()),
            pacing_by_id(args.pacing.as_deref().unwrap_or_default()),
        )
    } else {
        cfg.fallback_stagger_ms
    };
    let schedule = RevealSchedule::extract(&slide.html, stagger);

    let mut out = std::io::stdout().lock();
    writeln!(out, "slide {} ({:.0}s)", slide.id, slide.duration)?;
    for cue in schedule.cues() {
        writeln!(out, "{:>8}ms  {}", cue.offset_ms, cue.class_name())?;
    }
    for w in schedule.lint(slide.duration, cfg.trailing_margin_ms) {
        let msg = match w {
            ScheduleWarning::Empty => "no element-N nodes found".to_owned(),
            ScheduleWarning::NonMonotonic { before, after } => {
                format!("element-{after} is revealed before element-{before}")
            }
            ScheduleWarning::LateFinalReveal {
                offset_ms,
                latest_ms,
            } => format!("last reveal at {offset_ms}ms; should be at or before {latest_ms}ms"),
        };
        writeln!(out, "warning: {msg}")?;
    }
    Ok(())
}

fn cmd_fit(args: FitArgs, cfg: &PreviewConfig) -> anyhow::Result<()> {
    let fit = ScaleFit::compute(Size::new(args.width, args.height), cfg.resolution)
        .context("container has no area")?;
    println!("scale={:.4}", fit.scale);
    println!("offset_x={:.2}", fit.offset.x);
    println!("offset_y={:.2}", fit.offset.y);
    println!("css: {}", fit.to_css());
    Ok(())
}

fn cmd_preview(args: PreviewArgs, mut cfg: PreviewConfig) -> anyhow::Result<()> {
    if let Some(t) = args.timing {
        cfg.timing = t.into();
    }
    let script = SlideScript::from_path(&args.in_path)?;
    let slide = script
        .slide(args.slide)
        .with_context(|| format!("slide {} not found", args.slide))?;
    let audio = args.audio.map(AudioSource::File);

    let surface = HeadlessSurface::new(Size::new(args.width, args.height));
    let mut session = PreviewSession::new(surface, HeadlessAudioBackend::new(), &cfg)?;

    let step = args.step_ms.max(1);
    let mut now_ms = 0u64;
    session.open(slide, audio.as_ref(), HostTime::from_millis(now_ms))?;

    let mut out = std::io::stdout().lock();
    loop {
        session.tick(HostTime::from_millis(now_ms))?;
        let mut ended = false;
        for ev in session.drain_events() {
            ended |= matches!(ev, PreviewEvent::Playback(PlaybackEvent::Ended));
            if args.json {
                let line = serde_json::json!({ "at_ms": now_ms, "event": ev });
                writeln!(out, "{line}")?;
            } else if let Some(text) = describe(&ev) {
                writeln!(out, "{now_ms:>8}ms  {text}")?;
            }
        }
        let end_ms = secs_to_millis(session.state().duration.max(slide.duration));
        if ended || now_ms > end_ms {
            break;
        }
        now_ms += step;
    }
    session.close();

    if !args.json {
        writeln!(out, "done at {now_ms}ms")?;
    }
    Ok(())
}

fn describe(ev: &PreviewEvent) -> Option<String> {
    let text = match ev {
        PreviewEvent::Render(RenderEvent::Rendered { slide_id }) => {
            format!("rendered slide {slide_id}")
        }
        PreviewEvent::Render(RenderEvent::Fitted(fit)) => format!(
            "fit scale={:.4} offset=({:.1}, {:.1})",
            fit.scale, fit.offset.x, fit.offset.y
        ),
        PreviewEvent::Render(RenderEvent::Revealed(cue)) => {
            format!("reveal {} (cue {}ms)", cue.class_name(), cue.offset_ms)
        }
        PreviewEvent::Render(RenderEvent::Concealed) => "conceal all".to_owned(),
        PreviewEvent::Render(RenderEvent::Recovered(r)) => format!("recovered: {r:?}"),
        PreviewEvent::Playback(PlaybackEvent::TimeUpdate(_)) => return None,
        PreviewEvent::Playback(PlaybackEvent::Started { fresh: true }) => {
            "play (fresh start)".to_owned()
        }
        PreviewEvent::Playback(PlaybackEvent::Started { fresh: false }) => {
            "play (resume)".to_owned()
        }
        PreviewEvent::Playback(PlaybackEvent::Paused) => "pause".to_owned(),
        PreviewEvent::Playback(PlaybackEvent::Ended) => "ended".to_owned(),
        PreviewEvent::Playback(PlaybackEvent::AudioUnavailable { reason }) => {
            format!("audio unavailable: {reason}")
        }
    };
    Some(text)
}
