use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use keyplay::{
    Axis, CanvasSize, Fetch, FsFetch, Playback, PlayerOptions, RasterSettings, ScheduledStep,
    Stage, SvgAnimation, SvgToolkit as _, TweenId, render_stage, save_png,
};

#[derive(Parser, Debug)]
#[command(name = "keyplay", version, about = "Play keyframe animations on SVG illustrations")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every tween's step plan as JSON.
    Schedule(ScheduleArgs),
    /// Play to a point in time and write the canvas as SVG.
    Snapshot(SnapshotArgs),
    /// Render PNG frames from start to end.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Animation JSON (path or http(s) URL).
    #[arg(long)]
    config: String,

    /// Override the SVG location from the config.
    #[arg(long)]
    svg: Option<String>,

    /// Override the total duration in milliseconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Override the step count.
    #[arg(long)]
    steps: Option<u32>,

    /// Selector of the canvas container that receives the SVG.
    #[arg(long)]
    canvas: Option<String>,

    /// Directory relative asset locations resolve against. Defaults to the config's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct ScheduleArgs {
    #[command(flatten)]
    load: LoadArgs,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Playback time in milliseconds.
    #[arg(long)]
    at: f64,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out: PathBuf,

    /// Background color as `RRGGBB` or `RRGGBBAA` hex. Transparent when omitted.
    #[arg(long)]
    background: Option<String>,
}

#[derive(serde::Serialize)]
struct TweenPlan {
    tween: TweenId,
    element: Option<String>,
    axis: Axis,
    steps: Vec<ScheduledStep>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Schedule(args) => cmd_schedule(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn make_fetch(args: &LoadArgs) -> anyhow::Result<(Box<dyn Fetch>, String)> {
    if keyplay::is_http_url(&args.config) {
        return http_fetch(&args.config);
    }

    let config = std::path::absolute(&args.config)
        .with_context(|| format!("resolve config path '{}'", args.config))?;
    let root = match &args.root {
        Some(root) => root.clone(),
        None => config
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    Ok((
        Box::new(FsFetch::new(root)),
        config.to_string_lossy().into_owned(),
    ))
}

#[cfg(feature = "http")]
fn http_fetch(url: &str) -> anyhow::Result<(Box<dyn Fetch>, String)> {
    let base = url.rsplit_once('/').map_or(url, |(base, _)| base);
    Ok((Box::new(keyplay::HttpFetch::with_base(base)), url.to_string()))
}

#[cfg(not(feature = "http"))]
fn http_fetch(url: &str) -> anyhow::Result<(Box<dyn Fetch>, String)> {
    anyhow::bail!("'{url}' is a URL but keyplay was built without the `http` feature")
}

fn open(args: &LoadArgs) -> anyhow::Result<(Stage, SvgAnimation)> {
    let (fetch, data) = make_fetch(args)?;
    let mut options: PlayerOptions =
        keyplay::fetch_json(fetch.as_ref(), &data).context("load animation config")?;
    // Command-line flags win over the JSON.
    options.merge(PlayerOptions {
        svg: args.svg.clone(),
        duration: args.duration,
        steps: args.steps,
        canvas: args.canvas.clone(),
        ..PlayerOptions::default()
    });
    options.data = None;

    let mut stage = Stage::new(CanvasSize::new(args.width, args.height)?);
    let anim = SvgAnimation::open(fetch.as_ref(), options, &mut stage).context("load scene")?;
    Ok((stage, anim))
}

fn cmd_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    let (stage, anim) = open(&args.load)?;
    let plans: Vec<TweenPlan> = anim
        .playback()
        .tweens()
        .iter()
        .map(|t| TweenPlan {
            tween: t.id(),
            element: stage.document().attr(t.element(), "id").map(str::to_string),
            axis: t.axis(),
            steps: t.schedule(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&plans)?);
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.at.is_finite() && args.at >= 0.0,
        "--at must be a non-negative number of milliseconds"
    );
    let (mut stage, anim) = open(&args.load)?;
    let mut playback = anim.into_playback();
    playback.advance_to(&mut stage, args.at);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, stage.to_svg_string())
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be > 0");
    let settings = RasterSettings {
        clear_rgba: args.background.as_deref().map(parse_hex_rgba).transpose()?,
    };
    let (mut stage, anim) = open(&args.load)?;
    let mut playback: Playback = anim.into_playback();

    let frame_ms = 1000.0 / f64::from(args.fps);
    let last = (playback.total_duration_ms() / frame_ms).ceil() as u64;
    for i in 0..=last {
        let t = (i as f64 * frame_ms).min(playback.total_duration_ms());
        playback.advance_to(&mut stage, t);
        let frame = render_stage(&stage, settings)?;
        save_png(&frame, &args.out.join(format!("frame_{i:05}.png")))?;
    }
    eprintln!("wrote {} frames to {}", last + 1, args.out.display());
    Ok(())
}

fn parse_hex_rgba(s: &str) -> anyhow::Result<[u8; 4]> {
    let s = s.trim_start_matches('#');
    anyhow::ensure!(
        (s.len() == 6 || s.len() == 8) && s.is_ascii(),
        "background must be RRGGBB or RRGGBBAA, got '{s}'"
    );
    let byte = |i: usize| {
        u8::from_str_radix(&s[i..i + 2], 16).with_context(|| format!("bad hex in '{s}'"))
    };
    let a = if s.len() == 8 { byte(6)? } else { 255 };
    Ok([byte(0)?, byte(2)?, byte(4)?, a])
}
