use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chatreel::ProgressObserver as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chat video as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the laid-out lines of every message.
    Layout(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Chat history JSON (`{"comments": [...]}` or a bare array).
    #[arg(long)]
    chat: PathBuf,

    /// Emote pack manifest; images resolve against its directory.
    #[arg(long)]
    pack: Option<PathBuf>,

    /// Video config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regular chat font, overrides `font_path` from the config.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold font for author names, overrides `bold_font_path` from the config.
    #[arg(long)]
    bold_font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Video length in seconds, overrides `duration_secs` from the config.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

struct Prepared {
    messages: Vec<chatreel::ChatMessage>,
    video: chatreel::ChatVideo,
}

fn load_config(input: &InputArgs) -> anyhow::Result<chatreel::VideoConfig> {
    let mut config = match &input.config {
        Some(path) => chatreel::VideoConfig::load(path)?,
        None => chatreel::VideoConfig::default(),
    };
    if let Some(font) = &input.font {
        config.font_path = Some(font.clone());
    }
    if let Some(bold) = &input.bold_font {
        config.bold_font_path = Some(bold.clone());
    }
    Ok(config)
}

fn make_text(config: &chatreel::VideoConfig) -> anyhow::Result<Box<dyn chatreel::TextEngine>> {
    match &config.font_path {
        Some(regular) => {
            let text = chatreel::ParleyText::from_files(
                regular,
                config.bold_font_path.as_deref(),
                config.font_size,
            )
            .with_context(|| format!("load chat font '{}'", regular.display()))?;
            Ok(Box::new(text))
        }
        None => {
            tracing::warn!("no chat font configured, drawing text as blocks");
            let size = config.font_size;
            Ok(Box::new(chatreel::BlockText::new(
                (size * 0.6).ceil(),
                (size * 1.2).ceil(),
            )?))
        }
    }
}

fn make_resolver(
    pack_path: Option<&Path>,
    progress: &mut dyn chatreel::ProgressObserver,
) -> anyhow::Result<Box<dyn chatreel::TokenResolver>> {
    progress.report(chatreel::Progress {
        current: 0,
        total: 1,
        phase: chatreel::Phase::LoadingEmotes,
    });
    let (pack, root) = match pack_path {
        Some(path) => {
            let pack = chatreel::EmotePack::load(path)?;
            let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            (pack, root)
        }
        None => (chatreel::EmotePack::default(), PathBuf::from(".")),
    };
    let mut resolver = chatreel::PackResolver::new(pack, chatreel::DirFetcher::new(root));
    let usable = resolver.preload();
    tracing::info!(images = usable, "emote pack ready");
    Ok(Box::new(resolver))
}

fn prepare(input: &InputArgs, duration: Option<f64>) -> anyhow::Result<Prepared> {
    let mut progress = log_progress();
    let mut config = load_config(input)?;
    if duration.is_some() {
        config.duration_secs = duration;
    }

    progress.report(chatreel::Progress {
        current: 0,
        total: 1,
        phase: chatreel::Phase::LoadingChat,
    });
    let messages = chatreel::load_chat_history(&input.chat)?;
    tracing::info!(messages = messages.len(), "chat loaded");

    let resolver = make_resolver(input.pack.as_deref(), &mut progress)?;
    let text = make_text(&config)?;
    let video = chatreel::ChatVideo::new(config, resolver, text)?;
    Ok(Prepared { messages, video })
}

fn log_progress() -> impl FnMut(chatreel::Progress) {
    let mut last: Option<(chatreel::Phase, u64)> = None;
    move |p: chatreel::Progress| {
        // One line per phase change and per 10% step.
        let step = (p.fraction() * 10.0).floor() as u64;
        if last != Some((p.phase, step)) {
            last = Some((p.phase, step));
            tracing::info!(
                phase = ?p.phase,
                current = p.current,
                total = p.total,
                "progress"
            );
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let Prepared {
        messages,
        mut video,
    } = prepare(&args.input, args.duration)?;

    if !chatreel::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg not found on PATH");
    }

    let opts = chatreel::FfmpegSinkOpts::new(&args.out).with_background(video.config().background);
    let mut sink = chatreel::FfmpegSink::new(opts);
    let mut progress = log_progress();
    let outcome = video.render(
        &messages,
        &mut sink,
        &mut progress,
        &chatreel::CancelToken::new(),
    )?;

    match outcome {
        chatreel::RenderOutcome::Completed(stats) => {
            eprintln!(
                "wrote {} ({} frames, {} messages)",
                args.out.display(),
                stats.frames_rendered,
                stats.admitted
            );
        }
        chatreel::RenderOutcome::Cancelled(_) => eprintln!("render cancelled"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let Prepared {
        messages,
        mut video,
    } = prepare(&args.input, None)?;

    let frame = video.render_still(&messages, chatreel::FrameIndex(args.frame))?;
    let background = video.config().background;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let data = frame.flattened(background)?;
    image::save_buffer_with_format(
        &args.out,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: InputArgs) -> anyhow::Result<()> {
    let Prepared {
        messages,
        mut video,
    } = prepare(&args, None)?;

    let drawables = video.layout_all(&messages, &mut chatreel::NoProgress)?;
    for (i, (message, laid)) in messages.iter().zip(&drawables).enumerate() {
        println!(
            "#{i} {} @{:.2}s frame {} height {} lines {}{}",
            message.author,
            message.time_offset,
            laid.start_frame.0,
            laid.height(),
            laid.lines.len(),
            if laid.live { "" } else { " (replay)" }
        );
        for (n, line) in laid.lines.iter().enumerate() {
            let runs: Vec<String> = line.drawables.iter().map(describe).collect();
            println!(
                "  {n}: y={} h={} {}",
                line.offset_y,
                line.height(),
                runs.join(" ")
            );
        }
    }
    Ok(())
}

fn describe(d: &chatreel::Drawable) -> String {
    let what = match &d.kind {
        chatreel::DrawableKind::User { text, .. } => format!("user({text})"),
        chatreel::DrawableKind::Badge { .. } => "badge".to_string(),
        chatreel::DrawableKind::Text { text, .. } => format!("text({text:?})"),
        chatreel::DrawableKind::Emote { frame_count, .. } => format!("emote[{frame_count}]"),
    };
    format!("{what}@{},{}", d.offset_x, d.offset_y)
}
