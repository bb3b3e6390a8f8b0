use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use hornface::{
    AssetManifest, DetectionEvent, FaceRect, ImageSequenceSource, OverlaySession, Readiness,
    ReplayScript, SessionOpts, StillImageSource, VideoSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hornface", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add features to faces in one still image and save a PNG.
    Frame(FrameArgs),
    /// Replay a scripted session over recorded frames.
    Replay(ReplayArgs),
}

#[derive(clap::Args, Debug)]
struct AssetArgs {
    /// Directory sprite paths are resolved against (defaults to $HORNFACE_ASSETS_DIR or `.`).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// JSON manifest mapping leftHorn/rightHorn/eye/morr to sprite paths.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

impl AssetArgs {
    fn session_opts(&self) -> anyhow::Result<SessionOpts> {
        let mut opts = SessionOpts::default();
        if let Some(root) = &self.assets {
            opts.assets_root = root.clone();
        }
        if let Some(path) = &self.manifest {
            opts.manifest = AssetManifest::from_path(path)?;
        }
        Ok(opts)
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input picture standing in for the camera.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Face rectangle as `x,y,width,height`; repeat for several faces.
    #[arg(long = "face", value_parser = parse_face)]
    faces: Vec<FaceRect>,

    /// JSON array of face rectangles, appended to `--face`.
    #[arg(long)]
    faces_json: Option<PathBuf>,

    /// Leave capture off and only render the background.
    #[arg(long, default_value_t = false)]
    idle: bool,

    /// Output PNG path or directory.
    #[arg(long, default_value = hornface::DEFAULT_EXPORT_FILE_NAME)]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Directory of recorded frames (png/jpg, sorted by name).
    #[arg(long)]
    frames: PathBuf,

    /// Replay script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Directory for saves without an explicit path.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,
}

fn parse_face(s: &str) -> Result<FaceRect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid face '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(FaceRect::new(*x, *y, *w, *h)),
        _ => Err(format!("face '{s}' must be x,y,width,height")),
    }
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
        Command::Frame(args) => cmd_frame(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn start_session(
    opts: SessionOpts,
    source: Box<dyn VideoSource>,
) -> anyhow::Result<OverlaySession> {
    let mut session = OverlaySession::new(opts, source);
    match session.start()? {
        Readiness::Ready(_) => Ok(session),
        Readiness::Failed(reason) => bail!(reason),
    }
}

fn read_faces(path: &Path) -> anyhow::Result<Vec<FaceRect>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read faces '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse faces '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut faces = args.faces;
    if let Some(path) = &args.faces_json {
        faces.extend(read_faces(path)?);
    }

    let source = StillImageSource::from_path(&args.in_path);
    let mut session = start_session(args.assets.session_opts()?, Box::new(source))?;
    if !args.idle {
        session.toggle_capture();
    }
    session.on_detection(&DetectionEvent::new(faces))?;

    let out = session.save_frame(&args.out)?;
    tracing::info!(path = %out.display(), "wrote frame");
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let script = ReplayScript::from_path(&args.script)?;
    let source = ImageSequenceSource::from_dir(&args.frames)?;
    let mut session = start_session(args.assets.session_opts()?, Box::new(source))?;

    let report = hornface::replay(&mut session, &script, &args.out)?;
    for path in &report.saved {
        tracing::info!(path = %path.display(), "wrote frame");
    }
    let stats = session.stats();
    tracing::info!(
        passes = report.passes,
        sprites_drawn = stats.sprites_drawn,
        skipped_faces = stats.skipped_rects,
        empty_saves = report.empty_saves,
        "replay finished"
    );
    Ok(())
}
