use std::{fs, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use shared::{
    display::format_distance, path_distance, project_onto, route_from_json, CanvasSize,
    SimulatedWalk,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker::{
    config::default_data_dir, render::render_svg, run_session, FileStore, LocationSource,
    ReplaySource, SimulatedSource, TrackerConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Track a run or walk and export the route")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a session from a simulated walk or a replayed route file
    Track(TrackArgs),
    /// Render an exported route JSON to SVG and print its length
    Render(RenderArgs),
    /// Show the route stored by the last session
    LastRun {
        /// Store directory (defaults to $SAFE_RUNNER_DATA_DIR or .safe-runner)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct TrackArgs {
    /// Replay a route (.json export or .gpx track) instead of the simulated walk
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Milliseconds between samples
    #[arg(long, default_value_t = 2_000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Stop after this many seconds (default: until Ctrl-C or the replay ends)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Directory receiving the route JSON/SVG/GPX
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Store directory for the last-run entry
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Also write a GPX track
    #[arg(long)]
    gpx: bool,

    #[arg(long, default_value_t = 60)]
    inactivity_timeout_secs: u64,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    inactivity_poll_secs: u64,
}

impl TrackArgs {
    fn config(&self) -> TrackerConfig {
        TrackerConfig {
            sample_interval: Duration::from_millis(self.interval_ms),
            max_duration: self.duration_secs.map(Duration::from_secs),
            inactivity_timeout: Duration::from_secs(self.inactivity_timeout_secs),
            inactivity_poll: Duration::from_secs(self.inactivity_poll_secs),
            out_dir: self.out_dir.clone(),
            data_dir: self.data_dir.clone().unwrap_or_else(default_data_dir),
            export_gpx: self.gpx,
            ..TrackerConfig::default()
        }
    }
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    /// Route JSON as exported by `track`
    route: PathBuf,

    /// SVG output path (defaults to the route path with an .svg extension)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 400.0)]
    width: f64,
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    #[arg(long, default_value_t = 20.0)]
    padding: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safe_runner=info,tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Track(args) => track(args).await,
        Command::Render(args) => render(args),
        Command::LastRun { data_dir } => last_run(data_dir.unwrap_or_else(default_data_dir)),
    }
}

async fn track(args: TrackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config();
    let mut source: Box<dyn LocationSource> = match &args.replay {
        Some(path) => Box::new(ReplaySource::from_path(path, config.sample_interval)?),
        None => Box::new(SimulatedSource::new(SimulatedWalk::default(), config.sample_interval)),
    };
    let store = FileStore::new(&config.data_dir);

    let stop = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    let summary = run_session(&config, source.as_mut(), &store, stop).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn render(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = CanvasSize {
        width: args.width,
        height: args.height,
        padding: args.padding,
    };
    if canvas.width <= 0.0 || canvas.height <= 0.0 || canvas.padding < 0.0 {
        return Err("canvas dimensions must be positive and padding non-negative".into());
    }
    if canvas.padding * 2.0 >= canvas.width.min(canvas.height) {
        return Err("padding must be less than half the smaller canvas dimension".into());
    }

    let route = route_from_json(&fs::read_to_string(&args.route)?)?;
    let output = args.output.unwrap_or_else(|| args.route.with_extension("svg"));
    fs::write(&output, render_svg(&project_onto(&route, canvas), canvas))?;
    tracing::info!("route rendered to {:?}", output);

    println!("{} points, {} m", route.len(), format_distance(path_distance(&route)));
    Ok(())
}

fn last_run(data_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(data_dir);
    match store.load_last_run()? {
        Some(route) => println!(
            "last run: {} points, {} m",
            route.len(),
            format_distance(path_distance(&route))
        ),
        None => println!("no run stored in {:?}", store.dir()),
    }
    Ok(())
}
