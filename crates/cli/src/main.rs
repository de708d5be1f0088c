use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use spatio_grid::codec;
use spatio_grid::{
    Config, GridDomain, JoinConfig, LocalEngine, OutlierConfig, RunStats, SpatialWindow,
    detect_outliers, spatial_join,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON, or TOML with the `toml` feature)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads (default: one per core)
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flag points with fewer than K neighbors within distance R
    Outliers {
        /// Points file, one `x,y` per line
        points: PathBuf,

        /// Output file for the flagged points
        output: PathBuf,

        /// Neighbor radius
        #[arg(allow_negative_numbers = true)]
        r: Option<f64>,

        /// Neighbor threshold
        k: Option<usize>,

        #[arg(long)]
        chunk_size: Option<i64>,

        /// Upper bound of the chunk grid in both axes
        #[arg(long)]
        domain_max: Option<i64>,
    },

    /// Report every point strictly inside a rectangle
    Join {
        /// Points file, one `x,y` per line
        points: PathBuf,

        /// Rectangles file, one `x,y,height,width` per line
        rectangles: PathBuf,

        /// Output file for the matching pairs
        output: PathBuf,

        /// Spatial window (default: 1 1 10000 10000)
        #[arg(
            num_args = 4,
            value_names = ["X1", "Y1", "X2", "Y2"],
            allow_negative_numbers = true
        )]
        window: Option<Vec<i64>>,

        #[arg(long)]
        cell_size: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spatio_grid=info,spatio_grid_cli=info,warn".into()),
        )
        .init();

    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let workers = args.workers.or(config.workers);

    match args.command {
        Command::Outliers {
            points,
            output,
            r,
            k,
            chunk_size,
            domain_max,
        } => {
            let outlier = outlier_config(&config, r, k, chunk_size, domain_max)?;
            let engine = LocalEngine::new(workers)?;
            info!("Detecting outliers in {} with {:?}", points.display(), outlier);

            let points = read_input(&points, codec::read_points)?;
            let run = detect_outliers(&engine, &points, &outlier)?;
            log_stats(&run.stats)?;

            let outliers = run.into_sorted();
            let writer = create_output(&output)?;
            codec::write_outliers(writer, &outliers)?;
            info!("Wrote {} outliers to {}", outliers.len(), output.display());
        }
        Command::Join {
            points,
            rectangles,
            output,
            window,
            cell_size,
        } => {
            let join = join_config(&config, window.as_deref(), cell_size)?;
            let engine = LocalEngine::new(workers)?;
            info!(
                "Joining {} with {} inside window {}",
                points.display(),
                rectangles.display(),
                join.window
            );

            let points = read_input(&points, codec::read_points)?;
            let rects = read_input(&rectangles, codec::read_rectangles)?;
            let run = spatial_join(&engine, &points, &rects, &join)?;
            log_stats(&run.stats)?;

            let matches = run.into_sorted();
            let writer = create_output(&output)?;
            codec::write_join_matches(writer, &matches)?;
            info!("Wrote {} matches to {}", matches.len(), output.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = if path.extension().is_some_and(|ext| ext == "toml") {
        parse_toml(&text)
    } else {
        Config::from_json(&text).map_err(anyhow::Error::from)
    };
    config.with_context(|| format!("invalid config file {}", path.display()))
}

#[cfg(feature = "toml")]
fn parse_toml(text: &str) -> anyhow::Result<Config> {
    Ok(Config::from_toml(text)?)
}

#[cfg(not(feature = "toml"))]
fn parse_toml(_text: &str) -> anyhow::Result<Config> {
    bail!("TOML configuration requires the `toml` feature")
}

/// Command-line values take precedence over the config file.
fn outlier_config(
    config: &Config,
    r: Option<f64>,
    k: Option<usize>,
    chunk_size: Option<i64>,
    domain_max: Option<i64>,
) -> anyhow::Result<OutlierConfig> {
    let base = config.outlier.as_ref();
    let radius = r
        .or(base.map(|o| o.radius))
        .context("missing radius R: pass it after the output path or set outlier.radius")?;
    let k = k
        .or(base.map(|o| o.k))
        .context("missing neighbor threshold K: pass it after R or set outlier.k")?;

    let mut outlier = match base {
        Some(base) => OutlierConfig {
            radius,
            k,
            ..base.clone()
        },
        None => OutlierConfig::new(radius, k),
    };
    if let Some(chunk_size) = chunk_size {
        outlier = outlier.with_chunk_size(chunk_size);
    }
    if let Some(max) = domain_max {
        outlier = outlier.with_domain(GridDomain::new(max));
    }

    outlier.validate()?;
    Ok(outlier)
}

fn join_config(
    config: &Config,
    window: Option<&[i64]>,
    cell_size: Option<i64>,
) -> anyhow::Result<JoinConfig> {
    let mut join = config.join.clone();
    match window {
        Some(&[x1, y1, x2, y2]) => join = join.with_window(SpatialWindow::new(x1, y1, x2, y2)),
        Some(other) => bail!("spatial window needs 4 values, got {}", other.len()),
        None => {}
    }
    if let Some(cell_size) = cell_size {
        join = join.with_cell_size(cell_size);
    }

    join.validate()?;
    Ok(join)
}

fn read_input<T>(
    path: &Path,
    read: impl FnOnce(BufReader<File>) -> spatio_grid::Result<Vec<T>>,
) -> anyhow::Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("failed to open input {}", path.display()))?;
    read(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create output {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn log_stats(stats: &RunStats) -> anyhow::Result<()> {
    info!(
        "Replication factor {:.2}, {} records outside the grid or window",
        stats.replication_factor(),
        stats.unassigned
    );
    tracing::debug!("Run stats: {}", serde_json::to_string(stats)?);
    Ok(())
}
