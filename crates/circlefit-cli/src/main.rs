//! circlefit CLI — fit circles to 2D point sets from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use circlefit::{fit_report, Circle, FitMethod, RansacConfig, RefineConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "circlefit")]
#[command(about = "Fit circles to 2D point samples (Kåsa least squares, IRLS refinement, RANSAC)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a circle to a point set.
    Fit(CliFitArgs),

    /// Generate a synthetic point set on a circle.
    Gen(CliGenArgs),
}

#[derive(Debug, Clone, Args)]
struct CliFitArgs {
    /// Path to the input points (JSON array of [x, y] pairs).
    #[arg(long)]
    points: PathBuf,

    /// Path to write the fit report (JSON). Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fitting method.
    #[arg(long, value_enum, default_value_t = FitMethodArg::Kasa)]
    method: FitMethodArg,

    /// RANSAC inlier threshold (absolute radial distance).
    #[arg(long, default_value = "1.0")]
    ransac_thresh: f64,

    /// Maximum RANSAC iterations.
    #[arg(long, default_value = "500")]
    ransac_iters: usize,

    /// Minimum RANSAC inliers for a valid model.
    #[arg(long, default_value = "10")]
    ransac_min_inliers: usize,

    /// RANSAC seed.
    #[arg(long, default_value = "42")]
    ransac_seed: u64,

    /// Maximum refinement iterations (geometric method).
    #[arg(long, default_value = "30")]
    refine_iters: usize,

    /// Huber delta for refinement residual weighting.
    #[arg(long, default_value = "1.0")]
    huber_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FitMethodArg {
    /// Kåsa linear least squares.
    Kasa,
    /// Kåsa seed + IRLS geometric refinement.
    Geometric,
    /// RANSAC robust fit.
    Ransac,
}

impl From<FitMethodArg> for FitMethod {
    fn from(arg: FitMethodArg) -> Self {
        match arg {
            FitMethodArg::Kasa => FitMethod::Kasa,
            FitMethodArg::Geometric => FitMethod::Geometric,
            FitMethodArg::Ransac => FitMethod::Ransac,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CliGenArgs {
    /// Number of points sampled on the circle.
    #[arg(long, default_value = "64")]
    n: usize,

    /// Circle center x.
    #[arg(long, default_value = "0.0")]
    cx: f64,

    /// Circle center y.
    #[arg(long, default_value = "0.0")]
    cy: f64,

    /// Circle radius.
    #[arg(long, default_value = "1.0")]
    radius: f64,

    /// Uniform noise half-width added to each coordinate.
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Fraction of the full circle covered by the samples, in (0, 1].
    #[arg(long, default_value = "1.0")]
    arc_fraction: f64,

    /// Number of uniform random outliers appended to the set.
    #[arg(long, default_value = "0")]
    outliers: usize,

    /// RNG seed.
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Path to write the points (JSON array of [x, y] pairs).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fit(args) => run_fit(&args),
        Commands::Gen(args) => run_gen(&args),
    }
}

// ── fit ────────────────────────────────────────────────────────────────

fn run_fit(args: &CliFitArgs) -> CliResult<()> {
    tracing::info!("Loading points: {}", args.points.display());

    let text = std::fs::read_to_string(&args.points).map_err(|e| -> CliError {
        format!("Failed to read {}: {}", args.points.display(), e).into()
    })?;
    let points: Vec<[f64; 2]> = serde_json::from_str(&text).map_err(|e| -> CliError {
        format!("Failed to parse {}: {}", args.points.display(), e).into()
    })?;

    tracing::info!("Loaded {} points", points.len());

    let ransac = RansacConfig {
        max_iters: args.ransac_iters,
        inlier_threshold: args.ransac_thresh,
        min_inliers: args.ransac_min_inliers,
        seed: args.ransac_seed,
    };
    let refine = RefineConfig {
        max_iters: args.refine_iters,
        huber_delta: args.huber_delta,
    };

    let report = fit_report(&points, args.method.into(), &ransac, &refine)?;

    tracing::info!(
        "center=({:.4}, {:.4}) r={:.4} rms={:.4}",
        report.circle.cx,
        report.circle.cy,
        report.circle.r,
        report.rms_residual,
    );
    if let Some(inliers) = report.num_inliers {
        tracing::info!("RANSAC inliers: {}/{}", inliers, report.n_points);
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

// ── gen ────────────────────────────────────────────────────────────────

fn run_gen(args: &CliGenArgs) -> CliResult<()> {
    use rand::prelude::*;

    if args.radius <= 0.0 {
        return Err("radius must be positive".into());
    }
    if !(args.arc_fraction > 0.0 && args.arc_fraction <= 1.0) {
        return Err("arc-fraction must be in (0, 1]".into());
    }

    let circle = Circle {
        cx: args.cx,
        cy: args.cy,
        r: args.radius,
    };
    let mut rng = StdRng::seed_from_u64(args.seed);

    let sweep = args.arc_fraction * 2.0 * std::f64::consts::PI;
    let mut points = circle.sample_arc(args.n, 0.0, sweep);
    if args.noise > 0.0 {
        for p in &mut points {
            p[0] += (rng.gen::<f64>() - 0.5) * 2.0 * args.noise;
            p[1] += (rng.gen::<f64>() - 0.5) * 2.0 * args.noise;
        }
    }

    // Outliers scatter uniformly over a box twice the circle's extent.
    let spread = 2.0 * args.radius;
    for _ in 0..args.outliers {
        points.push([
            args.cx + rng.gen_range(-spread..spread),
            args.cy + rng.gen_range(-spread..spread),
        ]);
    }

    let json = serde_json::to_string_pretty(&points)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!(
        "Wrote {} points ({} outliers) to {}",
        points.len(),
        args.outliers,
        args.out.display(),
    );

    Ok(())
}
