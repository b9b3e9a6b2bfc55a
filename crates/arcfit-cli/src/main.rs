//! arcfit CLI — command-line interface for the arc-to-ellipse search.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use arcfit_core::{run_search, ArcSpec, CanonicalEllipse, Objective, RigLengths, SearchParams};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "arcfit")]
#[command(
    about = "Approximate a circular arc with a trammel-realizable ellipse within a radial tolerance"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the anchor-perturbation grid and report the best ellipse.
    Search(CliSearchArgs),

    /// Convert between central angle and chord length for a given radius.
    Chord(CliChordArgs),

    /// Print trammel rig lengths for an explicitly given ellipse.
    Rig(CliRigArgs),
}

#[derive(Debug, Clone, Args)]
struct CliArcArgs {
    /// Circle radius R.
    #[arg(long)]
    radius: f64,

    /// Full central angle in degrees, in (0, 180].
    #[arg(long, conflicts_with = "chord")]
    theta_deg: Option<f64>,

    /// Chord length; converted to the central angle via theta = 2·asin(chord/2R).
    #[arg(long)]
    chord: Option<f64>,
}

impl CliArcArgs {
    fn to_core(&self) -> CliResult<ArcSpec> {
        let arc = match (self.theta_deg, self.chord) {
            (Some(theta_deg), None) => ArcSpec::new(self.radius, theta_deg),
            (None, Some(chord)) => ArcSpec::from_radius_and_chord(self.radius, chord)
                .ok_or("chord cannot be subtended: |chord| must not exceed 2R")?,
            (None, None) => return Err("provide either --theta-deg or --chord".into()),
            (Some(_), Some(_)) => unreachable!("clap rejects conflicting arguments"),
        };
        if !arc.is_valid() {
            return Err("invalid arc: radius must be positive and the angle within (0, 180]".into());
        }
        Ok(arc)
    }
}

#[derive(Debug, Clone, Args)]
struct CliSearchArgs {
    #[command(flatten)]
    arc: CliArcArgs,

    /// Maximum allowed radial deviation between ellipse and circle.
    #[arg(long)]
    tolerance: f64,

    /// Grid steps for the quarter-point offset axis d.
    #[arg(long, default_value = "10")]
    steps_d: usize,

    /// Grid steps for the apex offset axis d1.
    #[arg(long, default_value = "10")]
    steps_d1: usize,

    /// Grid steps for the endpoint offset axis d2.
    #[arg(long, default_value = "10")]
    steps_d2: usize,

    /// Number of error samples per candidate.
    #[arg(long, default_value = "10")]
    error_samples: usize,

    /// Skip error sampling for cells that cannot improve the incumbent.
    #[arg(long)]
    prune: bool,

    /// Pin the apex anchor exactly on the arc.
    #[arg(long)]
    force_p_zero: bool,

    /// Pin the endpoint anchor exactly on the arc.
    #[arg(long)]
    force_r_zero: bool,

    /// Selection objective for the best accepted attempt.
    #[arg(long, value_enum, default_value_t = ObjectiveArg::MinimizeAPlusB)]
    objective: ObjectiveArg,

    /// Path to write the full search result (JSON).
    #[arg(long)]
    out: Option<PathBuf>,
}

impl CliSearchArgs {
    fn to_params(&self) -> SearchParams {
        SearchParams {
            tolerance: self.tolerance,
            steps_d: self.steps_d,
            steps_d1: self.steps_d1,
            steps_d2: self.steps_d2,
            error_samples: self.error_samples,
            prune_worse_than_best: self.prune,
            force_anchor_p_zero: self.force_p_zero,
            force_anchor_r_zero: self.force_r_zero,
            objective: self.objective.to_core(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    MinimizeA,
    MinimizeAPlusB,
    MinimizeRigLengthSum,
}

impl ObjectiveArg {
    fn to_core(self) -> Objective {
        match self {
            Self::MinimizeA => Objective::MinimizeA,
            Self::MinimizeAPlusB => Objective::MinimizeAPlusB,
            Self::MinimizeRigLengthSum => Objective::MinimizeRigLengthSum,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CliChordArgs {
    #[command(flatten)]
    arc: CliArcArgs,
}

#[derive(Debug, Clone, Args)]
struct CliRigArgs {
    #[command(flatten)]
    arc: CliArcArgs,

    /// Ellipse semi-axis along x.
    #[arg(long)]
    a: f64,

    /// Ellipse semi-axis along y.
    #[arg(long)]
    b: f64,

    /// Ellipse center's y-offset.
    #[arg(long)]
    h: f64,
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
        Commands::Search(args) => run_search_cmd(&args),
        Commands::Chord(args) => run_chord(&args),
        Commands::Rig(args) => run_rig(&args),
    }
}

// ── search ─────────────────────────────────────────────────────────────────

fn run_search_cmd(args: &CliSearchArgs) -> CliResult<()> {
    let arc = args.arc.to_core()?;
    let params = args.to_params();

    tracing::info!(
        "Searching {}x{}x{} offset grid (tolerance {})",
        params.steps_d,
        if params.force_anchor_p_zero { 1 } else { params.steps_d1 },
        if params.force_anchor_r_zero { 1 } else { params.steps_d2 },
        params.tolerance,
    );

    let result = run_search(&arc, &params);
    let n_accepted = result.attempts.iter().filter(|a| a.accepted).count();
    tracing::info!(
        "{} attempts evaluated ({} accepted)",
        result.attempts.len(),
        n_accepted,
    );

    match &result.best {
        Some(best) => {
            let rig = RigLengths::derive(&arc, &best.ellipse());
            println!("Best ellipse:");
            println!("  a:          {:.6}", best.a);
            println!("  b:          {:.6}", best.b);
            println!("  h:          {:.6}", best.h);
            println!("  max error:  {:.6}", best.max_error);
            println!("  rig L1:     {:.6}", rig.l1);
            println!("  rig L2:     {:.6}", rig.l2);
            println!("  rig L3:     {:.6}", rig.l3);
        }
        None => println!("No candidate stayed within tolerance."),
    }

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out, &json)?;
        tracing::info!("Results written to {}", out.display());
    }

    Ok(())
}

// ── chord ──────────────────────────────────────────────────────────────────

fn run_chord(args: &CliChordArgs) -> CliResult<()> {
    let arc = args.arc.to_core()?;

    println!("Arc:");
    println!("  radius:     {:.6}", arc.radius);
    println!("  theta:      {:.6} deg", arc.central_angle_deg);
    println!("  chord:      {:.6}", arc.chord_length());

    Ok(())
}

// ── rig ────────────────────────────────────────────────────────────────────

fn run_rig(args: &CliRigArgs) -> CliResult<()> {
    let arc = args.arc.to_core()?;
    if !(args.a.is_finite() && args.a > 0.0 && args.b.is_finite() && args.b > 0.0)
        || !args.h.is_finite()
    {
        return Err("invalid ellipse: semi-axes must be positive and finite".into());
    }

    let ellipse = CanonicalEllipse {
        a: args.a,
        b: args.b,
        h: args.h,
    };
    let rig = RigLengths::derive(&arc, &ellipse);

    println!("Trammel rig for a={} b={} h={}:", args.a, args.b, args.h);
    println!("  arm (a-b):  {:.6}", (args.a - args.b).max(0.0));
    println!("  L1:         {:.6}", rig.l1);
    println!("  L2:         {:.6}", rig.l2);
    println!("  L3:         {:.6}", rig.l3);
    println!("  L1+L3:      {:.6}", rig.rod_sum());

    Ok(())
}
