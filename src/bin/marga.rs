//! Marga command-line planner.
//!
//! Loads a TOML configuration and an ASCII cost map, inflates the map by the
//! robot footprint, and plans a single request.
//!
//! Usage:
//!   marga --config configs/marga.toml --start 0.5,0.5,0 --goal 4.5,3.5,1.57
//!   marga --config configs/marga.toml --start 0.5,0.5,0 --goal 4.5,3.5,0 --planner RRTConnect

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use marga::core::{Pose2D, PoseStamped};
use marga::diagnostics::TracingSink;
use marga::environment::{GridCostmap, StaticEnvironment};
use marga::{GlobalPlanner, MargaConfig, PlanError, PlanningRequest};

/// Plan a path over an ASCII cost map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/marga.toml")]
    config: PathBuf,

    /// Start pose as x,y,theta
    #[arg(short, long, value_parser = parse_pose, allow_hyphen_values = true)]
    start: Pose2D,

    /// Goal pose as x,y,theta
    #[arg(short, long, value_parser = parse_pose, allow_hyphen_values = true)]
    goal: Pose2D,

    /// Override the configured planner type
    #[arg(short, long)]
    planner: Option<String>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_pose(text: &str) -> Result<Pose2D, String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("'{}': {}", part, e)))
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [x, y] => Ok(Pose2D::new(*x, *y, 0.0)),
        [x, y, theta] => Ok(Pose2D::new(*x, *y, *theta)),
        _ => Err(format!("expected x,y[,theta], got '{}'", text)),
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) if e.downcast_ref::<PlanError>().is_some_and(PlanError::is_fatal) => {
            error!("Fatal: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    info!("Loading configuration from {:?}", args.config);
    let mut config = MargaConfig::load(&args.config).map_err(PlanError::from)?;

    if let Some(planner) = &args.planner {
        config.planner.global_planner_type = planner.clone();
    }
    if args.seed.is_some() {
        config.planner.random_seed = args.seed;
    }

    // Environment
    let map = &config.map;
    info!("Loading map from {:?}", map.path);
    let mut costmap = GridCostmap::load_ascii(&map.path, map.resolution, map.origin())?;
    costmap.inflate(
        map.footprint.inscribed_radius(),
        map.inflation_radius,
        map.cost_scaling_factor,
    );
    info!(
        "Map: {}x{} cells at {:.3} m, footprint with {} vertices",
        costmap.width(),
        costmap.height(),
        costmap.resolution(),
        map.footprint.vertices().len()
    );

    let env = Arc::new(StaticEnvironment::new(
        map.frame_id.clone(),
        costmap,
        map.footprint.clone(),
    ));
    let planner = GlobalPlanner::with_model("marga", env, Arc::new(TracingSink::new("marga")));

    let request = PlanningRequest::new(
        PoseStamped::from_pose2d(map.frame_id.clone(), args.start),
        PoseStamped::from_pose2d(map.frame_id.clone(), args.goal),
    );

    let outcome = match planner.make_plan(&request, &config.planner) {
        Ok(outcome) => outcome,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            warn!("{}", e);
            return Ok(false);
        }
    };

    if !outcome.solved {
        warn!("No path found");
        return Ok(false);
    }

    println!("# x y theta");
    for pose in &outcome.path {
        println!("{:.4} {:.4} {:.4}", pose.x, pose.y, pose.theta);
    }
    if let Some(stats) = &outcome.stats {
        info!(
            "Path length {:.2} m (straight line {:.2} m) in {:.3}s",
            stats.path_length,
            stats.start_goal_distance,
            stats.total_planning_time.as_secs_f64()
        );
    }

    Ok(true)
}
