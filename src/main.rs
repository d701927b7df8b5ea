use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use floorplan_core::{Settings, output, plan_from_paths};

/// Place the 13 processes of a factory floor from their material flow.
#[derive(Debug, Parser)]
#[command(name = "floorplan", version)]
struct Args {
    /// Flow matrix CSV (header row and one row per process, labels A-M)
    #[arg(long)]
    flow: PathBuf,
    /// Equipment table CSV with `process,count` and optional unit size columns
    #[arg(long)]
    equipment: PathBuf,
    /// Directory for Process_Locations.csv, Flow_Connections.csv and Layout_Summary.json
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// JSON settings file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the initial scatter (default 42)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of force steps (default 100)
    #[arg(long)]
    iterations: Option<usize>,
}

fn run(args: Args) -> floorplan_core::Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    }
    .with_overrides(args.seed, args.iterations);

    let report = plan_from_paths(&args.flow, &args.equipment, &settings)?;
    let paths = output::write_report(&args.out_dir, &report)?;

    let s = &report.summary;
    println!("processes:              {}", s.process_count);
    println!("connections:            {}", s.connection_count);
    println!("flow-weighted distance: {:.1}", s.flow_weighted_distance);
    println!("closest pair:           {:.2}", s.closest_pair_distance);
    println!("separation violations:  {}", s.separation_violations);
    if let Some(b) = &s.bounding_box {
        println!("bounding box:           {:.1} x {:.1}", b.w, b.h);
    }
    println!("wrote {}", paths.process_locations.display());
    println!("wrote {}", paths.flow_connections.display());
    println!("wrote {}", paths.summary.display());
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("floorplan: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::parse_from([
            "floorplan", "--flow", "f.csv", "--equipment", "e.csv", "--seed", "9", "--iterations", "5",
        ]);
        assert_eq!((args.seed, args.iterations), (Some(9), Some(5)));
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert!(args.config.is_none());
    }
}
