//! Command-line driver
//!
//! ```text
//! cohort-sim [CONFIG.json]
//! ```
//!
//! Runs the reference and treatment cohorts described by the config (the
//! default stroke model when no path is given) and prints the experiment
//! report as JSON on stdout.

use std::process::ExitCode;

use cohort_simulator_core_rs::{run_experiment, ExperimentConfig};

fn load_config(path: Option<&str>) -> Result<ExperimentConfig, String> {
    match path {
        None => Ok(ExperimentConfig::default()),
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config '{}': {}", path, e))?;
            ExperimentConfig::from_json(&json).map_err(|e| e.to_string())
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    if args.len() > 1 {
        return Err("usage: cohort-sim [CONFIG.json]".to_string());
    }

    let config = load_config(args.first().map(String::as_str))?;
    log::info!("Loaded config for {} patients per arm", config.population_size);

    let report = run_experiment(&config).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
