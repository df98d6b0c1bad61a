use std::process::ExitCode;

use avec_error::{Result, Tracked};
use avec_log::{Level, error, info, warn};

use avec_harness::{bench, config::Config, scenarios};

fn run() -> Result<bool> {
    let config = Config::from_env()?;
    let selected = config.select(scenarios::all())?;
    let mut failed = 0;
    for scenario in &selected {
        match scenario.run() {
            Ok(()) => {
                info!("{} passed", scenario.name);
            },
            Err(err) => {
                failed += 1;
                error!("{} failed: {} ({})", scenario.name, err, err.location_or_this());
            },
        }
    }
    if failed == 0 {
        info!("all {} scenarios passed", selected.len());
    } else {
        warn!("{} of {} scenarios failed", failed, selected.len());
    }
    if config.bench_count != 0 {
        let report = bench::push_back(config.bench_count)?;
        info!(
            "push_back x{}: DynArray {:?}, Vec {:?} ({:.2}x)",
            report.count, report.dyn_array, report.vec, report.ratio(),
        );
    }
    Ok(failed == 0)
}

fn main() -> ExitCode {
    if let Err(err) = avec_log::init_with(Level::Info) {
        eprintln!("failed to initialize logger: {}", err);
        return ExitCode::FAILURE
    }
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{} ({})", err, err.location_or_this());
            ExitCode::FAILURE
        },
    }
}
