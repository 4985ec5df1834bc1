use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use armada_app::driver::Driver;
use armada_app::opts::Opts;
use armada_app::self_test;

fn main() -> ExitCode {
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            // Help and usage errors both land on exit code 1.
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if opts.unit_tests {
        self_test::run();
        return ExitCode::SUCCESS;
    }

    if let Some(path) = &opts.dump_png {
        eprintln!(
            "Cannot dump {}: this build has no sprite pipeline",
            path.display()
        );
        return ExitCode::from(1);
    }

    if !opts.headless {
        warn!("no display frontend in this build; running headless");
    }
    if opts.frame_skip || opts.start_paused {
        warn!("--frameSkip/--startPaused are inert without a display");
    }

    info!("Starting Armada...");

    match Driver::new(opts).and_then(Driver::run) {
        Ok(()) => {
            info!("Done!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}
