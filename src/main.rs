// src/main.rs

use log::{error, info};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("starting domino run");

    let result = std::panic::catch_unwind(domino_run::run_native);
    match result {
        Ok(Ok(())) => info!("shut down cleanly"),
        Ok(Err(err)) => {
            error!("event loop error: {err}");
            std::process::exit(1);
        }
        Err(_) => {
            error!("panicked, aborting");
            std::process::exit(1);
        }
    }
}
