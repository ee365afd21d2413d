use clap::Parser;

use staticd::config::{Cli, Config};
use staticd::{logger, server};

fn main() {
    let cli = Cli::parse();

    let cfg = match Config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[ERROR] Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(&cfg) {
        eprintln!("[ERROR] Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    // Build the Tokio runtime, honoring the configured worker thread count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_error(&format!("Failed to build runtime: {e}"));
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(server::run(cfg)) {
        logger::log_error(&format!("Server terminated: {e}"));
        std::process::exit(1);
    }
}
