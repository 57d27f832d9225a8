use anyhow::Result;
use clap::Parser;
use stemclean_core::Config;
use stemclean_server::args::Args;
use stemclean_server::server;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "stemclean_server=info,stemclean_core=info,stemclean_split=info",
        1 => "stemclean_server=debug,stemclean_core=debug,stemclean_split=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        cfg.server.listen_addr = listen;
    }
    if let Some(output) = args.output {
        cfg.storage.output_dir = output;
    }
    if let Some(jobs) = args.jobs {
        cfg.server.max_jobs = jobs;
    }

    server::serve(cfg).await
}
