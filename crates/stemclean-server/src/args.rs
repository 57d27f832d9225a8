use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stemclean")]
#[command(author, version, about = "Vocal/instrumental stem extraction service")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8000 (overrides config)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Directory finished tracks are written to (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of pipelines allowed to run at once (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
