use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Stop after this many seconds.
    #[arg(long)]
    pub duration: Option<u64>,

    /// Open the map window.
    #[arg(long, default_value_t = false)]
    pub gui: bool,

    /// Read the feed from a recorded file instead of the live connection.
    #[arg(long, default_value = None)]
    pub replay: Option<std::path::PathBuf>,

    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    #[arg(long)]
    pub config_file: std::path::PathBuf,
}
