use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "burst-explorer")]
#[command(author = "harrysoft")]
#[command(version)]
#[command(about = "A TUI explorer for the Burst blockchain")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Network to connect to (mainnet, testnet)
    #[arg(short, long)]
    pub network: Option<String>,

    /// Custom node URL (overrides network default)
    #[arg(long)]
    pub node_url: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Open the details screen for this account ID on startup
    #[arg(long)]
    pub account: Option<u64>,

    /// Open the details screen for this block height on startup
    #[arg(long)]
    pub block_height: Option<u64>,

    /// Open the details screen for this block ID on startup
    #[arg(long)]
    pub block_id: Option<u64>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
