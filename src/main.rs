use clap::Parser;
use log::{error, info};
use softras::app::{run_gui, run_headless};
use softras::io::config::Config;

#[derive(Parser, Debug)]
#[command(name = "softras")]
#[command(about = "CPU software rasterizer driven by a TOML scene config")]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Render a single frame without opening a window
    #[arg(long)]
    headless: bool,

    /// Output image path (headless mode), overrides the config
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config file: {}", path);
            Config::load(path)?
        }
        None => {
            info!("Using default settings");
            Config::default()
        }
    };

    if let Some(output) = cli.output {
        config.render.output = output;
    }

    if cli.headless {
        run_headless(config)
    } else {
        run_gui(config)
    }
}
