use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use seoscope_core::{AnalyzerConfig, analyze_url};

mod report;

#[derive(Parser, Debug)]
#[command(name = "seoscope")]
#[command(author = "Pon Datalab")]
#[command(about = "seoscope — score a web page's on-page SEO and list what to fix")]
#[command(version)]
struct Args {
    /// Page to analyze (http or https)
    url: String,

    /// Print the full analysis as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Also save the JSON analysis to this file
    #[arg(short, long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Load analyzer settings from a JSON file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Page fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip the HEAD requests that check image sizes
    #[arg(long)]
    no_image_probe: bool,
}

impl Args {
    fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if self.no_image_probe {
            config.probe_images = false;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.analyzer_config()?;
    log::debug!("analyzer config: {:?}", config);

    let analysis = analyze_url(&args.url, &config)
        .await
        .with_context(|| format!("analysis failed for {}", args.url))?;

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(&analysis)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write analysis to {}", path.display()))?;
        log::info!("saved analysis to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render(&analysis));
    }

    Ok(())
}
