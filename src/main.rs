//! Analyze a local swing video and print the metrics report as JSON.
//!
//! Usage: swing-analyzer <video> [--config <path>] [--side left|right]

use anyhow::Result;
use swing_analyzer::analyzer::SwingAnalyzer;
use swing_analyzer::config::{Config, DominantSide};
use swing_analyzer::swing::ANALYSIS_VERSION;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn print_usage() {
    eprintln!("Usage: swing-analyzer <video> [--config <path>] [--side left|right]");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut video_path: Option<String> = None;
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut side_override: Option<DominantSide> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    print_usage();
                    anyhow::bail!("--config requires a path");
                };
                config_path = value.clone();
            }
            "--side" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    print_usage();
                    anyhow::bail!("--side requires left or right");
                };
                side_override = Some(match value.as_str() {
                    "left" => DominantSide::Left,
                    "right" => DominantSide::Right,
                    other => {
                        print_usage();
                        anyhow::bail!("unknown side: {}", other);
                    }
                });
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other if video_path.is_none() && !other.starts_with('-') => {
                video_path = Some(other.to_string());
            }
            other => {
                print_usage();
                anyhow::bail!("unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let Some(video_path) = video_path else {
        print_usage();
        anyhow::bail!("video path is required");
    };

    let mut config = Config::load_or_default(&config_path);
    if let Some(side) = side_override {
        config.analysis.dominant_side = side;
    }

    eprintln!(
        "swing-analyzer {} (analysis {})",
        env!("GIT_VERSION"),
        ANALYSIS_VERSION
    );
    eprintln!("Model: {}", config.detector.model_path);

    let mut analyzer = SwingAnalyzer::new(config)?;

    eprintln!("Analyzing: {}", video_path);
    match analyzer.analyze_file(&video_path) {
        Ok(metrics) => {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Rejected [{}]: {}", e.code(), e);
            std::process::exit(1);
        }
    }
}
