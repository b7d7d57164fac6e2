//! Replay a recorded landmark stream through the detection pipeline.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use log::{info, warn};
use nmf_detection::{
    config::Config,
    dataset::DatasetWriter,
    pipeline::Pipeline,
    recording::read_events,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["input", "print_config"])))]
struct Args {
    /// Recorded landmark stream (JSON lines)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Label for a dataset snapshot taken after the replay
    #[arg(short, long, requires = "dataset")]
    label: Option<String>,

    /// Dataset CSV to append the labeled snapshot to
    #[arg(long, requires = "label")]
    dataset: Option<PathBuf>,

    /// Print the transcript newest entry first
    #[arg(long)]
    newest_first: bool,

    /// Print every frame's label text
    #[arg(long)]
    frames: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The "mode" group guarantees exactly one of --input and --print-config
    let Some(input) = &args.input else {
        debug_assert!(args.print_config);
        print!("{}", nmf_detection::config::EXAMPLE_CONFIG);
        return Ok(());
    };

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    let mut pipeline = Pipeline::new(&config).context("invalid configuration")?;

    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let events = read_events(BufReader::new(file))?;
    info!("Replaying {} events from {}", events.len(), input.display());

    for event in events {
        let t_ms = event.t_ms;
        let output = event.apply(&mut pipeline);
        if args.frames && !output.classification.is_absent() {
            println!("{t_ms:>8}  {}", output.classification.text);
        }
    }

    println!("Transcript:");
    let entries: Vec<_> = if args.newest_first {
        pipeline.transcript().newest_first().collect()
    } else {
        pipeline.transcript().oldest_first().collect()
    };
    for entry in entries {
        println!("{:>8}ms  {}", entry.timestamp.as_millis(), entry.text);
    }

    if let Some(features) = pipeline.smoothed() {
        println!("Features: {}", serde_json::to_string(&features)?);
    }

    if let (Some(label), Some(path)) = (&args.label, &args.dataset) {
        match pipeline.snapshot(label) {
            Ok(snapshot) => {
                let mut writer = DatasetWriter::append_to_path(path)?.with_precision(config.dataset.precision)?;
                writer.write(&snapshot)?;
                writer.into_inner()?;
                info!("Saved '{}' snapshot to {}", label, path.display());
            }
            Err(nmf_detection::Error::NothingToSave) => {
                warn!("No face seen in the recording, nothing to save");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_or_print_config_required() {
        assert!(Args::try_parse_from(["nmf-replay"]).is_err());
        assert!(Args::try_parse_from(["nmf-replay", "--print-config", "-i", "rec.jsonl"]).is_err());

        let args = Args::try_parse_from(["nmf-replay", "--print-config"]).unwrap();
        assert!(args.input.is_none());
        let args = Args::try_parse_from(["nmf-replay", "-i", "rec.jsonl", "-C", "cfg.yaml"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("rec.jsonl")));
        assert!(!args.print_config);
    }

    #[test]
    fn test_label_and_dataset_go_together() {
        assert!(Args::try_parse_from(["nmf-replay", "-i", "r", "--label", "x"]).is_err());
        assert!(Args::try_parse_from(["nmf-replay", "-i", "r", "--dataset", "d.csv"]).is_err());
        assert!(Args::try_parse_from(["nmf-replay", "-i", "r", "--label", "x", "--dataset", "d.csv"]).is_ok());
    }
}
