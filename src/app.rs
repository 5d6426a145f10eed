use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::config::MergeQualityConfig;
use crate::merge_quality::{SamplePreview, build_merge_quality_dataset, write_merge_quality_dataset};
use crate::personal_data::PersonalDataGenerator;

#[derive(Debug, Parser)]
#[command(
    name = "merge_quality",
    disable_help_subcommand = true,
    about = "Generate the merge-quality dataset",
    long_about = "Build synthetic identities, scatter their ground-truth fields across JSON, XML, and Markdown chunks mixed with distractors, and write the samples as JSON lines.",
    after_help = "Settings are resolved in order by explicit flag, YAML config file, then built-in defaults."
)]
/// CLI for `merge_quality`.
///
/// Common usage:
/// - Built-in defaults: `merge_quality`
/// - Load settings from YAML: `--config configs/merge_quality.yaml`
/// - Override single settings: `--seed 1337 --dataset-size 10 --preview-samples 2`
struct MergeQualityCli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Optional YAML file with merge-quality settings"
    )]
    config: Option<PathBuf>,
    #[arg(long, help = "Optional deterministic seed override")]
    seed: Option<u64>,
    #[arg(
        long = "dataset-size",
        value_parser = parse_positive_usize,
        help = "Optional number of target identities"
    )]
    dataset_size: Option<usize>,
    #[arg(
        long = "output-file",
        value_name = "PATH",
        help = "Optional output path for the JSONL dataset"
    )]
    output_file: Option<PathBuf>,
    #[arg(
        long = "preview-samples",
        help = "Number of sample summaries printed after writing"
    )]
    preview_samples: Option<usize>,
}

impl MergeQualityCli {
    fn resolve_config(&self) -> Result<MergeQualityConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => MergeQualityConfig::from_yaml_path(path)?,
            None => MergeQualityConfig::default(),
        };
        config.random_seed = self.seed.unwrap_or(config.random_seed);
        config.dataset_size = self.dataset_size.unwrap_or(config.dataset_size);
        if let Some(output_file) = &self.output_file {
            config.output_file = output_file.clone();
        }
        config.preview_samples = self.preview_samples.unwrap_or(config.preview_samples);
        config.validate()?;
        Ok(config)
    }
}

/// Entry point of the `merge_quality` binary; `args_iter` excludes the program name.
pub fn run_merge_quality<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<MergeQualityCli, _>(
        std::iter::once("merge_quality".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = cli.resolve_config()?;
    let mut generator = PersonalDataGenerator::new(config.random_seed);
    let samples = build_merge_quality_dataset(&mut generator, &config)?;
    let output_path = write_merge_quality_dataset(&samples, &config.output_file)?;
    println!("Dataset written to {}", output_path.display());

    let preview_count = config.preview_samples.min(samples.len());
    if preview_count > 0 {
        println!("Preview:");
        for sample in &samples[..preview_count] {
            let preview = SamplePreview::from_sample(sample);
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
    }

    Ok(())
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --dataset-size value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--dataset-size must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
