use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::config::{ClassPartition, ClassRule, ClassSpec, SampleSpec};
use crate::constants::app::{
    CLASS_LABEL_720, CLASS_LABEL_1080, CLASS_LABEL_DAY, CLASS_LABEL_NIGHT,
};
use crate::constants::sampler::DEFAULT_SEED;
use crate::run::{RunSummary, generate_test_set};
use crate::transport::fs::FsCorpus;
use crate::types::StratumKey;

#[derive(Debug, Parser)]
#[command(
    name = "generate_test_set",
    disable_help_subcommand = true,
    about = "Sample unique random frames into a performance test set",
    long_about = "Randomly select a target number of distinct frames from one or more corpora \
                  (nested roots with one folder per video, or flat single-pool roots) and copy \
                  them into a destination directory. The target can be split across classes \
                  with fixed quotas by resolution or by day/night stratum lists.",
    after_help = "Runs are deterministic for a fixed --seed. Infeasible targets fail before \
                  any file is copied."
)]
struct GenerateTestSetCli {
    #[arg(
        long = "nested-root",
        value_name = "PATH",
        help = "Corpus root whose immediate subdirectories are strata; repeat as needed"
    )]
    nested_roots: Vec<PathBuf>,
    #[arg(
        long = "flat-root",
        value_name = "KEY=PATH",
        value_parser = parse_flat_root,
        help = "Corpus root treated as a single stratum named KEY; repeat as needed"
    )]
    flat_roots: Vec<(StratumKey, PathBuf)>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Destination directory for the generated test set"
    )]
    destination: PathBuf,
    #[arg(
        long = "test-set-size",
        default_value_t = 8000,
        value_parser = parse_positive_usize,
        help = "Number of unique frames to select"
    )]
    test_set_size: usize,
    #[arg(
        long,
        default_value_t = DEFAULT_SEED,
        help = "Deterministic seed controlling draw order"
    )]
    seed: u64,
    #[arg(
        long = "mixed-ratio",
        value_name = "RATIO",
        value_parser = parse_ratio,
        conflicts_with_all = ["night_keys", "night_ratio"],
        help = "Split the target between flat-root strata (RATIO) and nested-root strata (remainder)"
    )]
    mixed_ratio: Option<f64>,
    #[arg(
        long = "night-keys",
        value_name = "KEY,KEY",
        value_delimiter = ',',
        requires = "night_ratio",
        help = "Stratum keys recorded at night; requires --night-ratio"
    )]
    night_keys: Vec<StratumKey>,
    #[arg(
        long = "night-ratio",
        value_name = "RATIO",
        value_parser = parse_ratio,
        requires = "night_keys",
        help = "Share of the target drawn from night strata"
    )]
    night_ratio: Option<f64>,
    #[arg(long = "summary-json", help = "Print the run summary as JSON")]
    summary_json: bool,
}

/// Run the test-set generator CLI against `args_iter` (program name excluded).
pub fn run_generate_test_set<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) = parse_cli::<GenerateTestSetCli, _>(
        std::iter::once("generate_test_set".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    if cli.nested_roots.is_empty() && cli.flat_roots.is_empty() {
        return Err("at least one --nested-root or --flat-root is required".into());
    }

    let mut corpora: Vec<FsCorpus> = Vec::new();
    let mut flat_keys: Vec<StratumKey> = Vec::new();
    for (key, path) in &cli.flat_roots {
        flat_keys.push(key.clone());
        corpora.push(FsCorpus::flat(path, key.clone()));
    }
    for root in &cli.nested_roots {
        corpora.push(FsCorpus::nested(root));
    }

    let partition = build_partition(&cli, &flat_keys)?;
    let spec = SampleSpec {
        seed: cli.seed,
        total_target: cli.test_set_size,
        partition,
    };
    let summary = generate_test_set(&corpora, &spec, &cli.destination)?;
    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &cli.destination);
    }
    Ok(())
}

fn build_partition(
    cli: &GenerateTestSetCli,
    flat_keys: &[StratumKey],
) -> Result<Option<ClassPartition>, Box<dyn Error>> {
    if let Some(ratio) = cli.mixed_ratio {
        if flat_keys.is_empty() || cli.nested_roots.is_empty() {
            return Err(
                "--mixed-ratio requires at least one --flat-root and one --nested-root".into(),
            );
        }
        let flat_set = flat_keys.iter().cloned().collect();
        let partition = ClassPartition::new(vec![
            ClassSpec {
                label: CLASS_LABEL_720.into(),
                proportion: ratio,
                rule: ClassRule::KeysIn(flat_set),
            },
            ClassSpec {
                label: CLASS_LABEL_1080.into(),
                proportion: 1.0 - ratio,
                rule: ClassRule::KeysNotIn(flat_keys.iter().cloned().collect()),
            },
        ])?;
        return Ok(Some(partition));
    }
    if let Some(ratio) = cli.night_ratio {
        let night_set = cli.night_keys.iter().cloned().collect();
        let partition = ClassPartition::new(vec![
            ClassSpec {
                label: CLASS_LABEL_NIGHT.into(),
                proportion: ratio,
                rule: ClassRule::KeysIn(night_set),
            },
            ClassSpec {
                label: CLASS_LABEL_DAY.into(),
                proportion: 1.0 - ratio,
                rule: ClassRule::KeysNotIn(cli.night_keys.iter().cloned().collect()),
            },
        ])?;
        return Ok(Some(partition));
    }
    Ok(None)
}

fn print_summary(summary: &RunSummary, destination: &std::path::Path) {
    println!(
        "copied {} frames into {}",
        summary.copied,
        destination.display()
    );
    for (class, count) in &summary.per_class_counts {
        println!("  {class}: {count}");
    }
    if let Some(skew) = &summary.stratum_skew {
        println!(
            "  strata: {} (largest share {:.1}%, max/min ratio {:.2})",
            skew.strata,
            skew.max_share * 100.0,
            skew.ratio
        );
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("could not parse '{raw}' as a positive integer"))?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_ratio(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid ratio '{raw}': must be a float"))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("ratio '{raw}' must be within [0.0, 1.0]"));
    }
    Ok(parsed)
}

fn parse_flat_root(raw: &str) -> Result<(StratumKey, PathBuf), String> {
    let (key, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PATH, got '{raw}'"))?;
    if key.is_empty() || path.is_empty() {
        return Err(format!("expected a non-empty KEY=PATH, got '{raw}'"));
    }
    Ok((key.to_string(), PathBuf::from(path)))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_root_parser_requires_key_and_path() {
        let (key, path) = parse_flat_root("720=/data/720").unwrap();
        assert_eq!(key, "720");
        assert_eq!(path, PathBuf::from("/data/720"));
        assert!(parse_flat_root("/data/720").is_err());
        assert!(parse_flat_root("=path").is_err());
        assert!(parse_flat_root("key=").is_err());
    }

    #[test]
    fn ratio_parser_bounds_input() {
        assert_eq!(parse_ratio("0.5").unwrap(), 0.5);
        assert!(parse_ratio("1.5").is_err());
        assert!(parse_ratio("-0.1").is_err());
        assert!(parse_ratio("half").is_err());
    }

    #[test]
    fn positive_usize_parser_rejects_zero() {
        assert_eq!(parse_positive_usize("8000").unwrap(), 8000);
        assert!(parse_positive_usize("0").is_err());
        assert!(parse_positive_usize("many").is_err());
    }

    #[test]
    fn cli_requires_a_source_root() {
        let args = ["--destination", "/tmp/out"]
            .iter()
            .map(|arg| (*arg).to_string());
        let err = run_generate_test_set(args).unwrap_err();
        assert!(err.to_string().contains("--nested-root"));
    }
}
