//! seqdedup CLI - Alignment-Free Deduplication for Short-Read FASTQ

use clap::Parser;
use seqdedup::config::{CliArgs, Commands, DedupConfig, OutputFormat};
use seqdedup::error::Result;
use seqdedup::pipeline::{self, DedupPipeline, DedupReport, TallyReport};
use seqdedup::progress::ProgressReporter;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Commands::Dedup {
            input,
            output,
            max_distance,
            use_edit,
            policy,
            check_lengths,
        } => {
            let config = DedupConfig::from_dedup_args(
                input,
                output,
                max_distance,
                use_edit,
                policy,
                check_lengths,
            )?;

            if args.verbose > 0 {
                print_dedup_config(&config);
            }

            let progress = if args.quiet {
                ProgressReporter::disabled()
            } else {
                ProgressReporter::new()
            };

            let report = DedupPipeline::new(config).with_progress(progress).run()?;

            if !args.quiet {
                print_dedup_report(&report, args.output_format)?;
            }

            Ok(())
        }
        Commands::Tally { input } => {
            let report = pipeline::tally(&input)?;

            if !args.quiet {
                print_tally_report(&report, args.output_format)?;
            }

            Ok(())
        }
    }
}

fn print_dedup_config(config: &DedupConfig) {
    println!("=== Configuration ===");
    println!("Input:        {:?}", config.inputs);
    println!("Output:       {:?}", config.outputs);
    println!("Max distance: {}", config.max_distance);
    println!("Use edit:     {}", config.use_edit);
    println!("Policy:       {:?}", config.policy);
    println!();
}

fn print_dedup_report(report: &DedupReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("=== seqdedup report ===");
            println!("Records read:    {}", report.records_read);
            println!("Distinct keys:   {}", report.distinct_keys);
            println!("Clusters:        {}", report.clusters);
            println!("Records written: {}", report.records_written);
            println!("Elapsed:         {:.2}s", report.elapsed_secs);
        }
    }
    Ok(())
}

fn print_tally_report(report: &TallyReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("=== seqdedup tally ===");
            println!("Records read:  {}", report.records_read);
            println!("Distinct keys: {}", report.distinct_keys);
            println!(
                "Memory size:   {}",
                humansize::format_size(report.memory_size as u64, humansize::BINARY)
            );
            println!("Raw stats (per depth, [terminal, 1-child, 2-child, ...]):");
            for (depth, row) in report.raw_stats.iter().enumerate() {
                println!("  depth {depth}: {row:?}");
            }
        }
    }
    Ok(())
}
