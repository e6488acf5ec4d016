use crate::cli::{Cli, SearchArgs};
use crate::commands::{load_profile, split_list, CommandError, Result};
use crate::output::{format_output, OutputData};
use colpofind_core::output::{default_results_filename, save_results};
use colpofind_core::profiles::SearchProfile;
use colpofind_core::{build_registry_enabled_only, AggregationPipeline, Collector};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};

/// Collect from every profile source, run the pipeline, print and save.
pub async fn run(cli: &Cli, args: &SearchArgs) -> Result<()> {
    let profile = build_profile(args)?;
    let pipeline = AggregationPipeline::from_profile(&profile)?;

    let registry = build_registry_enabled_only()?;
    if !profile.sources.iter().any(|s| registry.get(s).is_some()) {
        return Err(CommandError::NoSources(format!(
            "profile asks for [{}], this build provides [{}]",
            profile.sources.join(", "),
            registry.names().join(", ")
        )));
    }

    info!(
        "Searching for cervical cancer papers using {}...",
        profile.dataset
    );

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!(
        "Searching {} for {} queries...",
        profile.sources.join(", "),
        profile.queries.len()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = Collector::new(&registry).collect(&profile).await;
    spinner.finish_and_clear();

    for err in &report.errors {
        warn!("{} failed for '{}': {}", err.source, err.query, err.error);
    }

    let errors = report.errors.clone();
    let papers = pipeline.run(report.into_batches());

    let saved_to = match save_target(args) {
        Some(path) => {
            save_results(&papers, &path)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let output_data = OutputData::RankedPapers {
        profile: profile.name.clone(),
        papers,
        errors,
        saved_to,
    };
    format_output(&output_data, &cli.output)
}

/// The profile named by `--profile`, with the command-line overrides applied.
fn build_profile(args: &SearchArgs) -> Result<SearchProfile> {
    let mut profile = load_profile(args.profile.as_deref())?;

    if let Some(dataset) = &args.dataset {
        profile.dataset = dataset.clone();
    }
    if let Some(sources) = &args.sources {
        let sources = split_list(sources);
        if sources.is_empty() {
            return Err(CommandError::InvalidInput(
                "--sources needs at least one source name".to_string(),
            ));
        }
        profile.sources = sources;
    }
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(CommandError::InvalidInput(
                "--limit must be at least 1".to_string(),
            ));
        }
        profile.limit = limit;
    }
    if let Some(pages) = args.pages {
        profile.scholar_pages = pages;
    }

    Ok(profile)
}

fn save_target(args: &SearchArgs) -> Option<PathBuf> {
    if args.no_save {
        return None;
    }
    Some(
        args.save
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_results_filename(&chrono::Local::now()))),
    )
}
