use crate::cli::Cli;
use crate::commands::{load_profile, Result};
use crate::output::{format_output, OutputData};
use colpofind_core::output::{load_candidates, save_results};
use colpofind_core::AggregationPipeline;
use std::path::{Path, PathBuf};
use tracing::info;

/// Offline ranking: every file is one batch, in argument order.
pub fn run(cli: &Cli, files: &[PathBuf], profile: Option<&str>, save: Option<&Path>) -> Result<()> {
    let profile = load_profile(profile)?;
    let pipeline = AggregationPipeline::from_profile(&profile)?;

    let mut batches = Vec::with_capacity(files.len());
    for file in files {
        let batch = load_candidates(file)?;
        info!("Loaded {} records from {}", batch.len(), file.display());
        batches.push(batch);
    }

    let papers = pipeline.run(batches);

    let saved_to = match save {
        Some(path) => {
            save_results(&papers, path)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let output_data = OutputData::RankedPapers {
        profile: profile.name,
        papers,
        errors: Vec::new(),
        saved_to,
    };
    format_output(&output_data, &cli.output)
}
