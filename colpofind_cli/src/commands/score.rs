use crate::cli::Cli;
use crate::commands::{load_profile, Result};
use crate::output::{format_output, OutputData};
use colpofind_core::AggregationPipeline;

pub fn run(cli: &Cli, title: &str, abstract_text: Option<&str>, profile: Option<&str>) -> Result<()> {
    let profile = load_profile(profile)?;
    let pipeline = AggregationPipeline::from_profile(&profile)?;
    let abstract_text = abstract_text.unwrap_or_default();

    let relevant = pipeline.classifier().is_relevant(title)
        || pipeline.classifier().is_relevant(abstract_text);
    let score = pipeline.scorer().score(title, abstract_text);

    let output_data = OutputData::ScoreResult {
        title: title.to_string(),
        relevant,
        score,
    };
    format_output(&output_data, &cli.output)
}
