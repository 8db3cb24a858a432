use std::{fs, path::PathBuf};

use clap::Parser;

use crate::{
    cli::settings::SettingsArgs,
    core::{Settings, orchestrator::RecommendationOrchestrator},
    input::UnitDocument,
    prelude::*,
    tables::{build_comparison_table, build_decision_table},
};

#[derive(Parser)]
pub struct RecommendArgs {
    /// Consumer unit document: contract, energy bills, and tariffs.
    #[clap(long, short, env = "INPUT_PATH")]
    input: PathBuf,

    /// Write the decision as JSON here.
    #[clap(long, short)]
    output: Option<PathBuf>,

    #[clap(flatten)]
    settings: SettingsArgs,
}

impl RecommendArgs {
    pub fn run(self) -> Result {
        let document = UnitDocument::read_from(&self.input)?;
        let tariffs = document.tariffs()?;
        let settings = Settings::try_from(self.settings)?;

        let outcome = RecommendationOrchestrator::builder()
            .consumer_unit(&document.consumer_unit)
            .contract(&document.contract)
            .bills(&document.bills)
            .maybe_blue(tariffs.blue.as_ref())
            .maybe_green(tariffs.green.as_ref())
            .settings(&settings)
            .today(document.today())
            .run();

        if let Some(recommendation) = &outcome.recommendation {
            println!("{}", build_comparison_table(&recommendation.comparison));
        }
        println!("{}", build_decision_table(&outcome.decision));

        let json = serde_json::to_string_pretty(&outcome.decision)?;
        match self.output {
            Some(path) => {
                fs::write(&path, json)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
                info!(path = %path.display(), "written the decision");
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}
