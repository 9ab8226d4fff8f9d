//! get-counties command

use clap::Args;

use super::{Cli, CliError};

/// Arguments for the county listing command
#[derive(Debug, Args)]
pub struct GetCountiesArgs {}

impl GetCountiesArgs {
    /// Fetch the county listing and print it as indented JSON.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let api = cli.build_api();
        let counties = api.counties().await?;
        println!("{}", serde_json::to_string_pretty(&counties)?);
        Ok(())
    }
}
