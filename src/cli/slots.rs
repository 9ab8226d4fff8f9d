//! get-available-slots command

use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use super::{Cli, CliError};
use crate::output::OutputFormat;
use crate::upload::Uploader;

/// Arguments for the slot enumeration command
#[derive(Debug, Args)]
pub struct GetAvailableSlotsArgs {
    /// Output format: csv, csv_by_centre, csv_by_date or json
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Number of months to check, starting with the current one
    #[arg(long, default_value_t = 2)]
    pub months: u32,

    /// Output file; stdout when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Remote document name to upload the output file under
    #[arg(long)]
    pub upload_title: Option<String>,
}

impl GetAvailableSlotsArgs {
    /// Enumerate slots for every centre and write the report.
    ///
    /// The output format is validated before any network activity. On failure
    /// a partially written output file is left in place.
    pub async fn execute(
        &self,
        cli: &Cli,
        uploader: Option<&dyn Uploader>,
    ) -> Result<(), CliError> {
        let format = OutputFormat::from_str(&self.format)?;
        if self.upload_title.is_some() && self.file.is_none() {
            return Err(CliError::InvalidArgument(
                "--upload-title requires --file".to_string(),
            ));
        }
        if self.upload_title.is_some() && uploader.is_none() {
            return Err(CliError::InvalidArgument(
                "no upload backend is configured".to_string(),
            ));
        }

        let api = cli.build_api();
        let sink: Box<dyn Write> = match &self.file {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout()),
        };

        let mut writer = format.writer(sink);
        writer.start()?;
        let mut pairs = api.available_slots_for_all_centres(self.months);
        let mut records: u64 = 0;
        while let Some((centre, slot)) = pairs.next().await? {
            writer.write(&centre, &slot)?;
            records += 1;
        }
        writer.finish()?;
        info!(records, format = %format, "slot enumeration complete");

        if let (Some(uploader), Some(title), Some(file)) =
            (uploader, &self.upload_title, &self.file)
        {
            uploader
                .upload(file, title, format.mime_type(), format.mime_type())
                .await?;
            info!(title = %title, "report uploaded");
        }

        Ok(())
    }
}
