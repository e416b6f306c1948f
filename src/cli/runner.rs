//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{parse_config, parse_config_str, HarvestConfig};
use crate::error::{Error, Result};
use crate::fetch::HttpPageFetcher;
use crate::harvest::{HarvestReport, Harvester};
use crate::http::HttpClient;
use crate::output::ObjectStoreSink;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match self.cli.command {
            Commands::Run => {
                let report = self.harvest(&config).await?;
                info!("Harvest finished in {}ms", report.duration_ms());
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
            Commands::Probe => self.probe(&config).await,
            Commands::Validate => {
                print!("{}", serde_yaml::to_string(&config)?);
                Ok(())
            }
        }
    }

    /// Load the input document and apply command-line overrides
    pub fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = match (&self.cli.input, &self.cli.input_json) {
            (Some(_), Some(_)) => {
                return Err(Error::config(
                    "Use either --input or --input-json, not both",
                ))
            }
            (Some(path), None) => parse_config(path)?,
            (None, Some(json)) => parse_config_str(json)?,
            (None, None) => {
                return Err(Error::config(
                    "Input is missing: pass --input <file> or --input-json <json>",
                ))
            }
        };

        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }
        if let Some(concurrency) = self.cli.concurrency {
            config.max_concurrent_requests = concurrency;
        }
        if let Some(store) = &self.cli.store {
            config.store.clone_from(store);
        }
        if let Some(key) = &self.cli.key {
            config.key.clone_from(key);
        }

        config.validate()?;
        Ok(config)
    }

    /// Run a full harvest and store the result
    pub async fn harvest(&self, config: &HarvestConfig) -> Result<HarvestReport> {
        let sink = ObjectStoreSink::parse(&config.store)?;
        let harvester = build_harvester(config)?;

        info!(
            "Harvesting {} into {} (key '{}', page size {}, concurrency {})",
            config.source.endpoint,
            config.store,
            config.key,
            config.page_size,
            config.max_concurrent_requests
        );

        harvester
            .harvest(
                config.page_size,
                config.max_concurrent_requests,
                &sink,
                &config.key,
            )
            .await
    }

    async fn probe(&self, config: &HarvestConfig) -> Result<()> {
        let plan = build_harvester(config)?.plan(config.page_size).await?;

        let output = json!({
            "total_items": plan.total_items,
            "page_size": plan.page_size,
            "page_count": plan.page_count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn build_harvester(config: &HarvestConfig) -> Result<Harvester> {
    let client = HttpClient::new(config.http.client_config())?;
    let fetcher = HttpPageFetcher::new(client, config.source.clone());
    Ok(Harvester::new(Arc::new(fetcher)))
}
