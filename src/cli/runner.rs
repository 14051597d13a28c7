//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::FleetClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::resources::Resource;
use crate::types::{query_params, QueryParams};
use serde_json::{json, Value};
use std::time::Instant;
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
        match &self.cli.command {
            Commands::Resources => {
                self.resources();
                Ok(())
            }
            Commands::Page {
                resource,
                page,
                per_page,
                params,
            } => self.page(resource, *page, *per_page, params).await,
            Commands::List {
                resource,
                per_page,
                limit,
                params,
            } => self.list(resource, *per_page, *limit, params).await,
        }
    }

    /// Config file (if any) overlaid with the environment
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?.with_env_overrides(),
            None => ClientConfig::from_env(),
        }
    }

    fn client(&self) -> Result<FleetClient> {
        FleetClient::new(self.load_config()?)
    }

    fn resources(&self) {
        for resource in Resource::all() {
            self.output(&json!(resource));
        }
    }

    async fn page(
        &self,
        name: &str,
        page: u32,
        per_page: Option<u32>,
        params: &[(String, String)],
    ) -> Result<()> {
        let resource = Resource::by_name(name)?;
        let client = self.client()?;
        let per_page = per_page.unwrap_or(client.default_page_size());

        let result = client
            .paginate(&resource, page, per_page, &to_query(params))
            .await?;

        self.output(&json!({
            "resource": resource.name,
            "pagination": {
                "total": result.total(),
                "per_page": result.per_page(),
                "current_page": result.current_page(),
                "last_page": result.last_page(),
                "has_more_pages": result.has_more_pages(),
            },
            "items": result.items(),
        }));

        Ok(())
    }

    async fn list(
        &self,
        name: &str,
        per_page: Option<u32>,
        limit: Option<usize>,
        params: &[(String, String)],
    ) -> Result<()> {
        let resource = Resource::by_name(name)?;
        let client = self.client()?;
        let per_page = per_page.unwrap_or(client.default_page_size());
        let start = Instant::now();

        let mut cursor = client.cursor(&resource, per_page, to_query(params));
        let mut records = 0usize;

        while limit.map_or(true, |max| records < max) {
            let Some(item) = cursor.try_next().await? else {
                break;
            };
            self.output(&item);
            records += 1;
        }

        info!(
            resource = resource.name,
            records,
            pages = cursor.pages_fetched(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Listing complete"
        );

        Ok(())
    }

    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

fn to_query(params: &[(String, String)]) -> QueryParams {
    query_params(params.iter().cloned())
}
