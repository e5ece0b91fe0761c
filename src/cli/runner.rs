//! CLI runner - executes commands

use crate::app::App;
use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::collection::PagedCollection;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::loader::load_app_config;
use crate::paging::{PagedQueryState, SortKey};
use crate::types::{LogLevel, PagingMode};
use serde_json::{json, Value};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Log level for this invocation
    ///
    /// `--verbose` wins, then `logger_level` from the configuration, whose
    /// default is used when no file is given or it fails to load.
    pub fn log_level(&self) -> LogLevel {
        if self.cli.verbose {
            return LogLevel::Debug;
        }
        self.load_config()
            .map_or_else(|_| AppConfig::default().logger_level, |config| config.logger_level)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Page { query, page } => self.page(query, *page).await,
            Commands::Walk { query, max_pages } => self.walk(query, *max_pages).await,
            Commands::Params { query, page } => self.params(query, *page),
            Commands::Config => self.show_config(),
            Commands::Validate => self.validate(),
        }
    }

    /// Load configuration, applying command-line overrides
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_app_config(path)?,
            None => AppConfig::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            config.service_invoker.base_url = Some(base_url.clone());
        }
        Ok(config)
    }

    fn assemble(&self) -> Result<App> {
        let config = self.load_config()?;
        if config.service_invoker.base_url.is_none() {
            return Err(Error::config(
                "No base URL configured (use --base-url or service_invoker.base_url)",
            ));
        }
        App::assemble(config)
    }

    /// Fetch one page
    async fn page(&self, query: &QueryArgs, page: u32) -> Result<()> {
        let app = self.assemble()?;
        let collection = app.collection(&query.resource);
        apply_query_args(&collection, query);

        let records = if page == 0 {
            collection.first_page().await?
        } else {
            collection.page(page).await?
        };
        self.print(&page_output(
            &records.unwrap_or_default(),
            &collection.snapshot(),
        ))
    }

    /// Follow next pages until exhausted or `max_pages` is reached
    async fn walk(&self, query: &QueryArgs, max_pages: Option<usize>) -> Result<()> {
        let app = self.assemble()?;
        let collection = app.collection(&query.resource);
        apply_query_args(&collection, query);

        let mut fetched = 0usize;
        let mut records = collection.first_page().await?.unwrap_or_default();
        loop {
            fetched += 1;
            self.print(&page_output(&records, &collection.snapshot()))?;

            if !collection.has_next() || max_pages.is_some_and(|max| fetched >= max) {
                break;
            }
            // An empty offset page means the server has run out even without a total
            if records.is_empty() && collection.snapshot().paging_mode() == PagingMode::Offset {
                debug!("Empty page, stopping");
                break;
            }
            records = collection.next_page().await?.unwrap_or_default();
        }

        info!("Walked {} page(s) of {}", fetched, query.resource);
        Ok(())
    }

    /// Print the query string for a page
    fn params(&self, query: &QueryArgs, page: u32) -> Result<()> {
        let config = self.load_config()?;
        let mut state = PagedQueryState::with_defaults(config.collection);
        configure_state(&mut state, query);
        let params = state.get_page(page);
        println!("{}", params.to_query_string());
        Ok(())
    }

    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -C flag)"))?;
        load_app_config(path)?;
        println!("Configuration '{}' is valid", path.display());
        Ok(())
    }

    fn print(&self, value: &Value) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

fn apply_query_args(collection: &PagedCollection, query: &QueryArgs) {
    if let Some(mode) = &query.mode {
        collection.set_paging_mode(mode);
    }
    if let Some(page_size) = query.page_size {
        collection.set_page_size(page_size);
    }
    if let Some(policy) = &query.policy {
        collection.set_total_count_policy(policy);
    }
    for key in &query.sort {
        collection.add_sort_key(SortKey::parse(key));
    }
    collection.set_query_filter(query.filter.clone());
}

fn configure_state(state: &mut PagedQueryState, query: &QueryArgs) {
    if let Some(mode) = &query.mode {
        state.set_paging_mode(mode);
    }
    if let Some(page_size) = query.page_size {
        state.set_page_size(page_size);
    }
    if let Some(policy) = &query.policy {
        state.set_total_count_policy(policy);
    }
    for key in &query.sort {
        state.add_sort_key(SortKey::parse(key));
    }
    state.set_query_filter(query.filter.clone());
}

/// JSON summary of one page
fn page_output(records: &[Value], state: &PagedQueryState) -> Value {
    json!({
        "page": state.current_page(),
        "paging_mode": state.paging_mode().as_str(),
        "records": records,
        "total_records": state.total_records(),
        "total_pages": state.total_pages(),
        "has_previous": state.has_previous(),
        "has_next": state.has_next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::QueryResponse;
    use std::io::Write;

    #[test]
    fn test_configure_state_from_args() {
        let query = QueryArgs {
            resource: "managed/user".to_string(),
            mode: Some("offset".to_string()),
            page_size: Some(5),
            sort: vec!["-sn".to_string(), "givenName".to_string()],
            filter: Some("true".to_string()),
            policy: Some("ESTIMATE".to_string()),
        };
        let mut state = PagedQueryState::new();
        configure_state(&mut state, &query);

        assert_eq!(
            state.get_page(1).to_query_string(),
            "_pageSize=5&_pagedResultsOffset=5&_sortKeys=-sn%2CgivenName\
             &_totalPagedResultsPolicy=ESTIMATE&_queryFilter=true"
        );
    }

    #[test]
    fn test_page_output() {
        let mut state = PagedQueryState::new();
        let records = state.apply_response(
            QueryResponse::with_records(vec![json!({"_id": "1"})]).total(11),
        );
        let output = page_output(&records, &state);
        assert_eq!(output["page"], 0);
        assert_eq!(output["paging_mode"], "offset");
        assert_eq!(output["total_pages"], 2);
        assert_eq!(output["has_next"], true);
        assert_eq!(output["records"][0]["_id"], "1");
    }

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["crest-pager"];
        argv.extend_from_slice(args);
        Runner::new(<Cli as clap::Parser>::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_log_level_follows_config() {
        assert_eq!(runner(&["config"]).log_level(), AppConfig::default().logger_level);
        assert_eq!(runner(&["config"]).log_level(), LogLevel::Debug);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logger_level: warn").unwrap();
        let path = file.path().to_str().unwrap();

        assert_eq!(runner(&["-C", path, "config"]).log_level(), LogLevel::Warn);
        assert_eq!(runner(&["-C", path, "-v", "config"]).log_level(), LogLevel::Debug);
        assert_eq!(
            runner(&["-C", "/nonexistent/app.yaml", "config"]).log_level(),
            LogLevel::Debug
        );
    }
}
