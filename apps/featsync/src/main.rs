use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use featsync_config::load_config;
use featsync_engine::Engine;
use featsync_ingest_azure::AzureTestPlanClient;
use featsync_store::DirectoryStore;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "featsync")]
#[command(about = "Sync Azure DevOps test plans into Gherkin feature files.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync every suite of a test plan into one feature document each.
    Sync {
        /// Sync configuration file.
        #[arg(long, default_value = "ado_config.json")]
        config: PathBuf,
        /// Test plan id (defaults to the configured one).
        #[arg(long)]
        plan: Option<u64>,
        /// Personal access token (or set FEATSYNC_PAT; falls back to the config file).
        #[arg(long)]
        token: Option<String>,
        /// Output folder for the feature documents (defaults to the configured one).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
        /// API base for on-prem servers.
        #[arg(long, default_value = "https://dev.azure.com")]
        api_base: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Sync {
            config,
            plan,
            token,
            out,
            timeout_secs,
            api_base,
        } => {
            let config = load_config(&config)?;

            let token = token
                .or_else(|| std::env::var("FEATSYNC_PAT").ok().filter(|t| !t.is_empty()))
                .unwrap_or_else(|| config.credentials.personal_access_token.clone());
            if token.is_empty() {
                bail!(
                    "no personal access token: pass --token, set FEATSYNC_PAT, or fill the config file"
                );
            }

            let plan_id = plan.unwrap_or(config.constants.test_plan_id);
            let out_dir = out.unwrap_or_else(|| config.paths.tests.clone());

            let mut client = AzureTestPlanClient::new(
                config.credentials.organization_name.clone(),
                config.credentials.project_name.clone(),
                token,
            );
            client.timeout = Duration::from_secs(timeout_secs);
            client.api_base = api_base;

            let store = DirectoryStore::new(&out_dir);
            let engine = Engine::new(&client, &store);
            let summary = engine.sync_plan(plan_id)?;

            println!(
                "done: {} of {} suites written, {} empty, {} test cases skipped",
                summary.documents_written,
                summary.suites,
                summary.suites_empty,
                summary.test_cases_skipped
            );
        }
    }

    Ok(())
}
