mod harvest;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sfharvest_core::StorefrontName;

#[derive(Debug, Parser)]
#[command(name = "sfharvest")]
#[command(about = "Harvest a storefront's product catalog into a local per-channel store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a storefront and merge its listing into the channel store.
    Harvest {
        /// Storefront URL (e.g. `https://smartstore.naver.com/beanshop`) or bare name.
        store: String,
        /// Products per listing page.
        #[arg(long)]
        page_size: Option<u32>,
        /// Directory holding the per-channel store files.
        #[arg(long)]
        db_dir: Option<PathBuf>,
    },
    /// Print records stored for a channel.
    Show {
        /// Channel name as printed by `harvest`.
        channel: String,
        /// Maximum number of records to print.
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        db_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = sfharvest_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Harvest {
            store,
            page_size,
            db_dir,
        } => {
            if let Some(page_size) = page_size {
                anyhow::ensure!(page_size > 0, "--page-size must be at least 1");
                config.page_size = page_size;
            }
            let db_dir = db_dir.unwrap_or_else(|| config.db_dir.clone());
            let storefront = StorefrontName::from_input(&config.base_url, &store)?;

            tracing::info!(
                env = %config.env,
                storefront = %storefront,
                base_url = %config.base_url,
                page_size = config.page_size,
                db_dir = %db_dir.display(),
                "starting harvest"
            );

            let report = harvest::harvest_storefront(&config, &storefront, &db_dir)
                .await
                .inspect_err(|e| tracing::error!(storefront = %storefront, error = %e, "harvest aborted"))?;

            println!("{}", report.channel_name);
        }
        Commands::Show {
            channel,
            limit,
            db_dir,
        } => {
            let db_dir = db_dir.unwrap_or_else(|| config.db_dir.clone());
            show::run_show(&db_dir, &channel, limit).await?;
        }
    }

    Ok(())
}
