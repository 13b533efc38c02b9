//! CNES extract importer
//!
//! Reads the CNES CSV extracts and loads them through the same application
//! services the API uses, so every row gets the API's validation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cnes_api::config::Config;
use cnes_api::{connect_database, AppState, Repositories};

mod loader;
mod reader;
mod records;

use loader::{CnesData, Loader};
use reader::read_rows;

/// Load CNES extracts into the registry database
#[derive(Debug, Parser)]
#[command(name = "cnes-import", version)]
struct Args {
    /// Directory holding the extracts
    #[arg(short, long, env = "CNES_DATA_DIR", default_value = ".")]
    dir: PathBuf,

    /// Year-month of the extract (YYYYMM), used in the mantenedora and
    /// estabelecimento file names
    #[arg(short, long, env = "CNES_COMPETENCIA", default_value = "202501")]
    competencia: String,

    /// Override for tbMantenedora{competencia}.csv
    #[arg(long)]
    mantenedoras: Option<PathBuf>,

    /// Override for tbEstabelecimento{competencia}.csv
    #[arg(long)]
    estabelecimentos: Option<PathBuf>,

    /// Override for tbEquipe.csv
    #[arg(long)]
    equipes: Option<PathBuf>,

    /// Override for tbProf.csv
    #[arg(long)]
    profissionais: Option<PathBuf>,

    /// Override for tbEquipeProf.csv
    #[arg(long)]
    equipeprofs: Option<PathBuf>,
}

impl Args {
    fn path(&self, explicit: &Option<PathBuf>, default_name: String) -> PathBuf {
        explicit
            .clone()
            .unwrap_or_else(|| self.dir.join(default_name))
    }

    fn read(&self) -> anyhow::Result<CnesData> {
        let competencia = &self.competencia;
        Ok(CnesData {
            mantenedoras: read_rows(
                &self.path(&self.mantenedoras, format!("tbMantenedora{}.csv", competencia)),
            )?,
            estabelecimentos: read_rows(&self.path(
                &self.estabelecimentos,
                format!("tbEstabelecimento{}.csv", competencia),
            ))?,
            equipes: read_rows(&self.path(&self.equipes, "tbEquipe.csv".to_string()))?,
            profissionais: read_rows(&self.path(&self.profissionais, "tbProf.csv".to_string()))?,
            equipeprofs: read_rows(
                &self.path(&self.equipeprofs, "tbEquipeProf.csv".to_string()),
            )?,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cnes_import=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let data = args.read().context("Failed to read CNES extracts")?;

    let config = Config::from_env();
    tracing::info!("Connecting to database...");
    let db = connect_database(&config)
        .await
        .context("Failed to connect to database")?;

    let loader = Loader::new(AppState::new(Repositories::postgres(db)));
    let report = loader.run(&data).await;

    tracing::info!("Import finished\n{}", report);
    if report.failed() > 0 {
        tracing::warn!("{} rows failed to import", report.failed());
    }
    Ok(())
}
