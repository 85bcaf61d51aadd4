//! Shared command context: configuration, logging, storage

use clap::Args;
use localstore_core::logging_facility::{self, Profile};
use localstore_core::SessionConfig;
use localstore_store::{FileStorage, InitOutcome, LocalStoreSession};
use std::path::PathBuf;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding persisted values (overrides config)
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Storage key the snapshot is kept under (overrides config)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Logging profile: development, production or off (overrides config)
    #[arg(long, global = true)]
    pub log: Option<Profile>,
}

pub struct AppContext {
    pub config: SessionConfig,
}

impl AppContext {
    /// Resolve configuration (file, then flags) and start logging
    pub fn from_args(args: &GlobalArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(dir) = &args.storage_dir {
            config.storage_dir = dir.clone();
        }
        if let Some(key) = &args.key {
            config.storage_key = key.clone();
        }
        if let Some(profile) = args.log {
            config.log_profile = profile;
        }

        logging_facility::init(config.log_profile);
        tracing::debug!(
            storage_dir = %config.storage_dir.display(),
            storage_key = %config.storage_key,
            "Resolved configuration"
        );

        Ok(Self { config })
    }

    /// A session over the configured storage, not yet initialized
    pub fn session(&self) -> LocalStoreSession<FileStorage> {
        LocalStoreSession::from_config(FileStorage::new(&self.config.storage_dir), &self.config)
    }

    /// An initialized session; a recovered start is reported on stderr
    pub fn open_session(&self) -> CliResult<LocalStoreSession<FileStorage>> {
        let mut session = self.session();
        let outcome = session.initialize()?;
        report_outcome(&outcome);
        Ok(session)
    }
}

pub fn report_outcome(outcome: &InitOutcome) {
    if let Some(cause) = outcome.cause() {
        eprintln!("warning: stored snapshot ignored, starting empty: {}", cause);
    }
}
