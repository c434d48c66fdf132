//! Command handlers
//!
//! Each handler prints its response to stdout and returns the process exit
//! code. Failures are reported on stderr.

use super::commands::{ChecklistArgs, GetArgs, ListArgs, LoadArgs, SearchArgs, UsesArgs};
use super::output::{LoadReport, OutputFormatter};
use crate::cache::PackageCache;
use crate::checklist::ChecklistFetcher;
use crate::config::SailConfig;
use crate::deployment::DeploymentClient;
use crate::loader::{resolve_app_uuid, LoadError, PackageLoader};
use crate::store::ObjectStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration plus the loader every command works against.
pub struct Session {
    config: SailConfig,
    loader: PackageLoader,
}

impl Session {
    pub fn new(config: SailConfig) -> Result<Self> {
        let cache = PackageCache::from_config(&config)?;
        let mut loader = PackageLoader::new(Arc::new(ObjectStore::new()), cache);

        match config.deployment_credentials() {
            Some(credentials) => {
                let client = DeploymentClient::new(credentials, config.request_timeout())
                    .context("Failed to create deployment client")?
                    .with_polling(config.poll_interval(), config.max_polls);
                debug!("Live export enabled: {:?}", client);
                loader = loader.with_exporter(Arc::new(client));
            }
            None => debug!("APPIAN_URL or APPIAN_API_KEY not set, live export disabled"),
        }

        Ok(Self { config, loader })
    }

    pub fn loader(&self) -> &PackageLoader {
        &self.loader
    }

    /// Loads the package cache, then `APPIAN_LOCAL_ZIP` if configured. A
    /// missing local zip is a warning, not an error.
    pub fn preload(&self) {
        self.loader.load_cached_packages();

        let Some(local_zip) = &self.config.local_zip else {
            return;
        };
        let path = local_zip.to_string_lossy();
        match self.loader.load_local_zip(&path, &self.config.app_name) {
            Ok(count) => info!("Pre-loaded {} objects from {}", count, path),
            Err(e @ LoadError::PackageNotFound { .. }) => warn!("{}", e),
            Err(e) => warn!("Failed to pre-load {}: {}", path, e),
        }
    }
}

pub async fn handle_load(session: &Session, args: &LoadArgs) -> i32 {
    finish(load(session, args).await)
}

async fn load(session: &Session, args: &LoadArgs) -> Result<String> {
    let app_name = args
        .app_name
        .clone()
        .unwrap_or_else(|| session.config.app_name.clone());

    let report = match &args.local_zip {
        Some(path) => LoadReport::LocalZip {
            objects: session.loader.load_local_zip(path, &app_name)?,
            path: path.clone(),
        },
        None => {
            let app_uuid = resolve_app_uuid(
                args.app_uuid.as_deref(),
                session.config.default_app_uuid.as_deref(),
            )?;
            let objects = session.loader.load_application(&app_uuid, &app_name).await?;
            LoadReport::Application {
                app_uuid,
                app_name,
                objects,
            }
        }
    };

    OutputFormatter::new(args.format.into()).format_load(&report)
}

pub fn handle_list(session: &Session, args: &ListArgs) -> i32 {
    let result = session
        .loader
        .store()
        .list(args.object_type.as_deref(), args.name_pattern.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|objects| OutputFormatter::new(args.format.into()).format_list(&objects));

    finish(result)
}

pub fn handle_get(session: &Session, args: &GetArgs) -> i32 {
    let lookup = session.loader.store().resolve(&args.name);
    finish(OutputFormatter::new(args.format.into()).format_lookup(&args.name, &lookup))
}

pub fn handle_search(session: &Session, args: &SearchArgs) -> i32 {
    let results = session
        .loader
        .store()
        .search(&args.query, args.object_type.as_deref());
    finish(OutputFormatter::new(args.format.into()).format_search(&args.query, &results))
}

pub fn handle_uses(session: &Session, args: &UsesArgs) -> i32 {
    let interfaces = session
        .loader
        .store()
        .interfaces_using_component(&args.component);
    finish(
        OutputFormatter::new(args.format.into())
            .format_component_usage(&args.component, &interfaces),
    )
}

pub async fn handle_checklist(session: &Session, args: &ChecklistArgs) -> i32 {
    finish(checklist(session, args).await)
}

async fn checklist(session: &Session, args: &ChecklistArgs) -> Result<String> {
    let fetcher = ChecklistFetcher::new(
        session.config.checklist_url.clone(),
        session.loader.cache().clone(),
    )?;
    let text = fetcher.fetch().await?;
    OutputFormatter::new(args.format.into()).format_checklist(fetcher.url(), &text)
}

fn finish(result: Result<String>) -> i32 {
    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
