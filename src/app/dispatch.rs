use crate::cli::commands::{Cli, Commands};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use triagedesk::Config;
use triagedesk::backend::{HttpTriageBackend, TriageBackend};
use triagedesk::review::ReviewSession;

use super::review_loop;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Init { backend } => {
            let mut config = config;
            if let Some(base_url) = backend {
                config.backend.base_url = base_url;
            }
            config.validate()?;
            config.save()?;
            println!("Wrote {}", config.config_path.display());
            Ok(())
        }

        Commands::Review {
            file,
            column,
            mode,
            backend,
        } => {
            let base_url = backend.unwrap_or_else(|| config.backend.base_url.clone());
            let text_column = column.unwrap_or_else(|| config.review.text_column.clone());
            let mode = mode.unwrap_or(config.review.risk_tolerance);

            info!(backend = %base_url, %mode, "starting review session");

            let backend: Arc<dyn TriageBackend> = Arc::new(HttpTriageBackend::with_timeout(
                &base_url,
                config.backend.timeout_secs,
            ));
            let mut session = ReviewSession::new(backend, text_column, mode);
            review_loop::run(&mut session, &file).await
        }

        Commands::Download { kind, backend } => {
            let base_url = backend.unwrap_or_else(|| config.backend.base_url.clone());
            let backend =
                HttpTriageBackend::with_timeout(&base_url, config.backend.timeout_secs);
            println!("{}", backend.artifact_url(kind));
            Ok(())
        }
    }
}
