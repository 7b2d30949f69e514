use anyhow::Context;
use tracing::info;

use crate::terminal::{print, report};
use drone_bbot_client::LairClient;
use drone_bbot_common::config::Config;
use drone_bbot_core::import::ImportService;

pub async fn import(cfg: &Config) -> anyhow::Result<()> {
    let client = LairClient::new(cfg.server.clone()).context("Error setting up client")?;
    info!("Using Lair API server at {}", client.endpoint());
    if cfg.server.insecure_skip_verify {
        info!("TLS certificate verification is disabled");
    }

    let service = ImportService::new(Box::new(client));
    let outcome = service.run(&cfg.import).await?;

    report::outcome(&outcome);
    print::end_of_program();
    Ok(())
}
