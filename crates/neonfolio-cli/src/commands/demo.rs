use std::time::Duration;

use anyhow::Result;
use tracing::info;

use neonfolio_core::{fixture, AppConfig};

use super::replay::print_log;

/// Seed used when the config leaves the glitch unseeded, so demo output is stable
const DEMO_SEED: u64 = 7;

pub fn run(mut config: AppConfig, until_ms: Option<u64>, json: bool) -> Result<()> {
    config.glitch.seed.get_or_insert(DEMO_SEED);

    let scenario = fixture::demo_scenario();
    let mut page = scenario.build_page(config)?;
    let until = until_ms.map(Duration::from_millis);
    let log = scenario.replay(&mut page, until)?;

    print_log(&log, page.document(), json)?;
    info!(
        "Demo finished at {}ms: {} mutations, scroll at {:.0}px",
        page.now().as_millis(),
        log.updates.len(),
        page.viewport().scroll_y
    );
    Ok(())
}
