use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use neonfolio_core::dom::Document;
use neonfolio_core::{AppConfig, PageDriver, PageUpdate, ReplayLog, Scenario};

/// Replay on the virtual clock; output is identical across runs for a seeded config
pub fn run(file: &Path, config: AppConfig, json: bool) -> Result<()> {
    let scenario = load(file)?;
    let mut page = scenario.build_page(config)?;
    let log = scenario.replay(&mut page, None)?;

    print_log(&log, page.document(), json)?;
    info!(
        "Replayed {} events, {} mutations",
        log.dispatches.len(),
        log.updates.len()
    );
    Ok(())
}

/// Replay with real sleeps through the async driver, printing mutations as they happen
pub async fn run_realtime(file: &Path, config: AppConfig, json: bool) -> Result<()> {
    let scenario = load(file)?;
    let page = scenario.build_page(config)?;
    // Event targets and labels resolve against the document as first built
    let doc = page.document().clone();

    let (event_tx, event_rx) = mpsc::channel(64);
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let start = Instant::now();
    let driver = PageDriver::new(page).with_update_sender(update_tx);
    let handle = tokio::spawn(driver.run(event_rx, shutdown_rx));

    let labels = doc.clone();
    let printer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(update) = update_rx.recv().await {
            print_update(&update, &labels, json)?;
            count += 1;
        }
        Ok::<usize, anyhow::Error>(count)
    });

    let end = scenario.end();
    for timed in scenario.timeline() {
        if timed.at() > end {
            break;
        }
        sleep_until(start + timed.at()).await;
        if let Some(event) = timed.event.to_page_event(&doc)? {
            debug!("Sending {} at {}ms", event.kind(), timed.at_ms);
            if event_tx.send(event).await.is_err() {
                break;
            }
        }
    }

    sleep_until(start + end).await;
    // The driver may already have stopped; nothing to signal then
    let _ = shutdown_tx.send(true);
    let page = handle.await.context("page driver task failed")?;
    let count = printer.await.context("printer task failed")??;

    info!(
        "Realtime replay finished at {}ms with {} mutations",
        page.now().as_millis(),
        count
    );
    Ok(())
}

fn load(file: &Path) -> Result<Scenario> {
    let scenario = Scenario::load(file)
        .with_context(|| format!("loading scenario {}", file.display()))?;
    if let Some(name) = &scenario.name {
        info!("Loaded scenario '{}'", name);
    }
    Ok(scenario)
}

/// Write a replay log to stdout, as text or JSON lines
pub fn print_log(log: &ReplayLog, doc: &Document, json: bool) -> Result<()> {
    for update in &log.updates {
        print_update(update, doc, json)?;
    }

    if !json {
        let mut out = io::stdout().lock();
        for record in log.dispatches.iter().filter(|d| d.default_prevented) {
            writeln!(
                out,
                "{:>7}ms  {} default prevented",
                record.at_ms, record.kind
            )?;
        }
    }
    Ok(())
}

fn print_update(update: &PageUpdate, doc: &Document, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string(update)?)?;
    } else {
        writeln!(
            out,
            "{:>7}ms  {}",
            update.at.as_millis(),
            update.describe(doc)
        )?;
    }
    Ok(())
}
