//! Async host for a [`Page`]: real time drives the virtual clock.

use std::future;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::event::PageEvent;
use crate::page::{Page, PageUpdate};

/// Runs a page on tokio, firing its timers on time and applying host events
pub struct PageDriver {
    page: Page,
    update_tx: Option<mpsc::UnboundedSender<PageUpdate>>,
}

impl PageDriver {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            update_tx: None,
        }
    }

    /// Set the sender that receives every document change
    pub fn with_update_sender(mut self, tx: mpsc::UnboundedSender<PageUpdate>) -> Self {
        self.update_tx = Some(tx);
        self
    }

    fn publish(&mut self) {
        let updates = self.page.take_updates();
        let Some(ref tx) = self.update_tx else {
            return;
        };
        for update in updates {
            if tx.send(update).is_err() {
                warn!("Failed to send page update: receiver dropped");
                self.update_tx = None;
                return;
            }
        }
    }

    /// Run until shutdown or until the event channel closes.
    /// Returns the page so the host can inspect its final state.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<PageEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Page {
        let origin = Instant::now()
            .checked_sub(self.page.now())
            .unwrap_or_else(Instant::now);
        info!("Page driver started");

        loop {
            let deadline = self.page.next_deadline().map(|at| origin + at);
            let next_timer = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => future::pending().await,
                }
            };

            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Page driver received shutdown signal");
                        break;
                    }
                }

                event = events.recv() => {
                    let Some(event) = event else {
                        info!("Event channel closed, stopping page driver");
                        break;
                    };
                    self.page.advance_to(origin.elapsed());
                    let kind = event.kind();
                    let outcome = self.page.dispatch(event);
                    if outcome.default_prevented {
                        debug!(kind, ?outcome, "default action prevented");
                    }
                }

                _ = next_timer => {
                    self.page.advance_to(origin.elapsed());
                }
            }

            self.publish();
        }

        self.publish();
        self.page
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::AppConfig;
    use crate::dom::{Document, ElementSpec, Mutation, Rect};
    use crate::reveal::VISIBLE_CLASS;
    use crate::viewport::Viewport;

    fn page() -> (Page, crate::dom::ElementId) {
        let mut doc = Document::new();
        let body = doc.body();
        let section = doc.append(
            body,
            ElementSpec::new("section")
                .class("fade-in")
                .rect(Rect::new(0.0, 0.0, 800.0, 400.0)),
        );
        doc.append(
            body,
            ElementSpec::new("footer").rect(Rect::new(400.0, 0.0, 800.0, 2000.0)),
        );
        let page = Page::new(doc, Viewport::new(800.0, 600.0), AppConfig::default()).unwrap();
        (page, section)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<PageUpdate>) -> Vec<PageUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_fires_timers_on_time() {
        let (page, section) = page();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let driver = PageDriver::new(page).with_update_sender(update_tx);
        let handle = tokio::spawn(driver.run(event_rx, shutdown_rx));

        event_tx.send(PageEvent::DomContentLoaded).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown_tx.send(true).unwrap();
        let page = handle.await.unwrap();

        assert!(page.document().has_class(section, VISIBLE_CLASS));
        let shown = drain(&mut update_rx).into_iter().find(|u| {
            matches!(&u.mutation, Mutation::ClassAdded { element, class } if *element == section && class == VISIBLE_CLASS)
        });
        assert_eq!(shown.map(|u| u.at), Some(Duration::from_millis(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_stops_when_events_close() {
        let (page, _) = page();
        let (event_tx, event_rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(PageDriver::new(page).run(event_rx, shutdown_rx));
        event_tx.send(PageEvent::DomContentLoaded).await.unwrap();
        event_tx
            .send(PageEvent::Scroll { offset: 300.0 })
            .await
            .unwrap();
        drop(event_tx);

        let page = handle.await.unwrap();
        assert!(page.is_loaded());
        assert_eq!(page.viewport().scroll_y, 300.0);
    }
}
