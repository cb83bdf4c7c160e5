//! Periodic neon glitch on the hero title.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::GlitchConfig;
use crate::dom::{Document, ElementId, SelectorList};
use crate::task::Task;
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

use super::css_number;

/// Shadow restored after each glitch
pub const RESTING_SHADOW: &str = "0 0 30px var(--primary-neon)";

#[derive(Debug, Clone)]
pub struct TitleGlitch {
    selector: SelectorList,
    enabled: bool,
    interval: Duration,
    reset: Duration,
    max_offset: f64,
    rng: StdRng,
    title: Option<ElementId>,
    interval_timer: Option<TimerId>,
}

impl TitleGlitch {
    pub fn from_config(config: &GlitchConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            selector: SelectorList::parse(&config.selector)?,
            enabled: config.enabled,
            interval: Duration::from_millis(config.interval_ms),
            reset: Duration::from_millis(config.reset_ms),
            max_offset: config.max_offset_px,
            rng,
            title: None,
            interval_timer: None,
        })
    }

    /// Locate the title and arm the glitch interval. Without a title the
    /// effect stays off.
    pub fn start(&mut self, doc: &Document, timers: &mut TimerQueue<Task>) -> bool {
        if !self.enabled {
            return false;
        }
        self.title = doc.query_selector(&self.selector);
        if self.title.is_none() {
            debug!("no hero title found, glitch disabled");
            return false;
        }
        if let Some(previous) = self.interval_timer.take() {
            timers.cancel(previous);
        }
        self.interval_timer = Some(timers.schedule_repeating(self.interval, Task::Glitch));
        true
    }

    /// Randomize the shadow and schedule its reset
    pub fn glitch(&mut self, doc: &mut Document, timers: &mut TimerQueue<Task>) {
        let Some(title) = self.title else {
            return;
        };
        let shadow = self.random_shadow();
        doc.set_style(title, "text-shadow", &shadow);
        timers.schedule(self.reset, Task::ResetGlitch);
    }

    pub fn reset(&self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.set_style(title, "text-shadow", RESTING_SHADOW);
        }
    }

    fn random_shadow(&mut self) -> String {
        let max = self.max_offset;
        let sample = |rng: &mut StdRng| -> f64 {
            if max.is_finite() && max > 0.0 {
                rng.gen_range(0.0..max)
            } else {
                0.0
            }
        };
        let a = sample(&mut self.rng);
        let b = sample(&mut self.rng);
        let c = -sample(&mut self.rng);
        let d = sample(&mut self.rng);
        format!(
            "{}px {}px 0 var(--primary-neon), {}px {}px 0 var(--secondary-neon)",
            css_number(a),
            css_number(b),
            css_number(c),
            css_number(d)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    fn seeded() -> TitleGlitch {
        TitleGlitch::from_config(&GlitchConfig {
            seed: Some(42),
            ..Default::default()
        })
        .unwrap()
    }

    fn hero_doc() -> (Document, ElementId) {
        let mut doc = Document::new();
        let body = doc.body();
        let hero = doc.append(body, ElementSpec::new("div").class("hero-content"));
        let h1 = doc.append(hero, ElementSpec::new("h1"));
        (doc, h1)
    }

    #[test]
    fn test_glitch_then_reset() {
        let (mut doc, h1) = hero_doc();
        let mut timers = TimerQueue::new();
        let mut glitch = seeded();
        assert!(glitch.start(&doc, &mut timers));
        assert_eq!(timers.next_deadline(), Some(Duration::from_millis(3000)));

        glitch.glitch(&mut doc, &mut timers);
        let shadow = doc.style(h1, "text-shadow").unwrap().to_string();
        assert!(shadow.contains("var(--primary-neon)"));
        assert!(shadow.contains("var(--secondary-neon)"));
        assert_ne!(shadow, RESTING_SHADOW);

        glitch.reset(&mut doc);
        assert_eq!(doc.style(h1, "text-shadow"), Some(RESTING_SHADOW));
    }

    #[test]
    fn test_offsets_stay_in_range() {
        let mut glitch = seeded();
        for _ in 0..50 {
            let shadow = glitch.random_shadow();
            let numbers: Vec<f64> = shadow
                .split_whitespace()
                .filter_map(|part| part.strip_suffix("px"))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(numbers.len(), 4);
            assert!((0.0..=10.0).contains(&numbers[0]));
            assert!((0.0..=10.0).contains(&numbers[1]));
            assert!((-10.0..=0.0).contains(&numbers[2]));
            assert!((0.0..=10.0).contains(&numbers[3]));
        }
    }

    #[test]
    fn test_no_title_disables() {
        let doc = Document::new();
        let mut timers = TimerQueue::new();
        let mut glitch = seeded();
        assert!(!glitch.start(&doc, &mut timers));
        assert!(timers.is_empty());
    }
}
