//! Scripted page sessions loaded from TOML or JSON.
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [[elements]]
//! tag = "section"
//! id = "about"
//! classes = ["fade-in"]
//! rect = { top = 900, left = 0, width = 1280, height = 600 }
//!
//! [[events]]
//! at_ms = 0
//! kind = "loaded"
//!
//! [[events]]
//! at_ms = 500
//! kind = "scroll"
//! offset = 700
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::dom::{Document, ElementId, ElementSpec, SelectorList};
use crate::event::{KeyPress, PageEvent};
use crate::page::{Page, PageUpdate};
use crate::viewport::Viewport;
use crate::{Error, Result};

/// How long a replay keeps running after its last event: one overlay cycle
const DEFAULT_TAIL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub viewport: Viewport,
    /// Stop time; defaults to the last event plus one second
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub elements: Vec<ScenarioElement>,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

/// An element of the initial document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioElement {
    /// `id` of the parent element; `body` when absent
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub spec: ElementSpec,
}

impl ScenarioElement {
    pub fn new(spec: ElementSpec) -> Self {
        Self { parent: None, spec }
    }

    pub fn under(parent: &str, spec: ElementSpec) -> Self {
        Self {
            parent: Some(parent.to_string()),
            spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ScenarioEvent,
}

impl TimedEvent {
    pub fn new(at_ms: u64, event: ScenarioEvent) -> Self {
        Self { at_ms, event }
    }

    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Events as written in a scenario file. Elements are named by selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Loaded,
    Scroll {
        offset: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    Click {
        target: String,
    },
    KeyDown(KeyPress),
    Resize {
        width: f64,
        height: f64,
    },
    /// Append `element` under the first match of `parent` (or `body`)
    Insert {
        #[serde(default)]
        parent: Option<String>,
        element: ElementSpec,
    },
    SetAttribute {
        target: String,
        name: String,
        value: String,
    },
    /// Only moves the clock
    Wait,
}

impl ScenarioEvent {
    /// Resolve selectors against `doc`. `Wait` has no page event.
    pub fn to_page_event(&self, doc: &Document) -> Result<Option<PageEvent>> {
        let event = match self {
            ScenarioEvent::Loaded => PageEvent::DomContentLoaded,
            ScenarioEvent::Scroll { offset } => PageEvent::Scroll { offset: *offset },
            ScenarioEvent::PointerMove { x, y } => PageEvent::PointerMove { x: *x, y: *y },
            ScenarioEvent::Click { target } => PageEvent::Click {
                target: resolve(doc, target)?,
            },
            ScenarioEvent::KeyDown(key) => PageEvent::KeyDown(key.clone()),
            ScenarioEvent::Resize { width, height } => PageEvent::Resize {
                width: *width,
                height: *height,
            },
            ScenarioEvent::Insert { parent, element } => PageEvent::InsertElement {
                parent: parent.as_deref().map(|p| resolve(doc, p)).transpose()?,
                spec: element.clone(),
            },
            ScenarioEvent::SetAttribute {
                target,
                name,
                value,
            } => PageEvent::SetAttribute {
                target: resolve(doc, target)?,
                name: name.clone(),
                value: value.clone(),
            },
            ScenarioEvent::Wait => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn resolve(doc: &Document, selector: &str) -> Result<ElementId> {
    let parsed = SelectorList::parse(selector)?;
    doc.query_selector(&parsed)
        .ok_or_else(|| Error::Scenario(format!("selector '{}' matched nothing", selector)))
}

/// A host event that was dispatched during a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRecord {
    pub at_ms: u64,
    pub kind: &'static str,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Result of replaying a scenario
#[derive(Debug, Clone, Default)]
pub struct ReplayLog {
    pub updates: Vec<PageUpdate>,
    pub dispatches: Vec<DispatchRecord>,
}

impl Scenario {
    /// Load from a file; `.json` files are JSON, anything else TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let scenario = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        debug!(
            path = %path.display(),
            elements = scenario.elements.len(),
            events = scenario.events.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the initial document. Parents must appear before their children.
    pub fn build_document(&self) -> Result<Document> {
        let mut doc = Document::new();
        for element in &self.elements {
            let parent = match &element.parent {
                Some(id) => doc.find_by_html_id(id).ok_or_else(|| {
                    Error::Scenario(format!(
                        "parent '{}' of <{}> is not defined before it",
                        id, element.spec.tag
                    ))
                })?,
                None => doc.body(),
            };
            doc.append(parent, element.spec.clone());
        }
        Ok(doc)
    }

    pub fn build_page(&self, config: AppConfig) -> Result<Page> {
        Page::new(self.build_document()?, self.viewport, config)
    }

    /// Events ordered by time; ties keep file order
    pub fn timeline(&self) -> Vec<TimedEvent> {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.at_ms);
        events
    }

    /// Time at which a replay stops
    pub fn end(&self) -> Duration {
        let ms = self.duration_ms.unwrap_or_else(|| {
            self.events
                .iter()
                .map(|e| e.at_ms)
                .max()
                .unwrap_or(0)
                + DEFAULT_TAIL_MS
        });
        Duration::from_millis(ms)
    }

    /// Replay on the virtual clock up to `until` (or [`Scenario::end`])
    pub fn replay(&self, page: &mut Page, until: Option<Duration>) -> Result<ReplayLog> {
        let until = until.unwrap_or_else(|| self.end());
        let mut log = ReplayLog::default();

        for timed in self.timeline() {
            let at = timed.at();
            if at > until {
                break;
            }
            page.advance_to(at);
            log.updates.extend(page.take_updates());

            let Some(event) = timed.event.to_page_event(page.document())? else {
                continue;
            };
            let kind = event.kind();
            let outcome = page.dispatch(event);
            log.dispatches.push(DispatchRecord {
                at_ms: timed.at_ms,
                kind,
                default_prevented: outcome.default_prevented,
                propagation_stopped: outcome.propagation_stopped,
            });
            log.updates.extend(page.take_updates());
        }

        page.advance_to(until);
        log.updates.extend(page.take_updates());
        Ok(log)
    }
}
