use std::collections::VecDeque;
use std::time::Duration;

use ratatui::layout::Rect;

use neonfolio_core::effects::scroll_percentage;
use neonfolio_core::event::KeyPress;
use neonfolio_core::reveal::VISIBLE_CLASS;
use neonfolio_core::{DispatchOutcome, ElementId, ElementSpec, Page, PageEvent, SelectorList};

use crate::theme::Theme;

/// Pixels scrolled per `j`/`k`
pub const LINE_STEP: f64 = 40.0;

/// Mutation log lines kept for the log pane
const LOG_CAPACITY: usize = 200;

/// Deadlines closer than this switch the loop to the animation frame rate
const FAST_UPDATE_WINDOW: Duration = Duration::from_millis(200);

/// One rendered mutation
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: Duration,
    pub text: String,
}

/// A reveal target as shown in the sections pane
#[derive(Debug, Clone, PartialEq)]
pub struct TargetView {
    pub label: String,
    pub visible: bool,
}

/// A top-level `section` with its reveal targets
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub label: String,
    pub top: f64,
    pub height: f64,
    /// Overlaps the viewport
    pub in_view: bool,
    pub targets: Vec<TargetView>,
}

/// A floating shape with its current transform
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeView {
    pub label: String,
    pub transform: Option<String>,
}

pub struct App {
    pub page: Page,
    pub theme: Theme,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub log: VecDeque<LogLine>,
    /// Terminal area of the page pane, for pointer mapping
    pub page_area: Rect,
    nav_anchors: Vec<ElementId>,
    sections: SelectorList,
    targets: SelectorList,
    shapes: SelectorList,
    navbar: SelectorList,
    progress_bar: SelectorList,
    tooltips: usize,
}

impl App {
    pub fn new(page: Page, theme: Theme) -> neonfolio_core::Result<Self> {
        let config = page.config();
        let mut targets = config.reveal.selectors.clone();
        targets.push(config.cards.selector.clone());
        let targets = SelectorList::parse(&targets.join(", "))?;
        let shapes = SelectorList::parse(&config.parallax.selector)?;
        let navbar = SelectorList::parse(&config.navbar.selector)?;
        let nav_anchors = page.document().select(".navbar a[href^=\"#\"]")?;

        Ok(Self {
            page,
            theme,
            should_quit: false,
            status_message: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            page_area: Rect::default(),
            nav_anchors,
            sections: SelectorList::parse("body > section")?,
            targets,
            shapes,
            navbar,
            progress_bar: SelectorList::parse(".scroll-progress-bar")?,
            tooltips: 0,
        })
    }

    /// Fire `DOMContentLoaded`
    pub fn load(&mut self) {
        self.dispatch(PageEvent::DomContentLoaded);
    }

    /// Move the page clock, collecting whatever the timers changed
    pub fn advance_to(&mut self, now: Duration) {
        self.page.advance_to(now);
        self.collect();
    }

    pub fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        let outcome = self.page.dispatch(event);
        self.collect();
        outcome
    }

    fn collect(&mut self) {
        for update in self.page.take_updates() {
            let text = update.describe(self.page.document());
            if self.log.len() == LOG_CAPACITY {
                self.log.pop_front();
            }
            self.log.push_back(LogLine { at: update.at, text });
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.page.viewport().scroll_y
    }

    fn scroll_to(&mut self, offset: f64) {
        let offset = offset.clamp(0.0, self.page.viewport().max_scroll());
        self.dispatch(PageEvent::Scroll { offset });
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_y() + delta);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_by(self.page.viewport().height / 2.0);
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_by(-self.page.viewport().height / 2.0);
    }

    pub fn jump_to_top(&mut self) {
        self.scroll_to(0.0);
    }

    pub fn jump_to_bottom(&mut self) {
        self.scroll_to(self.page.viewport().max_scroll());
    }

    /// Click the `n`-th (1-based) navbar anchor
    pub fn click_nav(&mut self, n: usize) {
        let Some(&anchor) = n.checked_sub(1).and_then(|i| self.nav_anchors.get(i)) else {
            self.set_status(format!("No nav link {}", n));
            return;
        };
        let href = self.page.document().attribute(anchor, "href").unwrap_or_default();
        tracing::debug!("Clicking nav link {} ({})", n, href);
        self.dispatch(PageEvent::Click { target: anchor });
        self.set_status(format!("Navigating to {}", href));
    }

    /// Insert a node carrying a `title` tooltip for the suppressor to strip
    pub fn insert_tooltip(&mut self) {
        self.tooltips += 1;
        let spec = ElementSpec::new("span")
            .class("tooltip")
            .attr("title", format!("tooltip {}", self.tooltips));
        self.dispatch(PageEvent::InsertElement { parent: None, spec });
        self.set_status(format!("Inserted tooltip {}", self.tooltips));
    }

    /// Forward a key to the page; reports when the shortcut guard swallowed it
    pub fn key_down(&mut self, key: KeyPress) -> DispatchOutcome {
        let label = key_label(&key);
        let outcome = self.dispatch(PageEvent::KeyDown(key));
        if outcome.default_prevented {
            tracing::debug!("Shortcut {} blocked", label);
            self.set_status(format!("{} blocked by shortcut guard", label));
        }
        outcome
    }

    /// Pointer at terminal cell (`column`, `row`); ignored outside the page pane
    pub fn pointer_at(&mut self, column: u16, row: u16) {
        let area = self.page_area;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return;
        }
        let viewport = self.page.viewport();
        let x = (column - area.x) as f64 / area.width as f64 * viewport.width;
        let y = (row - area.y) as f64 / area.height as f64 * viewport.height;
        self.dispatch(PageEvent::PointerMove { x, y });
    }

    /// Whether the loop should poll at the animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.page.is_scrolling()
            || self
                .page
                .next_deadline()
                .is_some_and(|at| at.saturating_sub(self.page.now()) <= FAST_UPDATE_WINDOW)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn sections(&self) -> Vec<SectionView> {
        let doc = self.page.document();
        let viewport = self.page.viewport();
        let top = viewport.scroll_y;
        let bottom = top + viewport.height;

        let sections = doc.query_selector_all(&self.sections);
        let mut views: Vec<SectionView> = sections
            .iter()
            .map(|&id| {
                let rect = doc.rect(id).unwrap_or_default();
                SectionView {
                    label: doc.label(id),
                    top: rect.top,
                    height: rect.height,
                    in_view: rect.bottom() > top && rect.top < bottom,
                    targets: Vec::new(),
                }
            })
            .collect();

        for target in doc.query_selector_all(&self.targets) {
            let mut ancestor = doc.parent(target);
            while let Some(id) = ancestor {
                if let Some(index) = sections.iter().position(|&s| s == id) {
                    views[index].targets.push(TargetView {
                        label: doc.label(target),
                        visible: doc.has_class(target, VISIBLE_CLASS),
                    });
                    break;
                }
                ancestor = doc.parent(id);
            }
        }
        views
    }

    pub fn shapes(&self) -> Vec<ShapeView> {
        let doc = self.page.document();
        doc.query_selector_all(&self.shapes)
            .into_iter()
            .map(|id| ShapeView {
                label: doc.label(id),
                transform: doc.style(id, "transform").map(str::to_string),
            })
            .collect()
    }

    /// `Some(true)` once the navbar carries its scrolled style
    pub fn navbar_scrolled(&self) -> Option<bool> {
        let doc = self.page.document();
        let navbar = doc.query_selector(&self.navbar)?;
        let background = doc.style(navbar, "background")?;
        Some(background == self.page.config().navbar.scrolled_background)
    }

    /// Progress bar width as written to the page, in percent
    pub fn progress(&self) -> f64 {
        let doc = self.page.document();
        doc.query_selector(&self.progress_bar)
            .and_then(|bar| doc.style(bar, "width"))
            .and_then(|w| w.trim_end_matches('%').parse::<f64>().ok())
            .unwrap_or_else(|| {
                let v = self.page.viewport();
                scroll_percentage(v.scroll_y, v.scroll_height, v.height)
            })
    }
}

fn key_label(key: &KeyPress) -> String {
    let mut label = String::new();
    if key.ctrl {
        label.push_str("Ctrl+");
    }
    if key.shift {
        label.push_str("Shift+");
    }
    if key.alt {
        label.push_str("Alt+");
    }
    label.push_str(&key.key);
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonfolio_core::fixture;
    use neonfolio_core::AppConfig;

    fn app() -> App {
        let scenario = fixture::demo_scenario();
        let mut config = AppConfig::default();
        config.glitch.seed = Some(3);
        let page = scenario.build_page(config).unwrap();
        let mut app = App::new(page, Theme::default()).unwrap();
        app.load();
        app
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_sections_report_reveals() {
        let mut app = app();
        app.advance_to(ms(500));
        let sections = app.sections();
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[0].label, "section#home.hero");
        assert!(sections[0].in_view);
        assert!(!sections[2].in_view);
        assert!(sections[1].targets[0].visible);
        assert!(sections[2].targets.iter().all(|t| !t.visible));
        assert_eq!(sections[3].targets.len(), 7);
    }

    #[test]
    fn test_scroll_keys_clamp() {
        let mut app = app();
        app.scroll_by(-LINE_STEP);
        assert_eq!(app.scroll_y(), 0.0);
        app.scroll_half_page_down();
        assert_eq!(app.scroll_y(), 400.0);
        app.jump_to_bottom();
        assert_eq!(app.scroll_y(), 3600.0);
        assert_eq!(app.progress(), 100.0);
        assert_eq!(app.navbar_scrolled(), Some(true));
        app.jump_to_top();
        assert_eq!(app.navbar_scrolled(), Some(false));
    }

    #[test]
    fn test_nav_click_animates() {
        let mut app = app();
        app.click_nav(2);
        assert!(app.page.is_scrolling());
        assert!(app.needs_fast_update());
        app.advance_to(ms(1000));
        assert_eq!(app.scroll_y(), 800.0);
        app.click_nav(42);
        assert_eq!(app.status_message.as_deref(), Some("No nav link 42"));
    }

    #[test]
    fn test_inserted_tooltip_is_suppressed() {
        let mut app = app();
        app.insert_tooltip();
        app.advance_to(ms(150));
        assert!(app.log.iter().any(|l| l.text.ends_with("-[title]") && l.at == ms(100)));
    }

    #[test]
    fn test_pointer_mapping() {
        let mut app = app();
        app.page_area = Rect::new(10, 0, 64, 20);
        app.pointer_at(5, 5);
        assert!(app.shapes().iter().all(|s| s.transform.is_none()));
        app.pointer_at(42, 10);
        assert!(app.shapes().iter().all(|s| s.transform.is_some()));
    }

    #[test]
    fn test_blocked_key_sets_status() {
        let mut app = app();
        let outcome = app.key_down(KeyPress::new("U").ctrl());
        assert!(outcome.propagation_stopped);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Ctrl+U blocked by shortcut guard")
        );
    }
}
