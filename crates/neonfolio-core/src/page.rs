//! The page: document, viewport, timers and every behavior wired together.
//!
//! A host feeds [`PageEvent`]s through [`Page::dispatch`] and moves the
//! virtual clock with [`Page::advance_to`]. Every document change is stamped
//! with the clock and collected as a [`PageUpdate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::AppConfig;
use crate::dom::{Document, ElementId, Mutation, SelectorList};
use crate::effects::{
    is_blocked_shortcut, DirectionTracker, NavbarToggle, OverlaySuppressor, Parallax, ProgressBar,
    ScrollDirection, ScrollRequest, SmoothScrollRouter, TitleGlitch,
};
use crate::event::{DispatchOutcome, PageEvent};
use crate::reveal::{RevealController, RevealScheduler};
use crate::task::{RevealGroup, Task};
use crate::timer::{TimerId, TimerQueue};
use crate::viewport::{IntersectionObserver, Viewport};
use crate::Result;

/// Class added to `body` once behaviors are running
pub const LOADED_CLASS: &str = "js-loaded";

const PROGRESS_SELECTOR: &str = ".scroll-progress-bar";

/// A document change and the virtual time it happened at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageUpdate {
    #[serde(rename = "at_ms", with = "millis")]
    pub at: Duration,
    #[serde(flatten)]
    pub mutation: Mutation,
}

impl PageUpdate {
    /// One-line human description, e.g. `section#about.fade-in +visible`
    pub fn describe(&self, doc: &Document) -> String {
        match &self.mutation {
            Mutation::ClassAdded { element, class } => format!("{} +{}", doc.label(*element), class),
            Mutation::ClassRemoved { element, class } => format!("{} -{}", doc.label(*element), class),
            Mutation::AttributeSet {
                element,
                name,
                value,
            } => format!("{} [{}=\"{}\"]", doc.label(*element), name, value),
            Mutation::AttributeRemoved { element, name } => {
                format!("{} -[{}]", doc.label(*element), name)
            }
            Mutation::StyleSet {
                element,
                property,
                value,
            } => format!("{} {{{}: {}}}", doc.label(*element), property, value),
            Mutation::ChildInserted { parent, child } => {
                format!("{} <- {}", doc.label(*parent), doc.label(*child))
            }
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

pub struct Page {
    config: AppConfig,
    doc: Document,
    viewport: Viewport,
    /// Content height follows the document instead of a fixed value
    auto_height: bool,
    timers: TimerQueue<Task>,
    sections: RevealController,
    cards: RevealController,
    direction: DirectionTracker,
    overlay: OverlaySuppressor,
    navbar: NavbarToggle,
    progress: ProgressBar,
    parallax: Parallax,
    glitch: TitleGlitch,
    router: SmoothScrollRouter,
    loaded: bool,
    updates: Vec<PageUpdate>,
}

impl Page {
    /// Wrap a built document. Changes made while building are not reported.
    pub fn new(mut doc: Document, viewport: Viewport, config: AppConfig) -> Result<Self> {
        config.validate()?;
        doc.take_mutations();

        let sections = RevealController::new(
            SelectorList::parse(&config.reveal.selectors.join(", "))?,
            IntersectionObserver::new(config.reveal.root_margin_px, &config.reveal.thresholds),
            RevealScheduler::sections(&config.reveal),
        );
        let cards = RevealController::new(
            SelectorList::parse(&config.cards.selector)?,
            IntersectionObserver::new(config.cards.root_margin_px, &config.reveal.thresholds),
            RevealScheduler::cards(&config.cards, &config.reveal),
        );

        let mut page = Self {
            direction: DirectionTracker::new(Duration::from_millis(config.direction.debounce_ms)),
            overlay: OverlaySuppressor::from_config(&config.overlay)?,
            navbar: NavbarToggle::from_config(&config.navbar)?,
            progress: ProgressBar::new(SelectorList::parse(PROGRESS_SELECTOR)?),
            parallax: Parallax::from_config(&config.parallax)?,
            glitch: TitleGlitch::from_config(&config.glitch)?,
            router: SmoothScrollRouter::new(&config.scroll)?,
            auto_height: viewport.scroll_height <= 0.0,
            config,
            doc,
            viewport,
            timers: TimerQueue::new(),
            sections,
            cards,
            loaded: false,
            updates: Vec::new(),
        };
        page.refresh_height();
        Ok(page)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction.direction()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Elements with a show or hide waiting to fire
    pub fn pending_reveals(&self) -> usize {
        self.sections.pending() + self.cards.pending()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn is_scrolling(&self) -> bool {
        self.router.is_animating()
    }

    /// Updates collected since the last call
    pub fn take_updates(&mut self) -> Vec<PageUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Move the clock to `now`, firing every timer due on the way
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(now) {
            self.run(timer.id, timer.task);
            self.flush();
            fired += 1;
        }
        fired
    }

    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    /// Advance to `at`, then dispatch
    pub fn dispatch_at(&mut self, at: Duration, event: PageEvent) -> DispatchOutcome {
        self.advance_to(at);
        self.dispatch(event)
    }

    /// Deliver one event at the current virtual time
    pub fn dispatch(&mut self, event: PageEvent) -> DispatchOutcome {
        trace!(kind = event.kind(), at_ms = self.now().as_millis() as u64, "dispatch");
        let outcome = match event {
            PageEvent::DomContentLoaded => {
                self.start();
                DispatchOutcome::default()
            }
            PageEvent::Scroll { offset } => {
                if self.router.is_animating() {
                    debug!(offset, "user scroll interrupts anchor animation");
                }
                self.router.interrupt(offset, &mut self.timers);
                self.scroll_to(offset);
                DispatchOutcome::default()
            }
            PageEvent::PointerMove { x, y } => {
                self.parallax.apply(&mut self.doc, x, y, &self.viewport);
                DispatchOutcome::default()
            }
            PageEvent::Intersection { group, entries } => {
                match group {
                    RevealGroup::Sections => self.sections.deliver(&entries, &mut self.timers),
                    RevealGroup::Cards => self.cards.deliver(&entries, &mut self.timers),
                }
                DispatchOutcome::default()
            }
            PageEvent::Click { target } => self.click(target),
            PageEvent::KeyDown(key) => {
                if is_blocked_shortcut(&key) {
                    debug!(key = %key.key, ctrl = key.ctrl, shift = key.shift, "shortcut blocked");
                    DispatchOutcome::blocked()
                } else {
                    DispatchOutcome::default()
                }
            }
            PageEvent::Resize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.refresh_height();
                self.viewport.scroll_y = self.viewport.scroll_y.min(self.viewport.max_scroll());
                self.evaluate_reveals();
                DispatchOutcome::default()
            }
            PageEvent::InsertElement { parent, spec } => {
                let parent = parent.unwrap_or_else(|| self.doc.body());
                self.doc.append(parent, spec);
                DispatchOutcome::default()
            }
            PageEvent::SetAttribute { target, name, value } => {
                self.doc.set_attribute(target, &name, &value);
                DispatchOutcome::default()
            }
        };
        self.flush();
        outcome
    }

    fn start(&mut self) {
        if self.loaded {
            debug!("page already loaded");
            return;
        }
        self.loaded = true;

        let body = self.doc.body();
        self.doc.add_class(body, LOADED_CLASS);

        self.overlay.scan(&mut self.doc);
        self.overlay.start(&mut self.timers);

        self.progress.update(&mut self.doc, &self.viewport);

        let sections = self.sections.register(&self.doc);
        let cards = self.cards.register(&self.doc);
        self.evaluate_reveals();

        self.doc.set_style(body, "opacity", "0");
        self.timers.schedule(
            Duration::from_millis(self.config.startup.fade_delay_ms),
            Task::FadeIn,
        );

        self.glitch.start(&self.doc, &mut self.timers);

        debug!(sections, cards, "reveal observers attached");
        info!("CYBER PORTFOLIO SYSTEM ONLINE");
        info!("Lift animations active - Click sections to lift them!");
        info!("Scroll animations initialized");
        info!("Interactive system ready");
    }

    fn click(&mut self, target: ElementId) -> DispatchOutcome {
        let Some(anchor) = self.router.anchor_for(&self.doc, target) else {
            return DispatchOutcome::default();
        };
        match self.router.navigate(&self.doc, anchor, &self.viewport, &mut self.timers) {
            ScrollRequest::Jump(offset) => self.scroll_to(offset),
            ScrollRequest::Animate => {}
            ScrollRequest::None => {
                debug!(anchor = %self.doc.label(anchor), "anchor target not found");
            }
        }
        DispatchOutcome::prevented()
    }

    /// Everything that reacts to the scroll offset changing
    fn scroll_to(&mut self, offset: f64) {
        let offset = offset.clamp(0.0, self.viewport.max_scroll());
        self.viewport.scroll_y = offset;
        self.navbar.apply(&mut self.doc, offset);
        self.progress.update(&mut self.doc, &self.viewport);
        self.direction.on_scroll(offset, &mut self.timers);
        self.evaluate_reveals();
    }

    fn evaluate_reveals(&mut self) {
        self.sections.evaluate(&self.doc, &self.viewport, &mut self.timers);
        self.cards.evaluate(&self.doc, &self.viewport, &mut self.timers);
    }

    fn refresh_height(&mut self) {
        if self.auto_height {
            self.viewport.scroll_height = self.doc.document_height().max(self.viewport.height);
        }
    }

    fn run(&mut self, timer: TimerId, task: Task) {
        trace!(?task, at_ms = self.now().as_millis() as u64, "timer fired");
        match task {
            Task::Reveal {
                group,
                element,
                action,
            } => match group {
                RevealGroup::Sections => self.sections.complete(timer, element, action, &mut self.doc),
                RevealGroup::Cards => self.cards.complete(timer, element, action, &mut self.doc),
            },
            Task::SettleDirection { offset } => {
                self.direction.settle(timer, offset, &mut self.doc);
            }
            Task::ScanOverlays => {
                self.overlay.on_timer(timer);
                self.overlay.scan(&mut self.doc);
            }
            Task::Glitch => self.glitch.glitch(&mut self.doc, &mut self.timers),
            Task::ResetGlitch => self.glitch.reset(&mut self.doc),
            Task::FadeIn => {
                let body = self.doc.body();
                self.doc.set_style(body, "transition", "opacity 1s ease-in-out");
                self.doc.set_style(body, "opacity", "1");
            }
            Task::ScrollFrame => {
                let offset = self.router.frame(&self.viewport, &mut self.timers);
                self.scroll_to(offset);
            }
        }
    }

    /// Stamp journal entries and fan out structural changes
    fn flush(&mut self) {
        let mutations = self.doc.take_mutations();
        if mutations.is_empty() {
            return;
        }
        let at = self.now();
        let structural = mutations.iter().any(Mutation::is_structural);
        self.updates
            .extend(mutations.into_iter().map(|mutation| PageUpdate { at, mutation }));

        if structural {
            self.refresh_height();
            if self.loaded {
                self.overlay.on_structure_change(&mut self.timers);
                self.evaluate_reveals();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, Rect};
    use crate::effects::DIRECTION_ATTRIBUTE;
    use crate::event::KeyPress;
    use crate::reveal::VISIBLE_CLASS;
    use crate::viewport::IntersectionEntry;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Fixture {
        page: Page,
        near: ElementId,
        far: ElementId,
        cards: Vec<ElementId>,
        bar: ElementId,
        nav_link: ElementId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append(body, ElementSpec::new("nav").class("navbar"));
        let nav_link = doc.append(nav, ElementSpec::new("a").attr("href", "#far"));
        let bar = doc.append(body, ElementSpec::new("div").class("scroll-progress-bar"));
        let near = doc.append(
            body,
            ElementSpec::new("div")
                .class("fade-in")
                .rect(Rect::new(100.0, 0.0, 1000.0, 400.0)),
        );
        let grid = doc.append(body, ElementSpec::new("div").class("cert-grid"));
        let cards = (0..3)
            .map(|i| {
                doc.append(
                    grid,
                    ElementSpec::new("div")
                        .class("cert-card")
                        .rect(Rect::new(550.0, i as f64 * 300.0, 280.0, 200.0)),
                )
            })
            .collect();
        let far = doc.append(
            body,
            ElementSpec::new("section")
                .id("far")
                .class("slide-in-left")
                .rect(Rect::new(3000.0, 0.0, 1000.0, 1000.0)),
        );

        let mut config = AppConfig::default();
        config.glitch.seed = Some(7);
        let page = Page::new(doc, Viewport::new(1000.0, 1000.0), config).unwrap();
        Fixture {
            page,
            near,
            far,
            cards,
            bar,
            nav_link,
        }
    }

    fn loaded() -> Fixture {
        let mut f = fixture();
        f.page.dispatch(PageEvent::DomContentLoaded);
        f
    }

    fn visible(page: &Page, id: ElementId) -> bool {
        page.document().has_class(id, VISIBLE_CLASS)
    }

    #[test]
    fn test_content_height_follows_document() {
        let f = fixture();
        assert_eq!(f.page.viewport().scroll_height, 4000.0);
        assert_eq!(f.page.viewport().max_scroll(), 3000.0);
    }

    #[test]
    fn test_startup_sequence() {
        let mut f = loaded();
        let body = f.page.document().body();
        assert!(f.page.document().has_class(body, LOADED_CLASS));
        assert_eq!(f.page.document().style(body, "opacity"), Some("0"));
        assert_eq!(f.page.document().style(f.bar, "width"), Some("0%"));

        f.page.advance_to(ms(100));
        assert_eq!(f.page.document().style(body, "opacity"), Some("1"));
        assert_eq!(
            f.page.document().style(body, "transition"),
            Some("opacity 1s ease-in-out")
        );
    }

    #[test]
    fn test_second_load_is_ignored() {
        let mut f = loaded();
        f.page.take_updates();
        f.page.dispatch(PageEvent::DomContentLoaded);
        assert!(f.page.take_updates().is_empty());
    }

    #[test]
    fn test_show_applied_within_50ms() {
        let mut f = loaded();
        assert!(!visible(&f.page, f.near));
        f.page.advance_to(ms(49));
        assert!(!visible(&f.page, f.near));
        f.page.advance_to(ms(50));
        assert!(visible(&f.page, f.near));
        assert!(!visible(&f.page, f.far));
    }

    #[test]
    fn test_hide_applied_within_100ms() {
        let mut f = loaded();
        f.page.advance_to(ms(500));
        assert!(visible(&f.page, f.near));

        f.page.dispatch(PageEvent::Scroll { offset: 2500.0 });
        f.page.advance_to(ms(599));
        assert!(visible(&f.page, f.near));
        f.page.advance_to(ms(600));
        assert!(!visible(&f.page, f.near));
    }

    #[test]
    fn test_cards_stagger_within_batch() {
        let mut f = loaded();
        f.page.take_updates();
        f.page.advance_to(ms(500));
        let shown: Vec<(Duration, ElementId)> = f
            .page
            .take_updates()
            .into_iter()
            .filter_map(|u| match u.mutation {
                Mutation::ClassAdded { element, class } if class == VISIBLE_CLASS && f.cards.contains(&element) => {
                    Some((u.at, element))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            shown,
            vec![(ms(100), f.cards[0]), (ms(250), f.cards[1]), (ms(400), f.cards[2])]
        );
    }

    #[test]
    fn test_burst_leaves_one_timer_per_element() {
        let mut f = loaded();
        f.page.advance_to(ms(500));
        // Oscillate the first card across the viewport edge inside one window
        for (i, offset) in [2500.0, 0.0, 2500.0, 0.0, 2500.0].into_iter().enumerate() {
            f.page.dispatch_at(ms(500 + i as u64), PageEvent::Scroll { offset });
        }
        // Reveal timers plus direction settle, overlay scan and glitch intervals
        assert!(f.page.pending_reveals() <= 5);
        assert_eq!(f.page.pending_timers(), f.page.pending_reveals() + 3);
        f.page.advance_to(ms(1000));
        assert_eq!(f.page.pending_reveals(), 0);
        assert!(!visible(&f.page, f.near));
    }

    #[test]
    fn test_direction_down_then_up() {
        let mut f = loaded();
        f.page.dispatch_at(ms(10), PageEvent::Scroll { offset: 50.0 });
        f.page.advance_to(ms(30));
        assert_eq!(f.page.direction(), ScrollDirection::Down);

        f.page.dispatch(PageEvent::Scroll { offset: 30.0 });
        f.page.advance_to(ms(60));
        assert_eq!(f.page.direction(), ScrollDirection::Up);
        let body = f.page.document().body();
        assert_eq!(
            f.page.document().attribute(body, DIRECTION_ATTRIBUTE).as_deref(),
            Some("up")
        );
    }

    #[test]
    fn test_inserted_title_is_stripped() {
        let mut f = loaded();
        f.page.dispatch_at(
            ms(250),
            PageEvent::InsertElement {
                parent: None,
                spec: ElementSpec::new("span").attr("title", "hint"),
            },
        );
        let inserted = ElementId(f.page.document().len() as u32 - 1);
        assert!(f.page.document().attribute(inserted, "title").is_some());

        f.page.advance_to(ms(350));
        assert!(f.page.document().attribute(inserted, "title").is_none());
    }

    #[test]
    fn test_tooltip_hidden_by_interval_scan() {
        let mut f = loaded();
        let tip = ElementId(f.page.document().len() as u32);
        f.page.dispatch_at(
            ms(10),
            PageEvent::InsertElement {
                parent: None,
                spec: ElementSpec::new("div").class("tooltip"),
            },
        );
        f.page.advance_to(ms(110));
        assert_eq!(f.page.document().style(tip, "display"), Some("none"));
        assert_eq!(f.page.document().style(tip, "visibility"), Some("hidden"));
        assert_eq!(f.page.document().style(tip, "opacity"), Some("0"));
    }

    #[test]
    fn test_progress_and_navbar_follow_scroll() {
        let mut f = loaded();
        f.page.dispatch(PageEvent::Scroll { offset: 750.0 });
        assert_eq!(f.page.document().style(f.bar, "width"), Some("25%"));

        let nav = f.page.document().select(".navbar").unwrap()[0];
        assert_eq!(
            f.page.document().style(nav, "background"),
            Some("rgba(10, 10, 10, 0.98)")
        );
        f.page.dispatch(PageEvent::Scroll { offset: 50.0 });
        assert_eq!(
            f.page.document().style(nav, "background"),
            Some("rgba(10, 10, 10, 0.95)")
        );
    }

    #[test]
    fn test_blocked_shortcuts() {
        let mut f = loaded();
        assert_eq!(
            f.page.dispatch(PageEvent::KeyDown(KeyPress::new("F12"))),
            DispatchOutcome::blocked()
        );
        assert_eq!(
            f.page.dispatch(PageEvent::KeyDown(KeyPress::new("i").ctrl().shift())),
            DispatchOutcome::blocked()
        );
        assert_eq!(
            f.page.dispatch(PageEvent::KeyDown(KeyPress::new("j"))),
            DispatchOutcome::default()
        );
    }

    #[test]
    fn test_anchor_click_animates_to_target() {
        let mut f = loaded();
        let outcome = f.page.dispatch(PageEvent::Click { target: f.nav_link });
        assert!(outcome.default_prevented);
        assert!(f.page.is_scrolling());

        f.page.advance_to(ms(700));
        assert!(!f.page.is_scrolling());
        assert_eq!(f.page.viewport().scroll_y, 3000.0);
        f.page.advance_to(ms(800));
        assert!(visible(&f.page, f.far));
    }

    #[test]
    fn test_user_scroll_interrupts_animation() {
        let mut f = loaded();
        f.page.dispatch(PageEvent::Click { target: f.nav_link });
        f.page.advance_to(ms(100));
        f.page.dispatch(PageEvent::Scroll { offset: 10.0 });
        assert!(!f.page.is_scrolling());
        f.page.advance_to(ms(1000));
        assert_eq!(f.page.viewport().scroll_y, 10.0);
    }

    #[test]
    fn test_click_outside_anchor_keeps_default() {
        let mut f = loaded();
        let outcome = f.page.dispatch(PageEvent::Click { target: f.near });
        assert_eq!(outcome, DispatchOutcome::default());
    }

    #[test]
    fn test_host_intersection_entries() {
        let mut f = fixture();
        f.page.dispatch(PageEvent::DomContentLoaded);
        f.page.advance_to(ms(500));
        f.page.dispatch(PageEvent::Intersection {
            group: RevealGroup::Sections,
            entries: vec![IntersectionEntry::new(f.near, 0.0, false)],
        });
        f.page.advance_to(ms(600));
        assert!(!visible(&f.page, f.near));
    }

    #[test]
    fn test_pointer_moves_shapes() {
        let mut doc = Document::new();
        let body = doc.body();
        let shapes = doc.append(body, ElementSpec::new("div").class("floating-shapes"));
        let shape = doc.append(shapes, ElementSpec::new("div").class("shape"));
        let mut page = Page::new(doc, Viewport::new(1000.0, 800.0), AppConfig::default()).unwrap();
        page.dispatch(PageEvent::PointerMove { x: 700.0, y: 300.0 });
        assert_eq!(
            page.document().style(shape, "transform"),
            Some("translate(2px, -1px) rotate(0.2deg)")
        );
    }

    #[test]
    fn test_updates_serialize_with_timestamp() {
        let update = PageUpdate {
            at: ms(250),
            mutation: Mutation::ClassAdded {
                element: ElementId(4),
                class: "visible".into(),
            },
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["at_ms"], 250);
        assert_eq!(json["type"], "class_added");
        assert_eq!(json["class"], "visible");
    }

    #[test]
    fn test_describe_update() {
        let f = fixture();
        let update = PageUpdate {
            at: ms(0),
            mutation: Mutation::StyleSet {
                element: f.bar,
                property: "width".into(),
                value: "25%".into(),
            },
        };
        assert_eq!(
            update.describe(f.page.document()),
            "div.scroll-progress-bar {width: 25%}"
        );
    }
}
