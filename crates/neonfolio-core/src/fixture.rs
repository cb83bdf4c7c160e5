//! Built-in portfolio page used by the demo and the terminal preview.

use crate::dom::{Document, ElementSpec, Rect};
use crate::event::KeyPress;
use crate::scenario::{Scenario, ScenarioElement, ScenarioEvent, TimedEvent};
use crate::viewport::Viewport;
use crate::Result;

pub const PAGE_WIDTH: f64 = 1280.0;
pub const PAGE_HEIGHT: f64 = 800.0;

/// Top-level sections: (id, top, height)
pub const SECTIONS: [(&str, f64, f64); 5] = [
    ("home", 0.0, 800.0),
    ("about", 800.0, 900.0),
    ("skills", 1700.0, 900.0),
    ("certifications", 2600.0, 1100.0),
    ("contact", 3700.0, 700.0),
];

fn rect(top: f64, left: f64, width: f64, height: f64) -> Rect {
    Rect::new(top, left, width, height)
}

fn element(tag: &str) -> ElementSpec {
    ElementSpec::new(tag)
}

/// Elements of the demo page in insertion order
pub fn portfolio_elements() -> Vec<ScenarioElement> {
    let mut elements = vec![
        ScenarioElement::new(
            element("nav")
                .id("navbar")
                .class("navbar")
                .rect(rect(0.0, 0.0, PAGE_WIDTH, 70.0)),
        ),
        ScenarioElement::under(
            "navbar",
            element("ul").id("nav-links").class("nav-links"),
        ),
    ];
    for (id, _, _) in SECTIONS {
        elements.push(ScenarioElement::under(
            "nav-links",
            element("a").class("nav-link").attr("href", format!("#{}", id)),
        ));
    }
    elements.push(ScenarioElement::new(
        element("div")
            .class("scroll-progress")
            .id("scroll-progress"),
    ));
    elements.push(ScenarioElement::under(
        "scroll-progress",
        element("div").class("scroll-progress-bar"),
    ));

    // Hero
    let (_, top, height) = SECTIONS[0];
    elements.push(ScenarioElement::new(
        element("section")
            .id("home")
            .class("hero")
            .rect(rect(top, 0.0, PAGE_WIDTH, height)),
    ));
    elements.push(ScenarioElement::under(
        "home",
        element("div").id("shapes").class("floating-shapes"),
    ));
    for i in 0..4 {
        elements.push(ScenarioElement::under(
            "shapes",
            element("div")
                .class("shape")
                .class(format!("shape-{}", i + 1))
                .rect(rect(120.0 + i as f64 * 150.0, 100.0 + i as f64 * 280.0, 80.0, 80.0)),
        ));
    }
    elements.push(ScenarioElement::under(
        "home",
        element("div")
            .id("hero-content")
            .class("hero-content")
            .rect(rect(250.0, 240.0, 800.0, 300.0)),
    ));
    elements.push(ScenarioElement::under(
        "hero-content",
        element("h1")
            .attr("title", "Cyber Portfolio")
            .rect(rect(260.0, 240.0, 800.0, 90.0)),
    ));
    elements.push(ScenarioElement::under(
        "hero-content",
        element("a")
            .class("cta-button")
            .attr("href", "#contact")
            .rect(rect(450.0, 540.0, 200.0, 50.0)),
    ));

    // About
    let (_, top, height) = SECTIONS[1];
    elements.push(ScenarioElement::new(
        element("section")
            .id("about")
            .rect(rect(top, 0.0, PAGE_WIDTH, height)),
    ));
    elements.push(ScenarioElement::under(
        "about",
        element("h2")
            .class("section-title")
            .class("fade-in")
            .rect(rect(top + 80.0, 240.0, 800.0, 80.0)),
    ));
    elements.push(ScenarioElement::under(
        "about",
        element("div")
            .class("about-text")
            .class("slide-in-left")
            .rect(rect(top + 220.0, 80.0, 520.0, 500.0)),
    ));
    elements.push(ScenarioElement::under(
        "about",
        element("div")
            .class("about-stats")
            .class("slide-in-right")
            .attr("data-tooltip", "Stats")
            .rect(rect(top + 220.0, 680.0, 520.0, 500.0)),
    ));

    // Skills
    let (_, top, height) = SECTIONS[2];
    elements.push(ScenarioElement::new(
        element("section")
            .id("skills")
            .rect(rect(top, 0.0, PAGE_WIDTH, height)),
    ));
    elements.push(ScenarioElement::under(
        "skills",
        element("h2")
            .class("section-title")
            .class("fade-in")
            .rect(rect(top + 80.0, 240.0, 800.0, 80.0)),
    ));
    for i in 0..3 {
        elements.push(ScenarioElement::under(
            "skills",
            element("div")
                .class("skill-card")
                .class("scale-in")
                .rect(rect(top + 240.0, 80.0 + i as f64 * 400.0, 360.0, 520.0)),
        ));
    }

    // Certifications
    let (_, top, height) = SECTIONS[3];
    elements.push(ScenarioElement::new(
        element("section")
            .id("certifications")
            .rect(rect(top, 0.0, PAGE_WIDTH, height)),
    ));
    elements.push(ScenarioElement::under(
        "certifications",
        element("h2")
            .class("section-title")
            .class("fade-in")
            .rect(rect(top + 80.0, 240.0, 800.0, 80.0)),
    ));
    elements.push(ScenarioElement::under(
        "certifications",
        element("div").id("cert-grid").class("cert-grid"),
    ));
    for i in 0..6 {
        let row = (i / 3) as f64;
        let col = (i % 3) as f64;
        elements.push(ScenarioElement::under(
            "cert-grid",
            element("div")
                .class("cert-card")
                .attr("title", format!("Certificate {}", i + 1))
                .rect(rect(top + 220.0 + row * 420.0, 80.0 + col * 400.0, 360.0, 380.0)),
        ));
    }

    // Contact
    let (_, top, height) = SECTIONS[4];
    elements.push(ScenarioElement::new(
        element("section")
            .id("contact")
            .rect(rect(top, 0.0, PAGE_WIDTH, height)),
    ));
    elements.push(ScenarioElement::under(
        "contact",
        element("div")
            .class("contact-form")
            .class("fade-in")
            .rect(rect(top + 120.0, 240.0, 800.0, 420.0)),
    ));
    elements.push(ScenarioElement::under(
        "contact",
        element("a")
            .class("social-link")
            .attr("href", "https://github.com")
            .attr("title", "GitHub")
            .rect(rect(top + 600.0, 560.0, 48.0, 48.0)),
    ));

    // Hint noise the suppressor must deal with
    elements.push(ScenarioElement::new(
        element("div").attr("role", "tooltip"),
    ));
    elements.push(ScenarioElement::new(
        element("div").class("shortcut-overlay"),
    ));

    elements
}

/// The demo page as a document
pub fn portfolio_document() -> Result<Document> {
    demo_scenario().build_document()
}

pub fn portfolio_viewport() -> Viewport {
    Viewport::new(PAGE_WIDTH, PAGE_HEIGHT)
}

/// Load, wiggle the pointer, scroll to the bottom, jump home by anchor and
/// poke at the shortcut guard and the overlay suppressor.
pub fn demo_scenario() -> Scenario {
    let mut events = vec![
        TimedEvent::new(0, ScenarioEvent::Loaded),
        TimedEvent::new(200, ScenarioEvent::PointerMove { x: 900.0, y: 300.0 }),
        TimedEvent::new(260, ScenarioEvent::PointerMove { x: 400.0, y: 520.0 }),
    ];

    let mut at = 400;
    let mut offset = 0.0;
    let bottom = SECTIONS[4].1 + SECTIONS[4].2 - PAGE_HEIGHT;
    while offset < bottom {
        offset = (offset + 120.0_f64).min(bottom);
        events.push(TimedEvent::new(at, ScenarioEvent::Scroll { offset }));
        at += 60;
    }

    at += 600;
    events.push(TimedEvent::new(
        at,
        ScenarioEvent::KeyDown(KeyPress::new("F12")),
    ));
    events.push(TimedEvent::new(
        at + 100,
        ScenarioEvent::Insert {
            parent: Some("#contact".into()),
            element: element("span").class("tooltip").attr("title", "copied!"),
        },
    ));
    events.push(TimedEvent::new(
        at + 500,
        ScenarioEvent::Click {
            target: "a[href=\"#home\"]".into(),
        },
    ));

    Scenario {
        name: Some("portfolio scroll-through".into()),
        viewport: portfolio_viewport(),
        duration_ms: Some(at + 2000),
        elements: portfolio_elements(),
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::dom::SelectorList;
    use crate::reveal::VISIBLE_CLASS;

    #[test]
    fn test_document_has_expected_hooks() {
        let doc = portfolio_document().unwrap();
        assert_eq!(doc.select(".navbar").unwrap().len(), 1);
        assert_eq!(doc.select(".floating-shapes .shape").unwrap().len(), 4);
        assert_eq!(doc.select(".hero-content h1").unwrap().len(), 1);
        assert_eq!(doc.select(".cert-card").unwrap().len(), 6);
        assert_eq!(doc.select("a[href^=\"#\"]").unwrap().len(), 6);
        assert_eq!(doc.document_height(), 4400.0);
    }

    #[test]
    fn test_demo_reveals_everything_and_returns_home() {
        let scenario = demo_scenario();
        let mut config = AppConfig::default();
        config.glitch.seed = Some(1);
        let mut page = scenario.build_page(config).unwrap();
        let log = scenario.replay(&mut page, None).unwrap();

        assert_eq!(page.viewport().scroll_y, 0.0);
        let hero_title = page.document().select(".hero-content h1").unwrap()[0];
        assert!(page.document().attribute(hero_title, "title").is_none());
        let stats = page.document().select(".about-stats").unwrap()[0];
        assert_eq!(page.document().style(stats, "display"), Some("none"));
        assert_eq!(page.document().attribute(stats, "data-tooltip").as_deref(), Some("Stats"));

        let revealed = log
            .updates
            .iter()
            .filter(|u| matches!(&u.mutation, crate::dom::Mutation::ClassAdded { class, .. } if class == VISIBLE_CLASS))
            .count();
        let targets = page
            .document()
            .select(".fade-in, .slide-in-left, .slide-in-right, .scale-in, .cert-card")
            .unwrap()
            .len();
        assert!(revealed >= targets);

        let tooltip = SelectorList::parse("span.tooltip").unwrap();
        let tip = page.document().query_selector(&tooltip).unwrap();
        assert_eq!(page.document().style(tip, "display"), Some("none"));
        assert!(log.dispatches.iter().any(|d| d.kind == "key_down" && d.propagation_stopped));
    }
}
