//! Viewport geometry and intersection observation.
//!
//! `IntersectionObserver` reproduces what a browser reports to observer
//! callbacks: the ratio of an element's area inside the (margin-expanded)
//! viewport, and an entry only when a threshold is crossed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, ElementId, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Vertical scroll offset of the document
    #[serde(default)]
    pub scroll_y: f64,
    /// Total scrollable height; taken from the document when zero
    #[serde(default)]
    pub scroll_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
            scroll_height: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.height).max(0.0)
    }

    /// Viewport rectangle in document coordinates, grown vertically by `margin`
    pub fn root_rect(&self, margin: f64) -> Rect {
        Rect::new(
            self.scroll_y - margin,
            0.0,
            self.width,
            self.height + margin * 2.0,
        )
    }

    /// Ratio of `target` inside the margin-expanded viewport.
    /// Returns `(ratio, is_intersecting)`.
    pub fn intersection(&self, target: &Rect, margin: f64) -> (f64, bool) {
        match target.intersection(&self.root_rect(margin)) {
            Some(overlap) => {
                let area = target.area();
                let ratio = if area > 0.0 {
                    (overlap.area() / area).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                (ratio, true)
            }
            None => (0.0, false),
        }
    }
}

/// One observation delivered to an observer callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(target: ElementId, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            target,
            ratio,
            is_intersecting,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    root_margin: f64,
    thresholds: Vec<f64>,
    targets: Vec<ElementId>,
    /// Last reported (threshold index, intersecting) per target
    previous: HashMap<ElementId, (usize, bool)>,
}

impl IntersectionObserver {
    pub fn new(root_margin: f64, thresholds: &[f64]) -> Self {
        let mut thresholds: Vec<f64> = thresholds
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self {
            root_margin,
            thresholds,
            targets: Vec::new(),
            previous: HashMap::new(),
        }
    }

    pub fn observe(&mut self, target: ElementId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn root_margin(&self) -> f64 {
        self.root_margin
    }

    fn threshold_index(&self, ratio: f64, is_intersecting: bool) -> usize {
        if !is_intersecting {
            return 0;
        }
        self.thresholds.iter().filter(|&&t| ratio >= t).count()
    }

    /// Entries for targets whose threshold bucket or intersecting flag changed
    /// since the last call. Every target reports once on its first call.
    pub fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for &target in &self.targets {
            let Some(rect) = doc.rect(target) else {
                continue;
            };
            let (ratio, is_intersecting) = viewport.intersection(&rect, self.root_margin);
            let index = self.threshold_index(ratio, is_intersecting);
            let changed = self.previous.get(&target) != Some(&(index, is_intersecting));
            if changed {
                self.previous.insert(target, (index, is_intersecting));
                entries.push(IntersectionEntry::new(target, ratio, is_intersecting));
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    fn doc_with(rects: &[Rect]) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let ids = rects
            .iter()
            .map(|r| doc.append(body, ElementSpec::new("section").rect(*r)))
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_ratio_with_margin() {
        let viewport = Viewport::new(1000.0, 800.0);
        // Starts 50px below the fold; margin 100 exposes 50 of 200px
        let rect = Rect::new(850.0, 0.0, 1000.0, 200.0);
        let (ratio, hit) = viewport.intersection(&rect, 100.0);
        assert!(hit);
        assert!((ratio - 0.25).abs() < 1e-9);

        let (ratio, hit) = viewport.intersection(&rect, 0.0);
        assert!(!hit);
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_first_call_reports_everything() {
        let (doc, ids) = doc_with(&[
            Rect::new(0.0, 0.0, 1000.0, 400.0),
            Rect::new(3000.0, 0.0, 1000.0, 400.0),
        ]);
        let mut observer = IntersectionObserver::new(0.0, &[0.0, 0.5]);
        for id in &ids {
            observer.observe(*id);
        }
        let viewport = Viewport::new(1000.0, 800.0);
        let entries = observer.take_records(&doc, &viewport);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].ratio, 1.0);
        assert!(!entries[1].is_intersecting);

        // Nothing moved, nothing reported
        assert!(observer.take_records(&doc, &viewport).is_empty());
    }

    #[test]
    fn test_reports_only_threshold_crossings() {
        let (doc, ids) = doc_with(&[Rect::new(800.0, 0.0, 1000.0, 1000.0)]);
        let mut observer = IntersectionObserver::new(0.0, &[0.0, 0.2, 0.5]);
        observer.observe(ids[0]);
        let mut viewport = Viewport::new(1000.0, 800.0);
        viewport.scroll_height = 5000.0;
        // Edge-adjacent: intersecting at ratio 0
        let first = observer.take_records(&doc, &viewport);
        assert_eq!(first.len(), 1);
        assert!(first[0].is_intersecting);

        viewport.scroll_y = 100.0; // 0.1 visible, same bucket as 0.0
        assert!(observer.take_records(&doc, &viewport).is_empty());

        viewport.scroll_y = 300.0; // 0.3 visible, crosses 0.2
        let crossed = observer.take_records(&doc, &viewport);
        assert_eq!(crossed.len(), 1);
        assert!((crossed[0].ratio - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_thresholds_are_normalized() {
        let observer = IntersectionObserver::new(0.0, &[0.5, 0.0, 0.5, 2.0]);
        assert_eq!(observer.thresholds, vec![0.0, 0.5, 1.0]);
        let empty = IntersectionObserver::new(0.0, &[]);
        assert_eq!(empty.thresholds, vec![0.0]);
    }
}
