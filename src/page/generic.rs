//! Site-agnostic composer heuristics.

use super::{Page, Rect, ResolverTuning, Selector};

/// Text entry candidates, scanned in this order. Ties keep the earlier one.
fn text_entry_selectors() -> [Selector<'static>; 3] {
    [
        Selector::tag("textarea"),
        Selector::tag("div").attr("contenteditable", "true"),
        Selector::tag("input").attr("type", "text"),
    ]
}

/// Pick the widest, lowest visible text entry and return its container box.
pub fn text_entry(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let viewport = page.viewport();
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }

    let mut best: Option<(f32, usize)> = None;
    for selector in text_entry_selectors() {
        for node in page.select_all(&selector) {
            let rect = page.rect(node);
            if rect.width <= 0.0 || rect.height <= 0.0 || rect.top() < 0.0 {
                continue;
            }

            let bottom = (rect.top() + rect.height / 2.0) / viewport.y;
            let width = rect.width / viewport.x;
            if bottom <= tuning.min_center || bottom >= tuning.max_center || width <= tuning.min_width {
                continue;
            }

            let score = bottom * 2.0 + width;
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, node));
            }
        }
    }

    best.map(|(_, node)| page.container_rect(node))
}

/// First form starting in the bottom band of the viewport.
pub fn bottom_form(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let band = page.viewport().y * tuning.form_band;
    page.select_all(&Selector::tag("form"))
        .into_iter()
        .map(|node| page.rect(node))
        .find(|rect| rect.top() > band)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::page::dom::ElementSpec;
    use crate::page::DomSnapshot;

    fn page() -> DomSnapshot {
        DomSnapshot::new("example.com", "/", Vec2::new(1000.0, 800.0))
    }

    #[test]
    fn prefers_low_and_wide() {
        let mut page = page();
        // Search box near the top: rejected by the center band.
        page.add(None, ElementSpec::new("input").with_attr("type", "text").at(Rect::new(0.0, 20.0, 900.0, 30.0)));
        // Narrow box at the bottom: rejected by width.
        page.add(None, ElementSpec::new("textarea").at(Rect::new(0.0, 700.0, 150.0, 40.0)));
        // Two acceptable composers; the lower one wins.
        page.add(None, ElementSpec::new("textarea").at(Rect::new(100.0, 500.0, 600.0, 40.0)));
        let low = page.add(
            None,
            ElementSpec::new("div")
                .with_attr("contenteditable", "true")
                .at(Rect::new(100.0, 650.0, 500.0, 40.0)),
        );

        let rect = text_entry(&page, &ResolverTuning::default()).unwrap();
        assert_eq!(rect, page.rect(low));
    }

    #[test]
    fn skips_hidden_and_scrolled_off() {
        let mut page = page();
        page.add(None, ElementSpec::new("textarea").at(Rect::new(100.0, 700.0, 0.0, 40.0)));
        page.add(None, ElementSpec::new("textarea").at(Rect::new(100.0, -50.0, 600.0, 40.0)));
        page.add(None, ElementSpec::new("textarea").at(Rect::new(100.0, 800.0, 600.0, 40.0)));
        assert_eq!(text_entry(&page, &ResolverTuning::default()), None);
    }

    #[test]
    fn center_band_is_exclusive() {
        let mut page = page();
        // Center exactly at half height.
        page.add(None, ElementSpec::new("textarea").at(Rect::new(0.0, 380.0, 600.0, 40.0)));
        assert_eq!(text_entry(&page, &ResolverTuning::default()), None);
    }

    #[test]
    fn returns_container_box() {
        let mut page = page();
        page.add(
            None,
            ElementSpec::new("div")
                .at(Rect::new(80.0, 620.0, 700.0, 100.0))
                .child(ElementSpec::new("textarea").at(Rect::new(100.0, 640.0, 600.0, 40.0))),
        );
        assert_eq!(
            text_entry(&page, &ResolverTuning::default()),
            Some(Rect::new(80.0, 620.0, 700.0, 100.0))
        );
    }

    #[test]
    fn degenerate_viewport() {
        let mut page = page();
        page.add(None, ElementSpec::new("textarea").at(Rect::new(100.0, 640.0, 600.0, 40.0)));
        page.set_viewport(Vec2::ZERO);
        assert_eq!(text_entry(&page, &ResolverTuning::default()), None);
    }

    #[test]
    fn form_must_sit_low() {
        let mut page = page();
        page.add(None, ElementSpec::new("form").at(Rect::new(0.0, 100.0, 1000.0, 50.0)));
        assert_eq!(bottom_form(&page, &ResolverTuning::default()), None);

        page.add(None, ElementSpec::new("form").at(Rect::new(0.0, 560.0, 1000.0, 50.0)));
        page.add(None, ElementSpec::new("form").at(Rect::new(0.0, 700.0, 1000.0, 50.0)));
        assert_eq!(bottom_form(&page, &ResolverTuning::default()).map(|r| r.y), Some(560.0));
    }
}
