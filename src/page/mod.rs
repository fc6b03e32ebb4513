//! Page inspection and boundary resolution.
//!
//! The resolver maps whatever page the pets live on to an anchor rectangle,
//! usually the chat composer, whose top edge becomes the floor. Lookup goes
//! known-site rules, then a generic text-entry scan, then a bottom form, and
//! finally the bare viewport.

pub mod dom;
pub mod generic;
pub mod sites;

use glam::Vec2;
use serde::Deserialize;

pub use dom::DomSnapshot;

/// Index of an element inside a `Page`.
pub type NodeId = usize;

/// Tags that count as the page root when looking for a visual container.
const ROOT_TAGS: [&str; 2] = ["body", "html"];

/// Layout box in viewport pixels, as reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Extend the top edge upward, keeping the bottom edge in place.
    pub fn lifted(self, by: f32) -> Self {
        Self {
            y: self.y - by,
            height: self.height + by,
            ..self
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Attribute comparison used by `Selector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[name="value"]`
    Equals,
    /// `[name*="value"]`
    Contains,
}

/// A small element matcher: tag, id, class, one attribute, and an optional
/// ancestor that must also match. All present parts must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector<'a> {
    pub tag: Option<&'a str>,
    pub id: Option<&'a str>,
    pub class: Option<&'a str>,
    pub attr: Option<(&'a str, AttrOp, &'a str)>,
    pub within: Option<&'a Selector<'a>>,
}

impl<'a> Selector<'a> {
    /// Matches any element.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &'a str) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn id(id: &'a str) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn class(class: &'a str) -> Self {
        Self {
            class: Some(class),
            ..Self::default()
        }
    }

    pub fn attr(self, name: &'a str, value: &'a str) -> Self {
        Self {
            attr: Some((name, AttrOp::Equals, value)),
            ..self
        }
    }

    pub fn attr_contains(self, name: &'a str, value: &'a str) -> Self {
        Self {
            attr: Some((name, AttrOp::Contains, value)),
            ..self
        }
    }

    /// Require an ancestor matching `outer`.
    pub fn inside(self, outer: &'a Selector<'a>) -> Self {
        Self {
            within: Some(outer),
            ..self
        }
    }
}

/// Read-only view of the host page. The simulation never mutates it.
pub trait Page {
    fn hostname(&self) -> &str;

    fn path(&self) -> &str;

    /// Viewport size in pixels.
    fn viewport(&self) -> Vec2;

    /// Matches outside any shadow tree, in document order.
    fn select_all(&self, selector: &Selector<'_>) -> Vec<NodeId>;

    /// First match inside the open shadow tree attached to `host`.
    fn select_in_shadow(&self, host: NodeId, selector: &Selector<'_>) -> Option<NodeId>;

    fn matches(&self, node: NodeId, selector: &Selector<'_>) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Lowercase tag name.
    fn tag(&self, node: NodeId) -> &str;

    fn rect(&self, node: NodeId) -> Rect;

    fn select(&self, selector: &Selector<'_>) -> Option<NodeId> {
        self.select_all(selector).into_iter().next()
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.matches(n, selector) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// The parent usually draws the composer border, so prefer its box
    /// unless the parent is the page root.
    fn container_rect(&self, node: NodeId) -> Rect {
        match self.parent(node) {
            Some(p) if !ROOT_TAGS.contains(&self.tag(p)) => self.rect(p),
            _ => self.rect(node),
        }
    }
}

/// Empirically tuned resolver thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverTuning {
    /// Candidate center must sit below this fraction of the viewport height.
    pub min_center: f32,
    /// ...and above this one, so fully scrolled-off inputs are skipped.
    pub max_center: f32,
    /// Minimum candidate width as a fraction of the viewport width.
    pub min_width: f32,
    /// Forms must start below this fraction of the viewport height.
    pub form_band: f32,
    /// Upward extension applied by sites whose composer border sits above
    /// the element box.
    pub site_lift: f32,
}

impl Default for ResolverTuning {
    fn default() -> Self {
        Self {
            min_center: 0.5,
            max_center: 0.99,
            min_width: 0.2,
            form_band: 0.6,
            site_lift: 20.0,
        }
    }
}

/// Which resolver tier produced an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSource {
    Site(&'static str),
    TextEntry,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub rect: Rect,
    pub source: AnchorSource,
}

/// Floor line and wall bounds for one sprite, derived fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Sprite top coordinate at which the sprite stands on the floor.
    pub floor_y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Boundary {
    /// Bounds for a sprite of `size`, standing on `anchor` or on the viewport
    /// bottom when there is none. `ground_offset` sinks the sprite slightly
    /// into the anchor so its feet overlap the border.
    pub fn for_sprite(anchor: Option<&Rect>, viewport: Vec2, size: Vec2, ground_offset: f32) -> Self {
        match anchor {
            Some(rect) => Self {
                floor_y: rect.top() - size.y + ground_offset,
                min_x: rect.left().max(0.0),
                max_x: (viewport.x - size.x).min(rect.right() - size.x),
            },
            None => Self {
                floor_y: viewport.y - size.y,
                min_x: 0.0,
                max_x: viewport.x - size.x,
            },
        }
    }
}

/// Whether pets should be shown on this page at all.
pub fn is_applicable(page: &dyn Page) -> bool {
    sites::applicable(page)
}

/// Run the resolver tiers in order. `None` means stand on the viewport.
pub fn resolve_anchor(page: &dyn Page, tuning: &ResolverTuning) -> Option<Anchor> {
    if let Some((name, rect)) = sites::locate(page, tuning) {
        return Some(Anchor {
            rect,
            source: AnchorSource::Site(name),
        });
    }
    if let Some(rect) = generic::text_entry(page, tuning) {
        return Some(Anchor {
            rect,
            source: AnchorSource::TextEntry,
        });
    }
    generic::bottom_form(page, tuning).map(|rect| Anchor {
        rect,
        source: AnchorSource::Form,
    })
}

/// Resolve bounds for a single sprite. Never fails.
pub fn resolve_boundary(
    page: &dyn Page,
    tuning: &ResolverTuning,
    size: Vec2,
    ground_offset: f32,
) -> Boundary {
    let anchor = resolve_anchor(page, tuning);
    Boundary::for_sprite(anchor.as_ref().map(|a| &a.rect), page.viewport(), size, ground_offset)
}
