use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use super::{AttrOp, NodeId, Page, Rect, Selector};
use crate::error::LoadError;

/// One element of a page snapshot, nested the way the page nests it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Space-separated class list.
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
    /// Children of an attached open shadow root.
    #[serde(default)]
    pub shadow: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn shadow_child(mut self, child: ElementSpec) -> Self {
        self.shadow.push(child);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ViewportSpec {
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
struct SnapshotSpec {
    hostname: String,
    #[serde(default = "default_path")]
    path: String,
    viewport: ViewportSpec,
    #[serde(default)]
    elements: Vec<ElementSpec>,
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    rect: Rect,
    parent: Option<NodeId>,
    /// Host element whose shadow tree contains this element.
    shadow_host: Option<NodeId>,
}

/// Frozen, in-memory page: an element arena in document order.
#[derive(Debug, Clone)]
pub struct DomSnapshot {
    hostname: String,
    path: String,
    viewport: Vec2,
    elements: Vec<Element>,
}

impl DomSnapshot {
    pub fn new(hostname: &str, path: &str, viewport: Vec2) -> Self {
        Self {
            hostname: hostname.to_string(),
            path: path.to_string(),
            viewport,
            elements: Vec::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let snapshot: SnapshotSpec = serde_json::from_str(text)?;
        let mut page = Self::new(
            &snapshot.hostname,
            &snapshot.path,
            Vec2::new(snapshot.viewport.width, snapshot.viewport.height),
        );
        for element in snapshot.elements {
            page.add(None, element);
        }
        Ok(page)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Move an element, e.g. a composer growing as text is typed.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.elements.get_mut(node) {
            el.rect = rect;
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `element` and its descendants under `parent`. Returns the id of
    /// `element` itself; descendants follow in pre-order.
    pub fn add(&mut self, parent: Option<NodeId>, element: ElementSpec) -> NodeId {
        let shadow_host = parent
            .and_then(|p| self.elements.get(p))
            .and_then(|el| el.shadow_host);
        self.insert(parent, shadow_host, element)
    }

    /// Append `element` to the open shadow root of `host`.
    pub fn add_shadow(&mut self, host: NodeId, element: ElementSpec) -> NodeId {
        self.insert(None, Some(host), element)
    }

    fn insert(&mut self, parent: Option<NodeId>, shadow_host: Option<NodeId>, element: ElementSpec) -> NodeId {
        let node = self.elements.len();
        self.elements.push(Element {
            tag: element.tag.to_ascii_lowercase(),
            id: element.id,
            classes: element.class.split_whitespace().map(str::to_string).collect(),
            attrs: element.attrs,
            rect: element.rect,
            parent,
            shadow_host,
        });
        for child in element.children {
            self.insert(Some(node), shadow_host, child);
        }
        for child in element.shadow {
            self.insert(None, Some(node), child);
        }
        node
    }

    fn element_matches(&self, el: &Element, selector: &Selector<'_>) -> bool {
        if let Some(tag) = selector.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = selector.id {
            if el.id.as_deref() != Some(id) {
                return false;
            }
        }
        if let Some(class) = selector.class {
            if !el.classes.iter().any(|c| c == class) {
                return false;
            }
        }
        if let Some((name, op, value)) = selector.attr {
            let Some(actual) = el.attrs.get(name) else {
                return false;
            };
            let ok = match op {
                AttrOp::Equals => actual == value,
                AttrOp::Contains => actual.contains(value),
            };
            if !ok {
                return false;
            }
        }
        if let Some(outer) = selector.within {
            let mut ancestor = el.parent;
            loop {
                match ancestor {
                    Some(a) if self.element_matches(&self.elements[a], outer) => break,
                    Some(a) => ancestor = self.elements[a].parent,
                    None => return false,
                }
            }
        }
        true
    }
}

impl Page for DomSnapshot {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn select_all(&self, selector: &Selector<'_>) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.shadow_host.is_none() && self.element_matches(el, selector))
            .map(|(i, _)| i)
            .collect()
    }

    fn select_in_shadow(&self, host: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.shadow_host == Some(host) && self.element_matches(el, selector))
    }

    fn matches(&self, node: NodeId, selector: &Selector<'_>) -> bool {
        self.elements
            .get(node)
            .is_some_and(|el| self.element_matches(el, selector))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements.get(node).and_then(|el| el.parent)
    }

    fn tag(&self, node: NodeId) -> &str {
        self.elements.get(node).map_or("", |el| el.tag.as_str())
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.elements.get(node).map_or(Rect::default(), |el| el.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> DomSnapshot {
        let mut page = DomSnapshot::new("example.com", "/chat", Vec2::new(1000.0, 800.0));
        page.add(
            None,
            ElementSpec::new("form")
                .with_attr("data-prompt-form", "true")
                .child(
                    ElementSpec::new("TEXTAREA")
                        .with_id("prompt")
                        .with_class("big rounded-2xl")
                        .with_attr("placeholder", "Ask anything"),
                ),
        );
        page.add(None, ElementSpec::new("textarea").with_id("loose"));
        page
    }

    #[test]
    fn selector_parts() {
        let page = page();
        assert_eq!(page.select(&Selector::id("prompt")), Some(1));
        assert_eq!(page.tag(1), "textarea");
        assert_eq!(page.select(&Selector::class("rounded-2xl")), Some(1));
        assert_eq!(page.select(&Selector::class("rounded")), None);
        assert_eq!(
            page.select(&Selector::tag("textarea").attr_contains("placeholder", "Ask")),
            Some(1)
        );
        assert_eq!(
            page.select(&Selector::tag("textarea").attr("placeholder", "Ask")),
            None
        );
        assert_eq!(page.select_all(&Selector::tag("textarea")), vec![1, 2]);
    }

    #[test]
    fn descendant_and_closest() {
        let page = page();
        let form = Selector::tag("form");
        assert_eq!(page.select_all(&Selector::tag("textarea").inside(&form)), vec![1]);

        let prompt_form = Selector::tag("form").attr("data-prompt-form", "true");
        assert_eq!(page.closest(1, &prompt_form), Some(0));
        assert_eq!(page.closest(2, &prompt_form), None);
        assert_eq!(page.closest(1, &Selector::id("prompt")), Some(1));
    }

    #[test]
    fn shadow_trees_are_separate() {
        let mut page = DomSnapshot::new("www.bing.com", "/", Vec2::new(1000.0, 800.0));
        let host = page.add(
            None,
            ElementSpec::new("cib-serp").shadow_child(
                ElementSpec::new("cib-action-bar")
                    .shadow_child(ElementSpec::new("cib-text-input").at(Rect::new(0.0, 700.0, 800.0, 50.0))),
            ),
        );

        assert_eq!(page.select(&Selector::tag("cib-action-bar")), None);
        let bar = page.select_in_shadow(host, &Selector::tag("cib-action-bar")).unwrap();
        assert_eq!(page.select_in_shadow(host, &Selector::tag("cib-text-input")), None);
        let input = page.select_in_shadow(bar, &Selector::tag("cib-text-input")).unwrap();
        assert_eq!(page.rect(input).y, 700.0);

        // Late additions to an existing shadow root stay inside it.
        let panel = page.add_shadow(host, ElementSpec::new("cib-side-panel"));
        assert_eq!(page.select(&Selector::tag("cib-side-panel")), None);
        assert_eq!(page.select_in_shadow(host, &Selector::tag("cib-side-panel")), Some(panel));
        assert_eq!(page.select_in_shadow(bar, &Selector::tag("cib-side-panel")), None);
    }

    #[test]
    fn parses_json_snapshot() {
        let page = DomSnapshot::from_json(
            r#"{
                "hostname": "chatgpt.com",
                "viewport": { "width": 1280, "height": 720 },
                "elements": [
                    { "tag": "div", "class": "composer",
                      "rect": { "x": 200, "y": 600, "width": 800, "height": 90 },
                      "children": [ { "tag": "div", "id": "prompt-textarea",
                                      "attrs": { "contenteditable": "true" } } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.hostname(), "chatgpt.com");
        assert_eq!(page.path(), "/");
        assert_eq!(page.viewport(), Vec2::new(1280.0, 720.0));
        assert_eq!(page.len(), 2);
        assert_eq!(page.parent(1), Some(0));
        assert_eq!(page.rect(0).right(), 1000.0);
    }
}
