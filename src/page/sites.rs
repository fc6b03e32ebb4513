//! Known-site composer lookups.
//!
//! Each rule is keyed by hostname substrings and knows where that site keeps
//! its chat box. Rules that find nothing fall through to the generic scan.

use super::{NodeId, Page, Rect, ResolverTuning, Selector};

type Locate = fn(&dyn Page, &ResolverTuning) -> Option<Rect>;
type Gate = fn(&dyn Page) -> bool;

pub struct SiteRule {
    pub name: &'static str,
    /// Matches when the hostname contains any of these.
    pub hosts: &'static [&'static str],
    pub locate: Locate,
    /// Extra applicability check. `false` hides the pets on this page.
    pub gate: Option<Gate>,
}

impl SiteRule {
    fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| host.contains(h))
    }
}

/// Evaluated top to bottom.
pub static SITES: &[SiteRule] = &[
    SiteRule {
        name: "chatgpt",
        hosts: &["chatgpt.com", "openai"],
        locate: chatgpt,
        gate: None,
    },
    SiteRule {
        name: "claude",
        hosts: &["claude.ai"],
        locate: claude,
        gate: None,
    },
    SiteRule {
        name: "gemini",
        hosts: &["gemini.google.com"],
        locate: gemini,
        gate: None,
    },
    SiteRule {
        name: "perplexity",
        hosts: &["perplexity.ai"],
        locate: perplexity,
        gate: None,
    },
    SiteRule {
        name: "copilot",
        hosts: &["copilot.microsoft.com", "bing.com"],
        locate: copilot,
        gate: None,
    },
    SiteRule {
        name: "bolt",
        hosts: &["bolt.new"],
        locate: bolt,
        gate: None,
    },
    SiteRule {
        name: "lovable",
        hosts: &["lovable.dev"],
        locate: lovable,
        gate: None,
    },
    SiteRule {
        name: "createanything",
        hosts: &["createanything.com"],
        locate: textarea_container,
        gate: None,
    },
    SiteRule {
        name: "deepseek",
        hosts: &["deepseek.com"],
        locate: textarea_container,
        gate: None,
    },
    SiteRule {
        name: "blackbox",
        hosts: &["blackbox.ai"],
        locate: blackbox,
        gate: Some(has_blackbox_chat),
    },
    SiteRule {
        name: "v0",
        hosts: &["v0.dev", "v0.app"],
        locate: v0,
        gate: None,
    },
    SiteRule {
        name: "replit",
        hosts: &["replit.com"],
        locate: replit,
        gate: Some(in_replit_workspace),
    },
];

/// Rules whose hostname filter matches this page.
fn rules_for<'p>(page: &'p dyn Page) -> impl Iterator<Item = &'static SiteRule> + 'p {
    SITES.iter().filter(move |rule| rule.matches_host(page.hostname()))
}

/// `false` when a matching rule says pets don't belong on this page.
pub fn applicable(page: &dyn Page) -> bool {
    rules_for(page).all(|rule| rule.gate.map_or(true, |gate| gate(page)))
}

/// First matching rule that finds its composer.
pub fn locate(page: &dyn Page, tuning: &ResolverTuning) -> Option<(&'static str, Rect)> {
    rules_for(page).find_map(|rule| {
        let rect = (rule.locate)(page, tuning)?;
        log::trace!("site rule {} matched at {:?}", rule.name, rect);
        Some((rule.name, rect))
    })
}

/// First element matched by any selector, in selector order.
fn first(page: &dyn Page, selectors: &[Selector<'_>]) -> Option<NodeId> {
    selectors.iter().find_map(|s| page.select(s))
}

/// Walk a chain of open shadow roots: the first selector is matched in the
/// document, each following one inside the previous match's shadow tree.
fn shadow_path(page: &dyn Page, path: &[Selector<'_>]) -> Option<NodeId> {
    let (head, rest) = path.split_first()?;
    let mut current = page.select(head)?;
    for selector in rest {
        current = page.select_in_shadow(current, selector)?;
    }
    Some(current)
}

fn chatgpt(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let form = Selector::tag("form");
    let el = first(
        page,
        &[Selector::id("prompt-textarea"), Selector::tag("textarea").inside(&form)],
    )?;
    Some(page.container_rect(el))
}

/// Claude's editor is a bare contenteditable; the bordered box is the
/// enclosing fieldset, or failing that the first ancestor about as wide.
fn claude(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let el = page.select(&Selector::any().attr("contenteditable", "true"))?;
    if let Some(fieldset) = page.closest(el, &Selector::tag("fieldset")) {
        return Some(page.rect(fieldset));
    }

    let min_width = page.rect(el).width * 0.9;
    let mut container = page.parent(el);
    while let Some(c) = container {
        if page.rect(c).width >= min_width {
            break;
        }
        container = page.parent(c);
    }
    Some(page.rect(container.unwrap_or(el)))
}

fn gemini(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let el = first(page, &[Selector::class("input-area"), Selector::tag("rich-textarea")])?;
    Some(page.rect(el))
}

fn perplexity(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let el = first(
        page,
        &[
            Selector::id("ask-input"),
            Selector::tag("textarea").attr_contains("placeholder", "Ask"),
        ],
    )?;
    let rounded = page
        .closest(el, &Selector::class("rounded-2xl"))
        .or_else(|| page.closest(el, &Selector::class("rounded-full")));
    Some(match rounded {
        Some(c) => page.rect(c),
        None => page.container_rect(el),
    })
}

fn copilot(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let el = first(
        page,
        &[
            Selector::tag("textarea").attr("data-testid", "composer-input"),
            Selector::id("userInput"),
        ],
    );
    if let Some(el) = el {
        let rect = match page.closest(el, &Selector::class("rounded-3xl")) {
            Some(c) => page.rect(c),
            None => page.container_rect(el),
        };
        return Some(rect.lifted(tuning.site_lift));
    }

    // Older Bing chat nests the input two shadow roots deep.
    let el = shadow_path(
        page,
        &[
            Selector::tag("cib-serp"),
            Selector::tag("cib-action-bar"),
            Selector::tag("cib-text-input"),
        ],
    )?;
    Some(page.rect(el).lifted(tuning.site_lift))
}

fn bolt(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let el = page.select(&Selector::tag("textarea"))?;
    Some(page.container_rect(el).lifted(tuning.site_lift))
}

fn lovable(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let el = first(
        page,
        &[Selector::tag("textarea"), Selector::tag("input").attr("type", "text")],
    )?;
    Some(page.container_rect(el).lifted(tuning.site_lift))
}

fn textarea_container(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let el = page.select(&Selector::tag("textarea"))?;
    Some(page.container_rect(el))
}

const BLACKBOX_INPUT: &str = "chat-input-box";

fn blackbox(page: &dyn Page, tuning: &ResolverTuning) -> Option<Rect> {
    let el = page.select(&Selector::id(BLACKBOX_INPUT))?;
    Some(page.container_rect(el).lifted(tuning.site_lift))
}

/// Landing and marketing pages have no chat box.
fn has_blackbox_chat(page: &dyn Page) -> bool {
    page.select(&Selector::id(BLACKBOX_INPUT)).is_some()
}

fn v0(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let el = first(page, &[Selector::class("ProseMirror"), Selector::tag("textarea")])?;
    let form = Selector::tag("form").attr("data-prompt-form", "true");
    Some(match page.closest(el, &form) {
        Some(f) => page.rect(f),
        None => page.container_rect(el),
    })
}

fn replit(page: &dyn Page, _: &ResolverTuning) -> Option<Rect> {
    let prompt = Selector::id("ai-prompt-input");
    let el = first(
        page,
        &[prompt, Selector::class("monaco-editor"), Selector::tag("textarea")],
    )?;
    // The AI prompt id sits on the bordered container already.
    if page.matches(el, &prompt) {
        Some(page.rect(el))
    } else {
        Some(page.container_rect(el))
    }
}

/// Workspaces live under `/@user/...` and `/~`; everything else is the
/// dashboard.
fn in_replit_workspace(page: &dyn Page) -> bool {
    let path = page.path();
    path.contains("/@") || path.contains("/~")
}
