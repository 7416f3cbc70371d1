use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Mutex;

use crate::errors::AcquisitionError;

use super::surface::{InputPhase, TranscriptSurface, UiNode};

// @module: TranscriptSurface backed by a saved panel HTML document

/// One element captured from the snapshot, in document order
#[derive(Debug)]
struct SnapshotNode {
    tag: String,
    id_attr: Option<String>,
    classes: Vec<String>,
    role: Option<String>,
    text: String,
    visible: bool,
    parent: Option<usize>,
    child_elements: usize,
}

/// A [`TranscriptSurface`] over a saved transcript-panel page.
///
/// The document is walked once at construction into an owned node list, so
/// the surface carries no parser state and is freely shareable. A snapshot
/// has no layout geometry: visibility derives from markup (`hidden`,
/// `aria-hidden`, inline display/visibility styles) and occlusion is never
/// reported. Clicks cannot change a static document; the full input-event
/// sequence is recorded instead and can be inspected via [`Self::input_log`].
#[derive(Debug)]
pub struct DomSnapshotSurface {
    nodes: Vec<SnapshotNode>,
    events: Mutex<Vec<(u64, InputPhase)>>,
}

/// Node id recorded for clicks on empty surface area
pub const ELSEWHERE_NODE_ID: u64 = u64::MAX;

impl DomSnapshotSurface {
    /// Build a surface from saved page markup
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut nodes = Vec::new();
        collect_elements(document.root_element(), None, true, &mut nodes);

        DomSnapshotSurface {
            nodes,
            events: Mutex::new(Vec::new()),
        }
    }

    /// The recorded input-event sequence, in dispatch order
    pub fn input_log(&self) -> Vec<(u64, InputPhase)> {
        self.events.lock().expect("event log poisoned").clone()
    }

    fn to_ui_node(&self, index: usize) -> UiNode {
        let node = &self.nodes[index];
        UiNode {
            id: index as u64,
            tag: node.tag.clone(),
            role: node.role.clone(),
            text: node.text.clone(),
            visible: node.visible,
            occluded_by: None,
        }
    }

    fn matching_indices(&self, selector: &str, within: Option<usize>) -> Vec<usize> {
        let alternatives = parse_selector(selector);

        (0..self.nodes.len())
            .filter(|&index| {
                if let Some(root) = within {
                    if !self.is_descendant_of(index, root) {
                        return false;
                    }
                }
                alternatives
                    .iter()
                    .any(|compound| self.matches_compound(index, compound))
            })
            .collect()
    }

    fn is_descendant_of(&self, index: usize, root: usize) -> bool {
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            if parent == root {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }

    /// Descendant-combinator matching: the last simple selector must match
    /// the node, the preceding ones some ancestor chain in order.
    fn matches_compound(&self, index: usize, compound: &[SimpleSelector]) -> bool {
        let Some((last, rest)) = compound.split_last() else {
            return false;
        };
        if !self.matches_simple(index, last) {
            return false;
        }

        let mut current = self.nodes[index].parent;
        for part in rest.iter().rev() {
            loop {
                let Some(ancestor) = current else {
                    return false;
                };
                current = self.nodes[ancestor].parent;
                if self.matches_simple(ancestor, part) {
                    break;
                }
            }
        }
        true
    }

    fn matches_simple(&self, index: usize, selector: &SimpleSelector) -> bool {
        let node = &self.nodes[index];
        match selector {
            SimpleSelector::Tag(tag) => node.tag == *tag,
            SimpleSelector::Id(id) => node.id_attr.as_deref() == Some(id.as_str()),
            SimpleSelector::Class(class) => node.classes.iter().any(|c| c == class),
        }
    }

    fn record(&self, id: u64, phase: InputPhase) {
        self.events.lock().expect("event log poisoned").push((id, phase));
    }
}

#[async_trait]
impl TranscriptSurface for DomSnapshotSurface {
    async fn query(&self, selector: &str) -> Result<Vec<UiNode>, AcquisitionError> {
        Ok(self
            .matching_indices(selector, None)
            .into_iter()
            .map(|i| self.to_ui_node(i))
            .collect())
    }

    async fn query_within(
        &self,
        node: &UiNode,
        selector: &str,
    ) -> Result<Vec<UiNode>, AcquisitionError> {
        Ok(self
            .matching_indices(selector, Some(node.id as usize))
            .into_iter()
            .map(|i| self.to_ui_node(i))
            .collect())
    }

    async fn find_by_text(&self, needle: &str) -> Result<Vec<UiNode>, AcquisitionError> {
        let needle = needle.to_lowercase();
        Ok((0..self.nodes.len())
            .filter(|&i| {
                self.nodes[i].child_elements == 0
                    && self.nodes[i].text.to_lowercase().contains(&needle)
            })
            .map(|i| self.to_ui_node(i))
            .collect())
    }

    async fn parent(&self, node: &UiNode) -> Result<Option<UiNode>, AcquisitionError> {
        Ok(self.nodes[node.id as usize]
            .parent
            .map(|parent| self.to_ui_node(parent)))
    }

    async fn actionable_ancestor(
        &self,
        node: &UiNode,
    ) -> Result<Option<UiNode>, AcquisitionError> {
        let mut current = Some(node.id as usize);
        while let Some(index) = current {
            let candidate = self.to_ui_node(index);
            if candidate.is_button() || candidate.tag == "a" {
                return Ok(Some(candidate));
            }
            current = self.nodes[index].parent;
        }
        Ok(None)
    }

    async fn click(&self, node: &UiNode) -> Result<(), AcquisitionError> {
        self.record(node.id, InputPhase::Press);
        self.record(node.id, InputPhase::Release);
        self.record(node.id, InputPhase::Activate);
        Ok(())
    }

    async fn click_elsewhere(&self) -> Result<(), AcquisitionError> {
        self.record(ELSEWHERE_NODE_ID, InputPhase::Activate);
        Ok(())
    }
}

/// Minimal selector grammar: comma-separated alternatives of
/// space-separated simple selectors (tag, `#id`, `.class`)
#[derive(Debug, Clone, PartialEq)]
enum SimpleSelector {
    Tag(String),
    Id(String),
    Class(String),
}

fn parse_selector(selector: &str) -> Vec<Vec<SimpleSelector>> {
    selector
        .split(',')
        .map(|alternative| {
            alternative
                .split_whitespace()
                .map(|part| {
                    if let Some(id) = part.strip_prefix('#') {
                        SimpleSelector::Id(id.to_string())
                    } else if let Some(class) = part.strip_prefix('.') {
                        SimpleSelector::Class(class.to_string())
                    } else {
                        SimpleSelector::Tag(part.to_lowercase())
                    }
                })
                .collect()
        })
        .filter(|compound: &Vec<SimpleSelector>| !compound.is_empty())
        .collect()
}

/// True when the element's own markup hides it
fn locally_hidden(element: &ElementRef) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    if value.attr("aria-hidden") == Some("true") {
        return true;
    }
    if let Some(style) = value.attr("style") {
        let style: String = style.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return true;
        }
    }
    false
}

fn collect_elements(
    element: ElementRef,
    parent: Option<usize>,
    parent_visible: bool,
    nodes: &mut Vec<SnapshotNode>,
) {
    let value = element.value();
    let visible = parent_visible && !locally_hidden(&element);

    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let role = value
        .attr("role")
        .map(|r| r.to_string())
        .or_else(|| match value.name() {
            "button" => Some("button".to_string()),
            _ => None,
        });

    let index = nodes.len();
    nodes.push(SnapshotNode {
        tag: value.name().to_lowercase(),
        id_attr: value.attr("id").map(|s| s.to_string()),
        classes: value.classes().map(|c| c.to_string()).collect(),
        role,
        text,
        visible,
        parent,
        child_elements: 0,
    });

    let mut child_elements = 0;
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            child_elements += 1;
            collect_elements(child_element, Some(index), visible, nodes);
        }
    }
    nodes[index].child_elements = child_elements;
}
