/*!
 * Scripted surface implementations for testing.
 *
 * `ScriptedSurface` simulates a host UI at whatever stage of readiness a
 * test needs:
 * - `ScriptedSurface::with_panel_open(..)` - panel already visible
 * - `ScriptedSurface::closed(..)` - panel opens after the control is clicked
 * - `ScriptedSurface::without_transcript_control()` - fatal acquisition path
 * - `ScriptedSurface::never_rendering()` - render-timeout path
 *
 * Every simulated interaction is recorded so tests can assert on the full
 * press/release/activate event sequences the machine dispatches.
 */

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::errors::AcquisitionError;

use super::machine;
use super::surface::{InputPhase, TranscriptSurface, UiNode};

/// Node id of the scripted expand control
pub const EXPAND_ID: u64 = 1;
/// Node id of the scripted "Show transcript" control
pub const TRANSCRIPT_BUTTON_ID: u64 = 2;
/// Node id of the scripted language-menu control
pub const LANGUAGE_MENU_ID: u64 = 3;
/// First node id of scripted menu items
pub const MENU_ITEM_BASE_ID: u64 = 100;
/// First node id of scripted segment renderer nodes
pub const SEGMENT_BASE_ID: u64 = 1000;
const LABEL_BASE_ID: u64 = 2000;
const TEXT_BASE_ID: u64 = 3000;
const WRAPPER_BASE_ID: u64 = 4000;

/// One scripted rendered segment: optional clock label plus text
#[derive(Debug, Clone)]
pub struct ScriptedSegment {
    pub timestamp_label: Option<String>,
    pub text: String,
}

impl ScriptedSegment {
    pub fn new(timestamp_label: Option<&str>, text: &str) -> Self {
        ScriptedSegment {
            timestamp_label: timestamp_label.map(|s| s.to_string()),
            text: text.to_string(),
        }
    }
}

/// Scripted [`TranscriptSurface`] for deterministic state-machine tests
#[derive(Debug)]
pub struct ScriptedSurface {
    segments: Vec<ScriptedSegment>,
    expand_visible: bool,
    has_transcript_control: bool,
    menu_items: Vec<String>,
    /// Serve segments through the raw text-leaf selector instead of the
    /// primary renderer selector (exercises the cascade fallback)
    text_leaves_only: bool,
    /// Number of primary-selector queries to answer empty before the
    /// segments "render"
    reveal_after_polls: usize,

    panel_open: AtomicBool,
    menu_open: AtomicBool,
    segment_polls: AtomicUsize,
    events: Mutex<Vec<(u64, InputPhase)>>,
    selected_language: Mutex<Option<String>>,
}

impl ScriptedSurface {
    fn base(segments: Vec<ScriptedSegment>) -> Self {
        ScriptedSurface {
            segments,
            expand_visible: true,
            has_transcript_control: true,
            menu_items: Vec::new(),
            text_leaves_only: false,
            reveal_after_polls: 0,
            panel_open: AtomicBool::new(false),
            menu_open: AtomicBool::new(false),
            segment_polls: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
            selected_language: Mutex::new(None),
        }
    }

    /// Panel already visible; machine should skip straight to polling
    pub fn with_panel_open(segments: Vec<ScriptedSegment>) -> Self {
        let surface = Self::base(segments);
        surface.panel_open.store(true, Ordering::SeqCst);
        surface
    }

    /// Panel closed until the transcript control is clicked
    pub fn closed(segments: Vec<ScriptedSegment>) -> Self {
        Self::base(segments)
    }

    /// No "Show transcript" control anywhere - the fatal path
    pub fn without_transcript_control() -> Self {
        let mut surface = Self::base(Vec::new());
        surface.has_transcript_control = false;
        surface
    }

    /// Panel opens but segment nodes never render
    pub fn never_rendering() -> Self {
        let mut surface = Self::base(Vec::new());
        surface.reveal_after_polls = usize::MAX;
        surface
    }

    /// Add a language menu with the given item labels
    pub fn with_language_menu(mut self, items: &[&str]) -> Self {
        self.menu_items = items.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Answer the first `polls` primary-selector queries empty
    pub fn with_reveal_after_polls(mut self, polls: usize) -> Self {
        self.reveal_after_polls = polls;
        self
    }

    /// Serve segments only through the raw text-leaf selector
    pub fn with_text_leaves_only(mut self) -> Self {
        self.text_leaves_only = true;
        self
    }

    /// The recorded input events, in dispatch order
    pub fn input_log(&self) -> Vec<(u64, InputPhase)> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// The menu item text clicked during language switching, if any
    pub fn selected_language(&self) -> Option<String> {
        self.selected_language
            .lock()
            .expect("selection poisoned")
            .clone()
    }

    /// True when the node received a full press/release/activate sequence
    pub fn was_clicked(&self, id: u64) -> bool {
        let events = self.input_log();
        events.contains(&(id, InputPhase::Press))
            && events.contains(&(id, InputPhase::Release))
            && events.contains(&(id, InputPhase::Activate))
    }

    fn segments_rendered(&self) -> bool {
        if !self.panel_open.load(Ordering::SeqCst) || self.segments.is_empty() {
            return false;
        }
        self.segment_polls.load(Ordering::SeqCst) > self.reveal_after_polls
    }

    fn segment_nodes(&self) -> Vec<UiNode> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, _)| UiNode {
                id: SEGMENT_BASE_ID + i as u64,
                tag: "ytd-transcript-segment-renderer".to_string(),
                role: None,
                text: self.segments[i].text.clone(),
                visible: true,
                occluded_by: None,
            })
            .collect()
    }

    fn text_leaf_nodes(&self) -> Vec<UiNode> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| UiNode {
                id: TEXT_BASE_ID + i as u64,
                tag: "div".to_string(),
                role: None,
                text: segment.text.clone(),
                visible: true,
                occluded_by: None,
            })
            .collect()
    }

    fn label_node(&self, index: usize) -> Option<UiNode> {
        self.segments[index]
            .timestamp_label
            .as_ref()
            .map(|label| UiNode {
                id: LABEL_BASE_ID + index as u64,
                tag: "div".to_string(),
                role: None,
                text: label.clone(),
                visible: true,
                occluded_by: None,
            })
    }

    fn record(&self, id: u64, phase: InputPhase) {
        self.events.lock().expect("event log poisoned").push((id, phase));
    }
}

#[async_trait]
impl TranscriptSurface for ScriptedSurface {
    async fn query(&self, selector: &str) -> Result<Vec<UiNode>, AcquisitionError> {
        match selector {
            machine::SEGMENT_RENDERER_SELECTOR => {
                self.segment_polls.fetch_add(1, Ordering::SeqCst);
                if self.segments_rendered() && !self.text_leaves_only {
                    Ok(self.segment_nodes())
                } else {
                    Ok(Vec::new())
                }
            }
            machine::SEGMENT_CONTAINER_SELECTOR => Ok(Vec::new()),
            machine::SEGMENT_TEXT_SELECTOR => {
                if self.segments_rendered() && self.text_leaves_only {
                    Ok(self.text_leaf_nodes())
                } else {
                    Ok(Vec::new())
                }
            }
            machine::EXPAND_SELECTOR => Ok(vec![UiNode {
                id: EXPAND_ID,
                tag: "tp-yt-paper-button".to_string(),
                role: Some("button".to_string()),
                text: "...more".to_string(),
                visible: self.expand_visible,
                occluded_by: None,
            }]),
            machine::MENU_ITEM_SELECTOR => {
                if self.menu_open.load(Ordering::SeqCst) {
                    Ok(self
                        .menu_items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| UiNode {
                            id: MENU_ITEM_BASE_ID + i as u64,
                            tag: "tp-yt-paper-item".to_string(),
                            role: Some("option".to_string()),
                            text: item.clone(),
                            visible: true,
                            occluded_by: None,
                        })
                        .collect())
                } else {
                    Ok(Vec::new())
                }
            }
            _ if machine::LANGUAGE_MENU_SELECTORS.contains(&selector) => {
                if self.menu_items.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![UiNode {
                        id: LANGUAGE_MENU_ID,
                        tag: "tp-yt-paper-button".to_string(),
                        role: Some("button".to_string()),
                        text: "English (auto-generated)".to_string(),
                        visible: true,
                        occluded_by: None,
                    }])
                }
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn query_within(
        &self,
        node: &UiNode,
        selector: &str,
    ) -> Result<Vec<UiNode>, AcquisitionError> {
        let index = if node.id >= WRAPPER_BASE_ID {
            (node.id - WRAPPER_BASE_ID) as usize
        } else if node.id >= SEGMENT_BASE_ID && node.id < LABEL_BASE_ID {
            (node.id - SEGMENT_BASE_ID) as usize
        } else {
            return Ok(Vec::new());
        };

        match selector {
            machine::TIMESTAMP_LABEL_SELECTOR => Ok(self.label_node(index).into_iter().collect()),
            machine::SEGMENT_TEXT_SELECTOR => Ok(vec![UiNode {
                id: TEXT_BASE_ID + index as u64,
                tag: "div".to_string(),
                role: None,
                text: self.segments[index].text.clone(),
                visible: true,
                occluded_by: None,
            }]),
            _ => Ok(Vec::new()),
        }
    }

    async fn find_by_text(&self, needle: &str) -> Result<Vec<UiNode>, AcquisitionError> {
        if !self.has_transcript_control {
            return Ok(Vec::new());
        }
        if !"show transcript".contains(&needle.to_lowercase()) {
            return Ok(Vec::new());
        }

        // A hidden duplicate first, so visibility filtering is exercised
        Ok(vec![
            UiNode {
                id: TRANSCRIPT_BUTTON_ID + 500,
                tag: "span".to_string(),
                role: None,
                text: "Show transcript".to_string(),
                visible: false,
                occluded_by: None,
            },
            UiNode {
                id: TRANSCRIPT_BUTTON_ID,
                tag: "button".to_string(),
                role: Some("button".to_string()),
                text: "Show transcript".to_string(),
                visible: true,
                occluded_by: None,
            },
        ])
    }

    async fn parent(&self, node: &UiNode) -> Result<Option<UiNode>, AcquisitionError> {
        if node.id >= TEXT_BASE_ID && node.id < WRAPPER_BASE_ID {
            let index = node.id - TEXT_BASE_ID;
            return Ok(Some(UiNode {
                id: WRAPPER_BASE_ID + index,
                tag: "div".to_string(),
                role: None,
                text: String::new(),
                visible: true,
                occluded_by: None,
            }));
        }
        Ok(None)
    }

    async fn actionable_ancestor(
        &self,
        node: &UiNode,
    ) -> Result<Option<UiNode>, AcquisitionError> {
        if node.is_button() {
            Ok(Some(node.clone()))
        } else {
            Ok(None)
        }
    }

    async fn click(&self, node: &UiNode) -> Result<(), AcquisitionError> {
        self.record(node.id, InputPhase::Press);
        self.record(node.id, InputPhase::Release);
        self.record(node.id, InputPhase::Activate);

        if node.id == TRANSCRIPT_BUTTON_ID {
            self.panel_open.store(true, Ordering::SeqCst);
        } else if node.id == LANGUAGE_MENU_ID {
            self.menu_open.store(true, Ordering::SeqCst);
        } else if node.id >= MENU_ITEM_BASE_ID && node.id < SEGMENT_BASE_ID {
            *self.selected_language.lock().expect("selection poisoned") = Some(node.text.clone());
            self.menu_open.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn click_elsewhere(&self) -> Result<(), AcquisitionError> {
        self.record(u64::MAX, InputPhase::Activate);
        self.menu_open.store(false, Ordering::SeqCst);
        Ok(())
    }
}
