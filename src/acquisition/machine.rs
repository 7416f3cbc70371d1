use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

use crate::app_config::AcquisitionConfig;
use crate::errors::AcquisitionError;
use crate::language_utils;
use crate::transcript::RenderedSegment;

use super::surface::{ProgressSink, TranscriptSurface, UiNode};

// @module: Acquisition state machine for live-rendered transcripts

/// Primary selector for rendered segment nodes
pub(crate) const SEGMENT_RENDERER_SELECTOR: &str = "ytd-transcript-segment-renderer";

/// Fallback: the segment renderers inside their containing list
pub(crate) const SEGMENT_CONTAINER_SELECTOR: &str = "#segments-container ytd-transcript-segment-renderer";

/// Last resort: the raw text leaves themselves
pub(crate) const SEGMENT_TEXT_SELECTOR: &str = ".segment-text";

/// Render-poll cascade, tried in order on every poll; first non-empty wins
pub(crate) const SEGMENT_SELECTOR_CASCADE: [&str; 3] = [
    SEGMENT_RENDERER_SELECTOR,
    SEGMENT_CONTAINER_SELECTOR,
    SEGMENT_TEXT_SELECTOR,
];

/// Timestamp label inside (or next to) a segment node
pub(crate) const TIMESTAMP_LABEL_SELECTOR: &str = ".segment-timestamp";

/// Description "expand" control that reveals the transcript button
pub(crate) const EXPAND_SELECTOR: &str = "#expand";

/// Text of the control that opens the transcript panel
pub(crate) const TRANSCRIPT_CONTROL_TEXT: &str = "Show transcript";

/// Candidate selectors for the language-selection control near the panel
pub(crate) const LANGUAGE_MENU_SELECTORS: [&str; 2] =
    ["ytd-transcript-renderer .dropdown-trigger", "#sort-filter-menu"];

/// Menu item nodes once the language menu is open
pub(crate) const MENU_ITEM_SELECTOR: &str = "ytd-menu-service-item-renderer, tp-yt-paper-item";

/// States of the acquisition run.
///
/// `Failed` is terminal and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Idle,
    PanelOpening,
    LanguageSwitching,
    AwaitingRender,
    Ready,
    Failed,
}

impl AcquisitionState {
    fn progress_message(&self) -> &'static str {
        match self {
            AcquisitionState::Idle => "Starting transcript acquisition...",
            AcquisitionState::PanelOpening => "Opening transcript panel...",
            AcquisitionState::LanguageSwitching => "Checking transcript language...",
            AcquisitionState::AwaitingRender => "Waiting for text segments...",
            AcquisitionState::Ready => "Transcript segments ready.",
            AcquisitionState::Failed => "Transcript acquisition failed.",
        }
    }
}

/// Drives a [`TranscriptSurface`] through panel-opening, language selection
/// and render-completion to make segment nodes extractable.
///
/// The machine tolerates missing elements and layout variance: a missing
/// language menu is informational, an occluded control is still clicked.
/// Only a missing transcript control, a render timeout, or a surface
/// failure are fatal.
pub struct TranscriptAcquirer<'a, S: TranscriptSurface> {
    surface: &'a S,
    config: AcquisitionConfig,
    progress: &'a dyn ProgressSink,
    state: AcquisitionState,
}

impl<'a, S: TranscriptSurface> TranscriptAcquirer<'a, S> {
    pub fn new(surface: &'a S, config: AcquisitionConfig, progress: &'a dyn ProgressSink) -> Self {
        TranscriptAcquirer {
            surface,
            config,
            progress,
            state: AcquisitionState::Idle,
        }
    }

    /// Current machine state - inspectable after `run` returns
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    fn transition(&mut self, next: AcquisitionState) {
        debug!("Acquisition state: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.progress.notify(next.progress_message());
    }

    /// Run the machine to completion and return the rendered segments.
    ///
    /// `target_language` is the preferred transcript language code; if the
    /// panel offers no language menu, or the language is not listed,
    /// whatever language is already active is used (not an error).
    pub async fn run(
        &mut self,
        target_language: &str,
    ) -> Result<Vec<RenderedSegment>, AcquisitionError> {
        let result = self.drive(target_language).await;
        if result.is_err() {
            self.transition(AcquisitionState::Failed);
        }
        result
    }

    async fn drive(
        &mut self,
        target_language: &str,
    ) -> Result<Vec<RenderedSegment>, AcquisitionError> {
        self.progress.notify(AcquisitionState::Idle.progress_message());

        // A panel that is already visible skips straight to render polling
        if self.panel_visible().await? {
            debug!("Transcript panel already visible");
            self.transition(AcquisitionState::AwaitingRender);
        } else {
            self.transition(AcquisitionState::PanelOpening);
            self.open_panel().await?;

            self.transition(AcquisitionState::LanguageSwitching);
            self.switch_language(target_language).await?;

            self.transition(AcquisitionState::AwaitingRender);
        }

        let (nodes, winning_selector) = self.await_render().await?;
        self.transition(AcquisitionState::Ready);

        self.collect_segments(&nodes, winning_selector).await
    }

    async fn panel_visible(&self) -> Result<bool, AcquisitionError> {
        let panel = self.surface.query(SEGMENT_RENDERER_SELECTOR).await?;
        Ok(panel.iter().any(|node| node.visible))
    }

    /// Reveal the transcript panel: expand the description if an expand
    /// control is visible, then find and click the transcript control.
    async fn open_panel(&mut self) -> Result<(), AcquisitionError> {
        let expands = self.surface.query(EXPAND_SELECTOR).await?;
        match expands.iter().find(|node| node.visible) {
            Some(expand) => {
                debug!("Clicking expand control ({})", expand.tag);
                self.click_checked(expand).await?;
                sleep(Duration::from_millis(self.config.expand_settle_ms)).await;
            }
            // The description may simply already be expanded
            None => debug!("No visible expand control found"),
        }

        let control = self.find_transcript_control().await?;
        let control = control.ok_or(AcquisitionError::TranscriptControlNotFound)?;

        debug!("Clicking transcript control ({})", control.tag);
        self.click_checked(&control).await?;
        sleep(Duration::from_millis(self.config.panel_settle_ms)).await;

        Ok(())
    }

    /// Full-subtree text search for the transcript control. Prefers a node
    /// whose native role is a button, else its closest actionable ancestor.
    async fn find_transcript_control(&self) -> Result<Option<UiNode>, AcquisitionError> {
        let candidates = self.surface.find_by_text(TRANSCRIPT_CONTROL_TEXT).await?;

        for (i, node) in candidates.iter().enumerate() {
            debug!(
                "Transcript control candidate [{}]: {} visible={}",
                i, node.tag, node.visible
            );
            if !node.visible {
                continue;
            }

            if node.is_button() {
                return Ok(Some(node.clone()));
            }
            if let Some(ancestor) = self.surface.actionable_ancestor(node).await? {
                return Ok(Some(ancestor));
            }
        }

        Ok(None)
    }

    /// Try to switch the panel to the target language.
    ///
    /// Every miss along the way is expected, not an error: most content has
    /// a single language and no menu at all.
    async fn switch_language(&mut self, target_language: &str) -> Result<(), AcquisitionError> {
        let mut menu_control = None;
        for selector in LANGUAGE_MENU_SELECTORS {
            let nodes = self.surface.query(selector).await?;
            if let Some(node) = nodes.into_iter().find(|n| n.visible) {
                menu_control = Some(node);
                break;
            }
        }

        let Some(menu_control) = menu_control else {
            info!("No language menu found, using the current transcript language");
            return Ok(());
        };

        self.click_checked(&menu_control).await?;
        sleep(Duration::from_millis(self.config.menu_settle_ms)).await;

        let items = self.surface.query(MENU_ITEM_SELECTOR).await?;
        debug!("Language menu has {} entries", items.len());

        match self.match_language_item(&items, target_language) {
            Some(item) => {
                info!("Switching transcript language to '{}'", item.text.trim());
                self.click_checked(&item).await?;
                // The language switch triggers a re-render
                sleep(Duration::from_millis(self.config.language_settle_ms)).await;
            }
            None => {
                info!(
                    "Language '{}' not in menu ({} entries), keeping current language",
                    target_language,
                    items.len()
                );
                // Leave no menu dangling over the panel
                self.surface.click_elsewhere().await?;
            }
        }

        Ok(())
    }

    /// Case-insensitive substring match against the language's English name
    /// and its native-script name ("Portuguese" / "Português")
    fn match_language_item(&self, items: &[UiNode], target_language: &str) -> Option<UiNode> {
        let mut needles = Vec::new();
        if let Ok(name) = language_utils::get_language_name(target_language) {
            needles.push(name.to_lowercase());
        }
        if let Ok(native) = language_utils::get_native_language_name(target_language) {
            needles.push(native.to_lowercase());
        }
        if needles.is_empty() {
            needles.push(target_language.to_lowercase());
        }

        items
            .iter()
            .find(|item| {
                let text = item.text.to_lowercase();
                needles.iter().any(|needle| text.contains(needle.as_str()))
            })
            .cloned()
    }

    /// Poll for segment-bearing nodes with the selector cascade until they
    /// appear or the polling budget runs out.
    async fn await_render(&mut self) -> Result<(Vec<UiNode>, &'static str), AcquisitionError> {
        for attempt in 0..self.config.max_polls {
            for selector in SEGMENT_SELECTOR_CASCADE {
                let nodes = self.surface.query(selector).await?;
                if !nodes.is_empty() {
                    debug!(
                        "Found {} segment nodes via '{}' on attempt {}",
                        nodes.len(),
                        selector,
                        attempt + 1
                    );
                    return Ok((nodes, selector));
                }
            }

            if (attempt + 1) % 5 == 0 {
                debug!("Still waiting for segments... attempt {}", attempt + 1);
            }
            sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
        }

        Err(AcquisitionError::RenderTimeout {
            waited_secs: self.config.max_polls as u64 * self.config.poll_interval_ms / 1000,
        })
    }

    /// Read timestamp and text labels out of the matched nodes.
    ///
    /// When the cascade bottomed out at raw text leaves, the timestamp
    /// label lives on a sibling and is reached through the parent.
    async fn collect_segments(
        &self,
        nodes: &[UiNode],
        winning_selector: &str,
    ) -> Result<Vec<RenderedSegment>, AcquisitionError> {
        let mut segments = Vec::with_capacity(nodes.len());

        for node in nodes {
            let (timestamp_label, text) = if winning_selector == SEGMENT_TEXT_SELECTOR {
                let label = match self.surface.parent(node).await? {
                    Some(parent) => self
                        .surface
                        .query_within(&parent, TIMESTAMP_LABEL_SELECTOR)
                        .await?
                        .into_iter()
                        .next()
                        .map(|n| n.text),
                    None => None,
                };
                (label, node.text.clone())
            } else {
                let label = self
                    .surface
                    .query_within(node, TIMESTAMP_LABEL_SELECTOR)
                    .await?
                    .into_iter()
                    .next()
                    .map(|n| n.text);
                let text = self
                    .surface
                    .query_within(node, SEGMENT_TEXT_SELECTOR)
                    .await?
                    .into_iter()
                    .next()
                    .map(|n| n.text)
                    .unwrap_or_else(|| node.text.clone());
                (label, text)
            };

            segments.push(RenderedSegment {
                timestamp_label,
                text,
            });
        }

        Ok(segments)
    }

    /// Click with a visibility/occlusion check first. The check is purely
    /// diagnostic: an occluded-but-present element is still clicked.
    async fn click_checked(&self, node: &UiNode) -> Result<(), AcquisitionError> {
        if !node.visible {
            warn!("Clicking element with no measurable area: {}", node.tag);
        }
        if let Some(covering) = &node.occluded_by {
            warn!("Element {} may be covered by {}", node.tag, covering);
        }
        self.surface.click(node).await
    }
}
