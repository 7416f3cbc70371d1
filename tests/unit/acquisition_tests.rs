/*!
 * Tests for the transcript acquisition state machine
 */

use std::sync::Mutex;

use capdeck::acquisition::mock::{
    EXPAND_ID, LANGUAGE_MENU_ID, ScriptedSegment, ScriptedSurface, TRANSCRIPT_BUTTON_ID,
};
use capdeck::acquisition::{AcquisitionState, InputPhase, ProgressSink, TranscriptAcquirer};
use capdeck::app_config::AcquisitionConfig;
use capdeck::errors::AcquisitionError;

/// Progress sink that records every notification for later assertions
#[derive(Debug, Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

fn scripted_segments() -> Vec<ScriptedSegment> {
    vec![
        ScriptedSegment::new(Some("0:00"), "first segment text"),
        ScriptedSegment::new(Some("0:04"), "second segment text"),
    ]
}

/// Test the shortcut path when the panel is already visible
#[tokio::test]
async fn test_run_withPanelAlreadyOpen_shouldSkipClicksAndCollect() {
    let surface = ScriptedSurface::with_panel_open(scripted_segments());
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let segments = acquirer.run("pt").await.unwrap();

    assert_eq!(acquirer.state(), AcquisitionState::Ready);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].timestamp_label.as_deref(), Some("0:00"));
    assert_eq!(segments[0].text, "first segment text");
    assert_eq!(segments[1].timestamp_label.as_deref(), Some("0:04"));

    // Nothing was clicked: no panel opening, no language switching
    assert!(surface.input_log().is_empty());
}

/// Test the full open-panel path when the panel starts closed
#[tokio::test]
async fn test_run_withClosedPanel_shouldClickExpandAndTranscriptControl() {
    let surface = ScriptedSurface::closed(scripted_segments());
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let segments = acquirer.run("pt").await.unwrap();

    assert_eq!(acquirer.state(), AcquisitionState::Ready);
    assert_eq!(segments.len(), 2);
    assert!(surface.was_clicked(EXPAND_ID));
    assert!(surface.was_clicked(TRANSCRIPT_BUTTON_ID));

    // Progress notifications walk the state sequence
    let messages = sink.messages();
    assert!(messages.contains(&"Opening transcript panel...".to_string()));
    assert!(messages.last().unwrap().contains("ready"));
}

/// Test the fatal path when no transcript control exists
#[tokio::test]
async fn test_run_withoutTranscriptControl_shouldFailTerminally() {
    let surface = ScriptedSurface::without_transcript_control();
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let result = acquirer.run("pt").await;

    assert!(matches!(result, Err(AcquisitionError::TranscriptControlNotFound)));
    assert_eq!(acquirer.state(), AcquisitionState::Failed);
}

/// Test the render-timeout path when segments never appear
#[tokio::test]
async fn test_run_withSegmentsNeverRendering_shouldTimeOut() {
    let surface = ScriptedSurface::never_rendering();
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let result = acquirer.run("pt").await;

    assert!(matches!(result, Err(AcquisitionError::RenderTimeout { .. })));
    assert_eq!(acquirer.state(), AcquisitionState::Failed);
}

/// Test that segments appearing after a few polls are still collected
#[tokio::test]
async fn test_run_withDelayedRender_shouldKeepPolling() {
    let surface = ScriptedSurface::closed(scripted_segments()).with_reveal_after_polls(3);
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let segments = acquirer.run("pt").await.unwrap();

    assert_eq!(acquirer.state(), AcquisitionState::Ready);
    assert_eq!(segments.len(), 2);
}

/// Test language switching when the menu lists the target language
#[tokio::test]
async fn test_run_withLanguageMenu_shouldSelectTargetLanguage() {
    let surface = ScriptedSurface::closed(scripted_segments())
        .with_language_menu(&["English (auto-generated)", "Português", "Deutsch"]);
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    acquirer.run("pt").await.unwrap();

    assert!(surface.was_clicked(LANGUAGE_MENU_ID));
    assert_eq!(surface.selected_language().as_deref(), Some("Português"));
}

/// Test that matching also works against the English language name
#[tokio::test]
async fn test_run_withEnglishMenuLabels_shouldMatchEnglishName() {
    let surface = ScriptedSurface::closed(scripted_segments())
        .with_language_menu(&["English", "Portuguese (auto-translated)"]);
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    acquirer.run("pt").await.unwrap();

    assert_eq!(
        surface.selected_language().as_deref(),
        Some("Portuguese (auto-translated)")
    );
}

/// Test that a menu without the target language is dismissed, not fatal
#[tokio::test]
async fn test_run_withTargetNotInMenu_shouldDismissMenuAndContinue() {
    let surface = ScriptedSurface::closed(scripted_segments())
        .with_language_menu(&["English", "Deutsch"]);
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let segments = acquirer.run("pt").await.unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(surface.selected_language(), None);
    // The open menu was dismissed by clicking empty surface area
    assert!(surface.input_log().contains(&(u64::MAX, InputPhase::Activate)));
}

/// Test the selector-cascade fallback to raw text leaves
#[tokio::test]
async fn test_run_withTextLeavesOnly_shouldRecoverLabelsThroughParents() {
    let surface = ScriptedSurface::closed(scripted_segments()).with_text_leaves_only();
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let segments = acquirer.run("pt").await.unwrap();

    assert_eq!(segments.len(), 2);
    // Labels are reached through the leaf's parent wrapper
    assert_eq!(segments[0].timestamp_label.as_deref(), Some("0:00"));
    assert_eq!(segments[1].timestamp_label.as_deref(), Some("0:04"));
}

/// Test that a segment without a clock label yields a None label
#[tokio::test]
async fn test_run_withUnlabeledSegment_shouldReturnNoneLabel() {
    let segments = vec![
        ScriptedSegment::new(None, "no label on this one"),
        ScriptedSegment::new(Some("0:07"), "labeled"),
    ];
    let surface = ScriptedSurface::with_panel_open(segments);
    let sink = RecordingSink::default();
    let mut acquirer = TranscriptAcquirer::new(&surface, AcquisitionConfig::fast(), &sink);

    let collected = acquirer.run("pt").await.unwrap();

    assert_eq!(collected[0].timestamp_label, None);
    assert_eq!(collected[1].timestamp_label.as_deref(), Some("0:07"));
}
