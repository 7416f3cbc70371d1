/*!
 * Tests for the saved-panel DOM snapshot surface
 */

use capdeck::acquisition::dom_snapshot::{DomSnapshotSurface, ELSEWHERE_NODE_ID};
use capdeck::acquisition::{InputPhase, TranscriptSurface};

const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div id="wrap" class="outer">
    <button id="open" class="primary">Show transcript</button>
    <span class="note" style="display: none">hidden note</span>
  </div>
  <div aria-hidden="true">
    <span id="inside">covered text</span>
  </div>
  <a id="link"><span id="label">Open panel</span></a>
</body>
</html>"#;

/// Test querying by tag name
#[tokio::test]
async fn test_query_withTagSelector_shouldMatchElements() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let buttons = surface.query("button").await.unwrap();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].text, "Show transcript");
    assert!(buttons[0].is_button());
}

/// Test querying by id and class selectors
#[tokio::test]
async fn test_query_withIdAndClassSelectors_shouldMatchElements() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let by_id = surface.query("#wrap").await.unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].tag, "div");

    let by_class = surface.query(".primary").await.unwrap();
    assert_eq!(by_class.len(), 1);
    assert_eq!(by_class[0].tag, "button");
}

/// Test the descendant combinator
#[tokio::test]
async fn test_query_withDescendantSelector_shouldRequireAncestorChain() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let nested = surface.query("#wrap .primary").await.unwrap();
    assert_eq!(nested.len(), 1);

    // #link is not inside #wrap
    let missing = surface.query("#wrap #link").await.unwrap();
    assert!(missing.is_empty());
}

/// Test comma-separated selector alternatives
#[tokio::test]
async fn test_query_withAlternatives_shouldUnionMatches() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let nodes = surface.query("button, a").await.unwrap();
    assert_eq!(nodes.len(), 2);
}

/// Test that markup-hidden elements report as not visible
#[tokio::test]
async fn test_query_withHiddenElement_shouldReportNotVisible() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let note = surface.query(".note").await.unwrap();
    assert_eq!(note.len(), 1);
    assert!(!note[0].visible);
}

/// Test that hiddenness is inherited from ancestors
#[tokio::test]
async fn test_query_withAriaHiddenAncestor_shouldHideDescendants() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let inside = surface.query("#inside").await.unwrap();
    assert_eq!(inside.len(), 1);
    assert!(!inside[0].visible);
}

/// Test subtree-scoped queries
#[tokio::test]
async fn test_query_within_withSubtreeRoot_shouldScopeMatches() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let wrap = surface.query("#wrap").await.unwrap().remove(0);
    let spans = surface.query_within(&wrap, "span").await.unwrap();

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "hidden note");
}

/// Test text search over leaf nodes
#[tokio::test]
async fn test_find_by_text_withCaseInsensitiveNeedle_shouldMatchLeaves() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let hits = surface.find_by_text("show TRANSCRIPT").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].tag, "button");

    let none = surface.find_by_text("no such text").await.unwrap();
    assert!(none.is_empty());
}

/// Test climbing to the closest actionable ancestor
#[tokio::test]
async fn test_actionable_ancestor_withNestedSpan_shouldFindLink() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let label = surface.query("#label").await.unwrap().remove(0);
    let ancestor = surface.actionable_ancestor(&label).await.unwrap();

    assert_eq!(ancestor.unwrap().tag, "a");
}

/// Test that a node with no actionable ancestor yields None
#[tokio::test]
async fn test_actionable_ancestor_withPlainChain_shouldReturnNone() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let note = surface.query(".note").await.unwrap().remove(0);
    let ancestor = surface.actionable_ancestor(&note).await.unwrap();

    assert!(ancestor.is_none());
}

/// Test that clicks record the full input-phase sequence
#[tokio::test]
async fn test_click_shouldRecordPressReleaseActivate() {
    let surface = DomSnapshotSurface::from_html(SAMPLE_PAGE);

    let button = surface.query("button").await.unwrap().remove(0);
    surface.click(&button).await.unwrap();
    surface.click_elsewhere().await.unwrap();

    let log = surface.input_log();
    assert_eq!(
        log,
        vec![
            (button.id, InputPhase::Press),
            (button.id, InputPhase::Release),
            (button.id, InputPhase::Activate),
            (ELSEWHERE_NODE_ID, InputPhase::Activate),
        ]
    );
}
