/*!
 * Transcript acquisition from a live-rendered host UI.
 *
 * When no structured caption feed is available, caption data has to be
 * coaxed out of an external, eventually-consistent interface: open the
 * transcript panel, optionally switch language, and wait for segment nodes
 * to render. This module contains:
 *
 * - `surface`: the `TranscriptSurface` trait - the pollable capability the
 *   state machine drives (find control by selector/text, click, inspect),
 *   plus the `ProgressSink` side channel for human-readable progress
 * - `machine`: the acquisition state machine itself
 * - `dom_snapshot`: a surface backed by a saved panel HTML document
 * - `mock`: a scripted surface for deterministic state-machine tests
 *
 * The stitching and extraction stages downstream have no UI dependency;
 * everything host-specific lives behind the surface trait.
 */

pub mod dom_snapshot;
pub mod machine;
pub mod mock;
pub mod surface;

pub use dom_snapshot::DomSnapshotSurface;
pub use machine::{AcquisitionState, TranscriptAcquirer};
pub use surface::{InputPhase, LogProgress, ProgressSink, TranscriptSurface, UiNode};
