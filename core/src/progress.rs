// vitrina/src/progress.rs

//! Progressive status reporting for mutating workflows.
//!
//! The repository announces which phase a workflow is in (uploading the
//! image, saving the document, ...); the admin session reports terminal
//! errors and always delivers a final `on_idle`, the hook a UI uses to
//! re-enable its submit control no matter how the workflow ended.

/// The phase a mutating workflow is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
  Uploading,
  Saving,
  Deleting,
  Exporting,
}

/// Receiver for workflow status. All methods default to no-ops so observers
/// implement only what they display.
pub trait ProgressObserver: Send + Sync {
  fn on_status(&self, _stage: ProgressStage) {}

  fn on_error(&self, _message: &str) {}

  /// Invoked exactly once per admin workflow, after success or failure.
  fn on_idle(&self) {}
}

/// Observer that displays nothing.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}
