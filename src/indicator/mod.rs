//! Progress feedback for long-running steps
//!
//! The installer download and the API round trips report progress through
//! the [`ProgressIndicator`] trait. [`ProgressFactory`] picks the renderer:
//! an animated indicatif bar on a terminal, plain status lines elsewhere, or
//! nothing at all with `--no-progress`. All renderers write to stderr so the
//! JSON on stdout stays machine-readable.

pub mod factory;
pub mod indicatif;
pub mod silent;
pub mod simple;
pub mod types;

pub use factory::{ProgressFactory, ProgressRendererKind};
pub use self::indicatif::IndicatifProgress;
pub use silent::SilentProgress;
pub use simple::SimpleProgress;
pub use types::{ProgressConfig, ProgressStyle};

/// Core trait for progress indicator implementations
pub trait ProgressIndicator: Send + Sync {
    /// Start a new progress operation
    ///
    /// A determinate bar is shown when `config.total` is set, a spinner
    /// otherwise.
    fn start(&mut self, config: ProgressConfig);

    /// Update progress; `total` overrides the initial total when given
    fn update(&mut self, current: u64, total: Option<u64>);

    /// Complete the operation successfully (defaults to "Complete")
    fn complete(&mut self, message: Option<String>);

    /// Mark the operation as failed
    fn error(&mut self, message: String);
}
