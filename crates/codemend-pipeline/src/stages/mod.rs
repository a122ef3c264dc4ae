//! The six stage variants
//!
//! Fixed execution order: sync, scan, analyze, fix, apply, validate.

mod analyze;
mod apply;
mod fix;
mod scan;
mod sync;
mod validate;

pub use analyze::AnalyzeStage;
pub use apply::ApplyStage;
pub use fix::FixStage;
pub use scan::ScanStage;
pub use sync::SyncStage;
pub use validate::ValidateStage;
