//! Release bookkeeping and publication
//!
//! - **store**: per-project records and the release counter
//! - **spec**: spec template rendering and build stamps
//! - **publish**: packaging workspace layout and artifact publication

pub mod publish;
pub mod spec;
pub mod store;

pub use publish::PackagingWorkspace;
pub use store::{ProjectRecord, ReleaseStore};
