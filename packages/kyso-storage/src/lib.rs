pub mod drafts;
pub mod local;

mod error;

pub use drafts::{DraftStore, ReportDraft};
pub use error::Error;
pub use local::LocalStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;
