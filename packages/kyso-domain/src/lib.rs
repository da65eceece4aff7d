pub mod comment;
pub mod common;
pub mod front_matter;
pub mod notebook;
pub mod onboarding;
pub mod report;

mod error;

pub use comment::{CommentAnchor, CommentAuthor, CommentStatus, InlineComment};
pub use common::{CommonData, Organization, Permission, Permissions, Team, User};
pub use error::{Error, Result};
pub use front_matter::FrontMatter;
pub use notebook::{Cell, CellKind, MimeBundle, MimeEntry, Notebook, Output, StreamName};
pub use onboarding::{OnboardingProgress, OnboardingStep};
pub use report::{ReportContext, ReportKind};
