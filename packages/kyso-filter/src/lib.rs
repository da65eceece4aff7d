pub mod builder;
pub mod query;
pub mod token;

mod error;

pub use builder::{Expect, FilterBuilder, SuggestionCatalog};
pub use error::{Error, Result};
pub use query::{Condition, SortOrder, TaskQuery};
pub use token::{ChannelRef, FilterField, FilterOperator, FilterToken, FilterValue, UserRef, ValueKind};
