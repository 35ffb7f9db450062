mod common;

pub use common::{DeletionStatus, ListResponse, Usage};
