//! Request extractors.

pub mod form;
pub mod json;
pub mod query;
