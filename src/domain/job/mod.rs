//! Job domain - upstream job postings cleaned for the trial flavour

mod entity;
mod source;

pub use entity::{Job, JobItemError, strip_tags};
pub use source::{JobSource, ListingBatch, TraceHeaders};

#[cfg(test)]
pub use source::mock;
