//! Subject vocabularies
//!
//! Provides the data model shared by every backend in an ensemble:
//! - Concepts (URI plus display label)
//! - Ordered, indexable vocabularies used to build fixed-width score vectors
//! - Ground-truth subject sets attached to training documents

mod index;
mod set;

pub use index::{Subject, SubjectIndex};
pub use set::SubjectSet;
