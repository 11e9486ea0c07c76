//! Persistent multi-layer dataset output.

mod writer;

pub use writer::{DatasetWriter, PersistenceError};
