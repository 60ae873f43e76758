//! Typed bindings for a handful of Conduit methods.
//!
//! Each binding is a marker type implementing [`Method`](crate::Method);
//! any other method can be called untyped through
//! [`Conn::call`](crate::Conn::call).

pub mod conduit;
pub mod differential;
pub mod file;
pub mod harbormaster;

pub use conduit::{Capabilities, ConduitQuery, GetCapabilities, PhidLookup};
pub use differential::{
    DifferentialGetCommitMessage, DifferentialGetCommitPaths, DifferentialQuery,
    DifferentialQueryDiffs,
};
pub use file::{FileDownload, FileSearch};
pub use harbormaster::HarbormasterBuildableSearch;
