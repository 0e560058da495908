#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

extern crate alloc;

mod error;
pub use error::HeapError;

mod utils;
pub use utils::{NodeArena, NodeId, helper};

mod heap;
pub use heap::{Heap, HeapKind};

mod median_tracker;
pub use median_tracker::{MedianTracker, median_of};
