//! Shared-ownership pointers with a per-allocation reference count.
//!
//! [`SharedPtr`] wraps a single value and [`SharedArray`] a slice. Handles may
//! be null, and every accessor reports [`PointerError::NullDereference`]
//! instead of faulting.

mod control;

pub mod config;
pub mod demo;
pub mod error;
pub mod shared_array;
pub mod shared_ptr;

pub use config::{ConfigError, DemoConfig};
pub use error::PointerError;
pub use shared_array::SharedArray;
pub use shared_ptr::SharedPtr;
