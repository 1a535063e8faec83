//! Embassy async tasks
//!
//! The USB device task lives in `crate::usb`; everything else happens in
//! the scope task, which owns the only sample history.

pub mod scope;

pub use scope::scope_task;
