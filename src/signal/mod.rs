//! Fine-grained reactive primitives.
//!
//! - [`Signal`] - mutable cell with synchronous listener notification
//! - [`Computed`] - read-only cell derived via a pure mapping function
//! - [`Completion`] - pending/done cell for work that finishes once
//! - [`CancelToken`] / [`ListenOptions`] - listener lifetime control
//!
//! Propagation is depth-first and fully synchronous; see the [`core`] module
//! docs for the write path and re-entrancy rules.

pub mod completion;
pub mod computed;
pub mod core;
pub mod listen;
mod worklist;

pub use completion::{completion_signal, Completion, CompletionResolver};
pub use computed::Computed;
pub use core::{signal, Signal};
pub use listen::{CancelToken, Change, ListenOptions};
