//! # rxlite: a small, single-threaded Reactive Extensions library
//!
//! An observable is a lazily started, cancelable sequence of values pushed
//! to an observer. Operators are methods of [`ObservableExt`] and compose
//! observables without running them; nothing happens until `subscribe`.
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let mut out = vec![];
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| out.push(v));
//! assert_eq!(out, vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): `interval` and `timer` sources, driven by
//!   `futures-time`.
//!
//! [`ObservableExt`]: observable::ObservableExt
#[cfg(test)]
#[macro_use]
extern crate bencher;

pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod subscriber;
pub mod subscription;
pub mod type_hint;

pub use prelude::*;
