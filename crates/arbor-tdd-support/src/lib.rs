//! Test helpers for arbor crates under the no-unwrap lint policy.

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod must;

pub use must::{must, must_err, must_some};
