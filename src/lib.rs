//! Generates a typed TypeScript fetch client from an OpenAPI 3.1 document.
//!
//! ```no_run
//! use typed_fetch_generator::{generate, OpenApi};
//!
//! let spec = OpenApi::from_path("petstore.yaml")?;
//! let client = generate(&spec)?;
//! println!("{client}");
//! # Ok::<(), typed_fetch_generator::Error>(())
//! ```
//!
//! The output declares one request, data and error type per operation, a
//! lookup table per HTTP method keyed by url literal, and a `Client`
//! interface with one generic function per method.

pub mod error;
mod generator;
pub mod naming;
pub mod operation;
pub mod resolve;
pub mod schema;
pub mod spec;

pub use error::{Error, Result};
pub use generator::{generate, generate_with, GenerateOptions};
pub use spec::{Method, OpenApi};
