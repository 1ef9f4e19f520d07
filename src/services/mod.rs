//! Business logic services.
//!
//! Services orchestrate contract queries and handle domain rules. They are
//! resolved from the [`Context`](crate::context::Context) through `FromRef`.

mod governance;

pub use governance::{code_address, decode_program, GovernanceResolver, ResolveError};
