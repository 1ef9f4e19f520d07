//! Dependency injection infrastructure.
//!
//! Values are extracted from the application [`Context`](crate::context::Context)
//! through the `FromRef` trait. Each injectable type implements
//! `FromRef<Context>` next to its definition.
//!
//! # Example
//!
//! ```ignore
//! use crate::di::FromRef;
//!
//! impl FromRef<Context> for ContractClient {
//!     fn from_ref(ctx: &Context) -> Self {
//!         ContractClient::new(ctx.querier.clone())
//!     }
//! }
//!
//! // Usage
//! let client = ContractClient::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Types that implement `FromRef<T>` can be extracted from `&T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}
