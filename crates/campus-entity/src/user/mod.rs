//! User identity as supplied by the identity provider.

pub mod handle;
pub mod role;

pub use handle::{DisplayAttrs, UserHandle};
pub use role::UserRole;
