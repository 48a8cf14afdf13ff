//! Client-credentials token lifecycle: redacted secrets, the cached token, and its manager.

pub mod manager;
pub mod secret;
pub mod token;

pub use manager::*;
pub use secret::*;
pub use token::*;
