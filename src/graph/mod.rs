//! Asset graph engine
//!
//! A [`Session`] resolves requested assets through a session-scoped
//! [`AssetCache`], loading each from the file store when possible and
//! generating it otherwise.

pub mod cache;
pub mod reload;
pub mod session;

pub use cache::{AssetCache, Origin, Status};
pub use reload::ensure_built;
pub use session::Session;
