pub mod identity;

pub use identity::{ForwardedIdentity, ForwardedIdentityExtractor};
