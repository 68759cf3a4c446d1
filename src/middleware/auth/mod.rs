pub mod gate;
pub mod identity;
pub mod public_paths;

pub use gate::{Admission, AuthenticationGate, Rejection, apply};
pub use identity::IdentityHeaders;
pub use public_paths::{PUBLIC_PATHS, PublicPathRule, is_public_path};
