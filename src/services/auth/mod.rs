pub mod factory;
pub mod token_validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use factory::build_token_validator;
pub use token_validator::{Claims, InvalidToken, TokenValidator};
