//! CLI command implementations.

pub mod find;
pub mod validate;

pub use find::FindCommand;
pub use validate::ValidateCommand;
