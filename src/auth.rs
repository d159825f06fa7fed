//! Client credentials, signing keys, and bearer token models.

pub mod credentials;
pub mod key;
pub mod token;

pub use credentials::*;
pub use key::*;
pub use token::*;
