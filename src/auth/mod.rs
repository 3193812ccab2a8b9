//! Service-account authentication
//!
//! Loads a service-account key file and turns it into short-lived bearer
//! tokens via the OAuth2 `jwt-bearer` grant.

mod token;
mod types;

pub use token::TokenProvider;
pub use types::{CachedToken, ServiceAccountKey, DATASTORE_SCOPE};

#[cfg(test)]
mod tests;
