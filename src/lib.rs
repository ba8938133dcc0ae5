pub mod browser;
pub mod config;
pub mod credentials;
pub mod error;
pub mod open;
pub mod output;
pub mod provider;
pub mod remote;
pub mod repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::OpenError;
pub use open::{deliver, resolve, Resolution};
pub use provider::{Provider, ProviderError, RequestRecord};
pub use remote::RemoteDescriptor;
