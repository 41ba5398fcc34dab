//! Chain collaborator implementations.

#[cfg(feature = "dev-chain")]
mod dev;

#[cfg(feature = "dev-chain")]
pub use dev::{DevChain, DevChainConfig, DevTransaction};
