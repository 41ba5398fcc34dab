//! Key-value store implementations - JSON file, in-memory and session flags.

mod memory;
mod scoped;
mod session;

#[cfg(feature = "file-store")]
mod file;

pub use memory::InMemoryStore;
pub use scoped::ScopedStore;
pub use session::{
    DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE, SessionScope, SessionStore,
};

#[cfg(feature = "file-store")]
pub use file::FileStore;
