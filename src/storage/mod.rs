// Gateway module for storage - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod file_store;
mod memory;
mod session_store;
mod traits;

// Public re-exports - the ONLY way to access storage functionality
pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use session_store::SessionStore;
pub use traits::KeyValueStore;

#[cfg(test)]
pub use traits::MockKeyValueStore;
