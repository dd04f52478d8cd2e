//! Persistence layer: snapshot storage for session profiles.

pub mod memory;
pub mod traits;

pub use memory::MemoryProfileRepository;
pub use traits::ProfileRepository;
