//! Contains the two store implementations: DiskStore and MemoryStore

/// Defines DiskStore, backed by an input and an output directory
pub mod disk;

/// Defines MemoryStore, which keeps everything in process
pub mod memory;
