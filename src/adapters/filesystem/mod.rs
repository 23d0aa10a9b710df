//! Local filesystem destination writing JSON Lines files

pub mod adapter;

pub use adapter::FilesystemDestination;
