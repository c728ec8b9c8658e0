//! End-to-end tests for the journal core against in-memory collaborators.

mod codec;
mod key_manager;
mod projector;
mod repository;
