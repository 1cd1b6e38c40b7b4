//! Mapping store backends.
//!
//! - [`PgMappingRepository`] - PostgreSQL, selected with `STORAGE_BACKEND=postgres`
//! - [`InMemoryMappingRepository`] - process-local maps, used for tests and `STORAGE_BACKEND=memory`

pub mod memory_mapping_repository;
pub mod pg_mapping_repository;

pub use memory_mapping_repository::InMemoryMappingRepository;
pub use pg_mapping_repository::PgMappingRepository;
