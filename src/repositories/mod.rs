//! Repositorios de acceso a datos
//!
//! Queries SQLx contra PostgreSQL. Los controllers orquestan, los
//! repositorios ejecutan.

pub mod pev_repository;
pub mod transfer_repository;

/// Tamaño de página de todos los listados paginados
pub const PAGE_SIZE: i64 = 10;
