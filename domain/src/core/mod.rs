//! Core domain concepts shared across all subdomains.
//!
//! - [`backend::Backend`] — the named model backends a query can target
//! - [`query::Query`] — a validated user question plus its routing target
//! - [`error::DomainError`] — domain-level errors

pub mod backend;
pub mod error;
pub mod query;
