//! Dispatch results: per-backend replies, dataset matches and aggregates.

pub mod value_objects;
