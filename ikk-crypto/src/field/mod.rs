#![allow(non_snake_case)] // Allow non-snake_case identifiers (like matrix variable names)

//! # Field Module
//!
//! Provides the [`Field`] struct for the prime field GF(q) together with the
//! dense vector/matrix routines built on top of it.

pub mod helper;
pub mod math;
pub mod matrix_ops;

/// Represents a mathematical vector using a `Vec<i64>`.
pub type Vector = Vec<i64>;
/// Represents a mathematical matrix using a `Vec<Vec<i64>>` (row-major).
pub type Matrix = Vec<Vec<i64>>;

pub use helper::is_prime;
pub use math::Field;
