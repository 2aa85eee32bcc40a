//! # Storage Module
//!
//! The record store behind the dashboard. The domain layer only sees the traits
//! in [`traits`]; [`csv`] is the file-backed implementation used by the binary.

pub mod traits;
pub mod csv;

#[cfg(test)]
pub mod fault_injection;

pub use traits::{CategoryStorage, Connection, ExpenseStorage, SubcategoryStorage, UserStorage};
pub use csv::CsvConnection;
