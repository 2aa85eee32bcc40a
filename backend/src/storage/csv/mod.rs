//! # CSV Storage Module
//!
//! File-backed record store: one CSV file per table inside the data directory.
//!
//! ## File Format
//!
//! ```csv
//! id,user_id,title,amount,category,subcategory,description,created_at,recurring_type,is_recurring,mode_of_payment
//! expense::6f1c...,user-1,Coffee,3.5,Food & Dining,Coffee,,2026-10-18,,false,upi
//! ```
//!
//! Writes go to a temporary file that is renamed over the table, and every
//! read-modify-write holds the table's lock.

pub mod connection;
pub mod user_repository;
pub mod category_repository;
pub mod subcategory_repository;
pub mod expense_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::{CsvConnection, Table};
pub use user_repository::UserRepository;
pub use category_repository::CategoryRepository;
pub use subcategory_repository::SubcategoryRepository;
pub use expense_repository::ExpenseRepository;
