//! # IO Layer
//!
//! Interfaces through which the dashboard is driven from outside the process.

pub mod rest;
