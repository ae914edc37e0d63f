//! Expense-form calculator.
//!
//! An incremental expression editor with a safe arithmetic evaluator, live
//! preview, and commit of the final amount to a host form field.

pub mod calculator;
pub mod config;
pub mod form;

pub use calculator::{CommitPayload, ErrorKind, Key, Session};
pub use config::CalculatorConfig;
