//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `expense_db` and
//! map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod budget;
pub mod category;
pub mod expense;
pub mod legacy;
