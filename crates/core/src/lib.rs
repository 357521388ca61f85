//! Domain types and pure logic for the expense tracker.
//!
//! Nothing in this crate touches the database or the network. The `db` and
//! `api` crates build on the validation, media and admin rules defined here.

pub mod admin;
pub mod budget;
pub mod error;
pub mod expense;
pub mod media;
pub mod search;
pub mod types;
pub mod validation;
