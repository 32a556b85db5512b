//! Business operations. Handlers validate input and call into these; the
//! services talk to the `Store` and return typed `AppError`s.

pub mod auth;
pub mod tasks;
pub mod users;
