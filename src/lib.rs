#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Task management backend: users, tasks assigned to many users, bearer-token"]
#![doc = "authentication, and a uniform JSON envelope around every response."]
#![doc = "The binary (`main.rs`) wires these modules into an Actix Web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
