// src/lib.rs

pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod quiz;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
