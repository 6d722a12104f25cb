// src/handlers/mod.rs

pub mod auth;
pub mod flashcards;
pub mod quiz;
