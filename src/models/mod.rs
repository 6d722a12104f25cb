// src/models/mod.rs

pub mod flashcard;
pub mod quiz;
pub mod user;
