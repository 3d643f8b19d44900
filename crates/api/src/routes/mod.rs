//! Route handlers

pub mod advice;
pub mod aqi;
pub mod models;
