//! Presentation helper functions

pub mod date;
pub mod img;
