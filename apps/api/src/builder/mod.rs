//! Resume builder: form data in, formatted resume PDF out.

pub mod handlers;
pub mod models;
pub mod renderer;
