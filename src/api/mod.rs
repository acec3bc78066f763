//! HTTP handlers, one module per resource

pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;
