//! API handlers module

pub mod constellation;
pub mod health;
pub mod page;
pub mod search;
