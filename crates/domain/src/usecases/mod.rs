//! Use case implementations - core pipeline logic

pub mod aggregate;
pub mod filters;
pub mod recommend;
pub mod trending;
