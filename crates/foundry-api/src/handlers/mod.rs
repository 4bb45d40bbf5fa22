//! Handler modules for foundry-api.

pub mod auth;
pub mod items;
pub mod upload;
