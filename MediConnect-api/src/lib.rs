// MediConnect-api lib.rs
//
// Library side of the MediConnect API server: routing, handlers,
// public entities, configuration and the OpenAPI document.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
