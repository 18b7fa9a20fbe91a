pub mod config;
pub mod dto;
pub mod error;
pub mod geo;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
