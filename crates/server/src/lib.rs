pub mod chart;
pub mod clients;
pub mod config;
pub mod error;
pub mod routes;
