//! HTTP surface: the Pub/Sub push endpoint and health probes.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
