//! HTTP plumbing shared by Foodgram services: health checks, request ids and tracing setup.

pub mod health;
pub mod middleware;
pub mod tracing;
