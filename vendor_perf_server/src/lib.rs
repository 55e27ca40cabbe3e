//! # Vendor performance server
//! This crate hosts the HTTP server for the vendor performance engine. It is responsible for:
//! * Registering users and issuing JWT access and refresh tokens.
//! * Exposing CRUD endpoints for vendors and purchase orders under `/api`, guarded by the bearer token middleware.
//! * Passing every purchase order save through to the engine, which keeps the vendor metrics and performance history
//!   current.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/register`, `/login`, `/token`, `/token/refresh`: account and token management. No token required.
//! * `/api/vendors`, `/api/vendors/{id}`, `/api/vendors/{id}/performance`: vendor management and history.
//! * `/api/purchase_orders`, `/api/purchase_orders/{id}`, `/api/purchase_orders/{id}/acknowledge`: purchase orders.
//!
//! Trailing slashes are accepted on every route.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;
