//! # Todo API Server Library
//!
//! Core of the todo list HTTP service: session login, per-user todo CRUD
//! and the error mapping that keeps other users' todos invisible.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response header middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
