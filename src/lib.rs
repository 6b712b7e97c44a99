//! Foodgram - a recipe sharing backend
//!
//! Users publish recipes built from a shared ingredient catalog, tag them,
//! favorite them, follow authors and collect recipes into a shopping cart
//! that renders as a PDF shopping list. Every recipe can be shared through a
//! short link that redirects to its page.
//!
//! # Architecture
//! - `storage`: SeaORM persistence and data access
//! - `services`: business logic shared by HTTP and CLI
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: management CLI
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
