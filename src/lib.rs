//! Client library for the hobby recommendation service
//!
//! Session handling, the survey state machine, catalog browsing and
//! recommendations over either the REST backend or the bundled fixture.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
