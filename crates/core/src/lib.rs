//! Core library for evcharge
//!
//! This crate implements the **Functional Core** of the evcharge application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The evcharge project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`evcharge_core`** (this crate): Pure transformation and validation functions
//! - **`evcharge`**: HTTP calls against the vehicle/station backend and terminal output
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No network access, no global state
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! The only filesystem access lives in [`session`], and it always works on a
//! directory handed in by the caller.
//!
//! # Module Organization
//!
//! - [`charging`]: Power ratings, battery levels and the charging-time estimator
//! - [`plan`]: Combining a car with one or many stations into estimate reports
//! - [`cars`]: Car records and create/edit validation
//! - [`stations`]: Charging-station records and create/edit validation
//! - [`auth`]: Login and registration payloads
//! - [`api`]: Helpers for building endpoint URLs and reading backend errors
//! - [`session`]: Persisting the session token between invocations
//! - [`validation`]: The shared field validation error
//!
//! # Example Usage
//!
//! ```rust
//! use evcharge_core::charging::{estimate_charging_time, ChargingEstimate};
//!
//! let estimate = estimate_charging_time("22kW", 50);
//! assert_eq!(estimate, ChargingEstimate::Estimate { hours: 1, minutes: 30 });
//! assert_eq!(estimate.to_string(), "Estimated time: 1 hour 30 minutes");
//! ```

pub mod api;
pub mod auth;
pub mod cars;
pub mod charging;
pub mod plan;
pub mod session;
pub mod stations;
pub mod validation;
