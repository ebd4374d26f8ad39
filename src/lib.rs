//! Shift Lifecycle & Payroll Calculation Engine
//!
//! This crate implements the server-side core of a casual-staffing
//! marketplace: billable-hour and cost calculation for posted shifts,
//! the shift lifecycle state machine from posting through payment, and
//! the coordinator that sequences offers, reschedules, blocks, and
//! settlement on top of it, exposed over a small REST API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod models;
