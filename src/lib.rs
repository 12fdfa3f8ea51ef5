//! FOLIO Paper-Trading Ledger Library
//!
//! This library provides the core components for the folio portfolio
//! accounting and paper-trading system.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
