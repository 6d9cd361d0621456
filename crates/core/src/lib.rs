//! Ochag Core - Shared cart domain types.
//!
//! This crate provides the types shared by all Ochag components:
//! - `storefront` - The storefront page host and cart engine
//! - `cli` - Command-line cart tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage, no rendering. Everything here can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Product ids, money, line items and the cart state aggregate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
