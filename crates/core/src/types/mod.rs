//! Core types for Ochag.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod money;

pub use cart::{Adjustment, CartState, LineItem, Product};
pub use id::*;
pub use money::Money;
