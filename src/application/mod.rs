//! Application layer orchestrating basket operations.
//!
//! `CheckoutService` ties the basket store, the catalog and the locker
//! together; each mutation runs under the basket's lock.

pub mod service;
