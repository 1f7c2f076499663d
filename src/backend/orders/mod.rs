//! Cart, checkout, and orders
//!
//! Lines are polymorphic over products and events; see
//! [`checkout::decide_line`] for the per-line rules and
//! [`checkout::perform_checkout`] for the transactional flow.

pub mod checkout;
pub mod db;
pub mod handlers;
pub mod models;

pub use models::{CartItem, Order, OrderItem, OrderStatus};
