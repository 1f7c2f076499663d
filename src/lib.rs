//! Art Corner
//!
//! A social/commerce platform for artists: profiles, artwork listings,
//! collaborative galleries, events with RSVP, articles, messaging,
//! comments, notifications, and a cart/checkout flow against an external
//! payment processor.
//!
//! The crate is a library plus one server binary (`artcorner-server`).
//! See [`backend`] for the module map.

pub mod backend;
pub mod shared;
