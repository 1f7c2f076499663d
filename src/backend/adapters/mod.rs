//! Third-party integrations
//!
//! Thin call/response clients: payment processor, media hosting, outbound
//! email, geocoding. Each is optional; unconfigured clients make the
//! dependent endpoints answer 503 (or skip the side effect entirely).

pub mod geocode;
pub mod mailer;
pub mod media;
pub mod payments;

pub use geocode::GeocodeClient;
pub use mailer::Mailer;
pub use media::MediaClient;
pub use payments::{CheckoutSession, PaymentClient};
