//! Webhook normalization services.

mod normalizer;

pub use normalizer::WebhookNormalizer;
