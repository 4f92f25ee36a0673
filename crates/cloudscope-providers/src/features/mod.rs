pub mod clients;
pub mod element_registry;
pub mod identity;
pub mod metrics;
