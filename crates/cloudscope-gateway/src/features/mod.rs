pub mod client_resolution;
pub mod credential_resolution;
pub mod observability;
pub mod panel_data;
