// Application layer - State container, services and the seams they depend on
pub mod clock;
pub mod dashboard_service;
pub mod dashboard_store;
pub mod error;
pub mod key_value_store;
