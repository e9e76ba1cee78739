// Domain layer - Entities, reducer and pure validation rules
pub mod application;
pub mod dashboard;
pub mod news;
pub mod timestamp;
pub mod validation;
