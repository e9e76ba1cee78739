// Personal dashboard core: application shortcuts, news cache and best-effort persistence
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
