// Errors surfaced by the dashboard's action creators

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("invalid application: {}", .errors.join(", "))]
    InvalidApplication { errors: Vec<String> },
    #[error("application {0} not found")]
    ApplicationNotFound(String),
    #[error("dashboard store task failed: {0}")]
    StoreTask(#[from] tokio::task::JoinError),
}
