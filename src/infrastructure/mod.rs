// Infrastructure layer - Storage facilities, adapters and configuration
pub mod config;
pub mod file_store;
pub mod http_response;
pub mod memory_store;
pub mod news_parser;
pub mod storage_gateway;
