// Unit tests for services
mod llm_client_test;

// Unit tests for API
mod auth_test;
mod config_test;
