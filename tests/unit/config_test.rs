use gurumi_server::config::Config;
use validator::Validate;

fn base_config() -> Config {
    Config {
        server_port: 8080,
        api_key: "a-sufficiently-long-api-key-0123456789ab".to_string(),
        database_url: "sqlite://gurumi.db".to_string(),
        llm_api_url: "https://api.openai.com/v1".to_string(),
        llm_api_key: "sk-test".to_string(),
        llm_model: "gpt-4o-mini".to_string(),
        media_base_url: "http://localhost:8080".to_string(),
        media_bucket: "gurumi-media".to_string(),
        initial_lemon_count: 10,
        snowflake_machine_id: 1,
        max_connections: 10,
        log_level: "info".to_string(),
    }
}

#[test]
fn base_config_validates() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn rejects_privileged_or_out_of_range_ports() {
    for port in [80, 443, 1023] {
        let mut config = base_config();
        config.server_port = port;
        assert!(config.validate().is_err(), "port {port} should be rejected");
    }
}

#[test]
fn rejects_short_api_keys() {
    let mut config = base_config();
    config.api_key = "short".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn rejects_machine_ids_beyond_ten_bits() {
    let mut config = base_config();
    config.snowflake_machine_id = 1024;
    assert!(config.validate().is_err());

    config.snowflake_machine_id = 1023;
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_unreasonable_lemon_grants() {
    let mut config = base_config();
    config.initial_lemon_count = 1001;
    assert!(config.validate().is_err());

    config.initial_lemon_count = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_zero_database_connections() {
    let mut config = base_config();
    config.max_connections = 0;
    assert!(config.validate().is_err());
}
