#![allow(clippy::unwrap_used)]

use std::env;
use std::sync::Mutex;
use task_reminder_bot::config::Config;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("REMINDER_INTERVAL_SECS", "30");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.reminder_interval_secs, 30);

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::remove_var("DATABASE_URL");
    env::remove_var("HTTP_PORT");
    env::remove_var("REMINDER_INTERVAL_SECS");
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");
    env::set_var("DATABASE_URL", "sqlite:./data/tasks.db");
    env::remove_var("HTTP_PORT");
    env::remove_var("REMINDER_INTERVAL_SECS");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/tasks.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.reminder_interval_secs, 60);

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::remove_var("DATABASE_URL");
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::set_var("DATABASE_URL", "sqlite:test.db");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));

    env::remove_var("DATABASE_URL");
}

#[test]
fn test_config_missing_database_url() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::remove_var("DATABASE_URL");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("DATABASE_URL must be set"));

    env::remove_var("TELEGRAM_BOT_TOKEN");
}

#[test]
fn test_config_empty_token_rejected() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    env::set_var("DATABASE_URL", "sqlite:test.db");

    let result = Config::from_env();
    assert!(result.is_err());

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::remove_var("DATABASE_URL");
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::remove_var("DATABASE_URL");
    env::remove_var("HTTP_PORT");
}

#[test]
fn test_config_invalid_reminder_interval() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("REMINDER_INTERVAL_SECS", "zero");

    let result = Config::from_env();
    assert!(result.is_err());

    env::set_var("REMINDER_INTERVAL_SECS", "0");
    let result = Config::from_env();
    assert!(result.is_err());

    env::remove_var("TELEGRAM_BOT_TOKEN");
    env::remove_var("DATABASE_URL");
    env::remove_var("REMINDER_INTERVAL_SECS");
}
