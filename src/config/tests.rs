use super::load_config;
use super::settings::Settings;
use serial_test::serial;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 0);
    assert_eq!(settings.log.level, "info");
}

#[test]
#[serial]
fn test_load_config_falls_back_to_defaults() {
    temp_env::with_vars_unset(["SERVER_HOST", "SERVER_PORT", "LOG_LEVEL"], || {
        let settings = load_config().expect("load_config should succeed");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 0);
        assert_eq!(settings.log.level, "info");
    });
}

#[test]
#[serial]
fn test_environment_overrides_defaults() {
    temp_env::with_vars(
        [
            ("SERVER_HOST", Some("0.0.0.0")),
            ("SERVER_PORT", Some("9099")),
            ("LOG_LEVEL", Some("debug")),
        ],
        || {
            let settings = load_config().expect("load_config should succeed");
            assert_eq!(settings.server.host, "0.0.0.0");
            assert_eq!(settings.server.port, 9099);
            assert_eq!(settings.log.level, "debug");
        },
    );
}
