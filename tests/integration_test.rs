use replf::config::Config;
use replf::highlight::ColorScheme;

#[test]
fn test_config_validation_rejects_multiline_prompt() {
    let config = Config {
        prompt: "scala>\n".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_accepts_every_named_theme() {
    for name in ColorScheme::NAMES {
        let config = Config {
            theme: name.to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok(), "theme {name} should validate");
    }
}

#[test]
fn test_config_validation_rejects_unknown_theme() {
    let config = Config {
        theme: "neon".to_string(),
        ..Config::default()
    };

    let err = config.validate().expect_err("unknown theme");
    assert!(err.to_string().contains("neon"));
}
