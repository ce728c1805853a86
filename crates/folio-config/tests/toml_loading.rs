//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed working directories and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use folio_config::FolioConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_weights_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[weights]
title = 2.5
tag = 0.5
"#,
        )?;

        let config: FolioConfig = Figment::from(Serialized::defaults(FolioConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!((config.weights.title - 2.5).abs() < f64::EPSILON);
        assert!((config.weights.tag - 0.5).abs() < f64::EPSILON);
        // Untouched fields keep their defaults.
        assert!((config.weights.author - 1.8).abs() < f64::EPSILON);
        Ok(())
    });
}

#[test]
fn loads_search_and_entity_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[search]
max_candidates = 250
default_limit = 10
max_limit = 50

[entity]
character_bonus = 0.2
cap = 1.3
"#,
        )?;

        let config: FolioConfig = Figment::from(Serialized::defaults(FolioConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.search.max_candidates, 250);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.max_limit, 50);
        assert!((config.entity.character_bonus - 0.2).abs() < f64::EPSILON);
        assert!((config.entity.cap - 1.3).abs() < f64::EPSILON);
        config.validate().unwrap();
        Ok(())
    });
}

#[test]
fn project_config_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".folio")?;
        jail.create_file(
            ".folio/config.toml",
            r#"
[database]
path = "catalog.db"
"#,
        )?;

        let config = FolioConfig::load().expect("config loads");
        assert_eq!(config.database.path, "catalog.db");
        Ok(())
    });
}

#[test]
fn invalid_project_config_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_dir(".folio")?;
        jail.create_file(
            ".folio/config.toml",
            r#"
[weights]
genre = -1.0
"#,
        )?;

        let err = FolioConfig::load().unwrap_err();
        assert!(err.to_string().contains("weights.genre"), "{err}");
        Ok(())
    });
}
