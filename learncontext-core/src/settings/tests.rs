use crate::ai::mock::MockBehavior;
use crate::ai::types::DEFAULT_MODEL;
use crate::assistant::Backend;
use crate::settings::config::ProviderConfig;
use crate::settings::manager::SettingsManager;
use crate::settings::Settings;
use tempfile::TempDir;

#[test]
fn test_missing_file_created_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("nested").join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert!(settings_path.exists());
    assert_eq!(manager.settings(), Settings::default());
    assert_eq!(manager.settings().tutor.model, DEFAULT_MODEL);
    assert_eq!(manager.settings().grading.temperature, Some(0.5));
}

#[test]
fn test_corrupt_file_backed_up() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "this is = = not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert_eq!(manager.settings(), Settings::default());
    let backup = temp_dir.path().join("settings.toml.backup");
    assert_eq!(
        std::fs::read_to_string(backup).unwrap(),
        "this is = = not toml"
    );
}

#[test]
fn test_update_is_in_memory_until_saved() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    manager.update_setting(|settings| settings.compact_large_profiles = true);
    assert!(manager.settings().compact_large_profiles);
    assert!(!SettingsManager::from_path(settings_path.clone())
        .unwrap()
        .settings()
        .compact_large_profiles);

    manager.save().unwrap();
    assert!(SettingsManager::from_path(settings_path)
        .unwrap()
        .settings()
        .compact_large_profiles);
}

#[test]
fn test_provider_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    manager.update_setting(|settings| {
        settings.add_provider(
            "openai",
            ProviderConfig::OpenAi {
                api_key: "sk-test".to_string(),
                base_url: None,
            },
        );
        settings.add_provider(
            "mock",
            ProviderConfig::Mock {
                behavior: MockBehavior::FixedText {
                    text: "hello".to_string(),
                },
            },
        );
    });
    manager.save().unwrap();

    let reloaded = SettingsManager::from_path(settings_path).unwrap().settings();
    assert_eq!(reloaded.active_provider.as_deref(), Some("mock"));
    assert_eq!(reloaded.providers.len(), 2);
    assert_eq!(reloaded, manager.settings());
}

#[test]
fn test_backend_selection() {
    let mut settings = Settings::default();
    assert!(matches!(settings.backend(), Backend::Demo));

    settings.active_provider = Some("missing".to_string());
    assert!(matches!(settings.backend(), Backend::Demo));

    settings.add_provider(
        "mock",
        ProviderConfig::Mock {
            behavior: MockBehavior::Success,
        },
    );
    match settings.backend() {
        Backend::Live(provider) => assert_eq!(provider.name(), "mock"),
        Backend::Demo => panic!("expected a live backend"),
    }

    settings.clear_active_provider();
    assert!(matches!(settings.backend(), Backend::Demo));
}

#[test]
fn test_data_dir_override() {
    let settings = Settings {
        data_dir: Some("/tmp/learncontext-data".into()),
        ..Default::default()
    };
    assert_eq!(
        settings.data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/learncontext-data")
    );
}
