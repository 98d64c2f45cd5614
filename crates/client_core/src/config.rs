use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub project_id: String,
    pub database_id: String,
    pub collection: String,
    pub api_key: Option<String>,
    /// Overrides the Firestore endpoint, e.g. to point at an emulator or a
    /// test server.
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id: "todo-demo".into(),
            database_id: "(default)".into(),
            collection: "todos".into(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Defaults, overlaid by `todo.toml` (or an explicit config path), overlaid
/// by `APP__*` environment variables. Missing or unparsable layers are
/// skipped rather than fatal.
pub fn load_settings(config_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("project_id") {
                settings.project_id = v.clone();
            }
            if let Some(v) = file_cfg.get("database_id") {
                settings.database_id = v.clone();
            }
            if let Some(v) = file_cfg.get("collection") {
                settings.collection = v.clone();
            }
            if let Some(v) = file_cfg.get("api_key") {
                settings.api_key = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("base_url") {
                settings.base_url = Some(v.clone());
            }
        }
    }

    if let Ok(v) = std::env::var("APP__PROJECT_ID") {
        settings.project_id = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_ID") {
        settings.database_id = v;
    }
    if let Ok(v) = std::env::var("APP__COLLECTION") {
        settings.collection = v;
    }
    if let Ok(v) = std::env::var("APP__API_KEY") {
        settings.api_key = Some(v);
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = Some(v);
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn defaults_target_the_todos_collection() {
        let settings = Settings::default();
        assert_eq!(settings.collection, "todos");
        assert_eq!(settings.database_id, "(default)");
        assert!(settings.api_key.is_none());
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn toml_file_overrides_defaults_and_env_overrides_toml() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let config_path = env::temp_dir().join(format!("todo_config_test_{suffix}.toml"));
        fs::write(
            &config_path,
            "project_id = \"file-project\"\ncollection = \"file-todos\"\n",
        )
        .expect("write config");

        let settings = load_settings(Some(&config_path));
        assert_eq!(settings.project_id, "file-project");
        assert_eq!(settings.collection, "file-todos");
        assert_eq!(settings.database_id, "(default)");

        env::set_var("APP__PROJECT_ID", "env-project");
        env::set_var("APP__API_KEY", "env-key");
        let settings = load_settings(Some(&config_path));
        env::remove_var("APP__PROJECT_ID");
        env::remove_var("APP__API_KEY");

        assert_eq!(settings.project_id, "env-project");
        assert_eq!(settings.api_key.as_deref(), Some("env-key"));
        assert_eq!(settings.collection, "file-todos");

        fs::remove_file(config_path).expect("cleanup");
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let missing = Path::new("/nonexistent/todo.toml");
        let settings = load_settings(Some(missing));
        // Only fields no other test overrides through the environment.
        assert_eq!(settings.collection, "todos");
        assert_eq!(settings.database_id, "(default)");
    }
}
