use ahashmap::AHashSet;
use schemars::JsonSchema;
use serde::Deserialize;

pub const DEFAULT_LIBRARY_DIRECTORY: &str = "lib";

fn default_library_directory() -> String {
    DEFAULT_LIBRARY_DIRECTORY.to_string()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("libraryName must be a non-empty module specifier")]
    MissingLibraryName,
    #[error("no libraries were configured")]
    NoLibraries,
    #[error("library {0:?} is configured more than once")]
    DuplicateLibrary(String),
}

/// A JSON serializable proxy for the [EngineConfig] struct
///
/// Field names match the options of babel-plugin-import, so existing
/// configs for it can be reused.
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineJSONConfig {
    // Module specifier of the barrel entrypoint to intercept, e.g. "antd"
    pub library_name: String,
    // Path segment between the library root and the per-symbol module
    #[serde(default = "default_library_directory")]
    pub library_directory: String,
    // Also import `<module path>/style` for every materialized module
    #[serde(default)]
    pub style: bool,
    // Inserted before each interior uppercase letter when turning an
    // exported symbol into a file name. "" maps DatePicker -> datepicker,
    // "-" maps it to date-picker.
    #[serde(default)]
    pub component_name_separator: String,
}

/// Top level config file: either a single library, or a list of them.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TransformJSONConfig {
    Libraries { libraries: Vec<EngineJSONConfig> },
    Single(EngineJSONConfig),
}

/// Configuration for one [crate::ImportEngine]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub library_name: String,
    pub library_directory: String,
    pub include_styles: bool,
    pub separator: String,
}

impl EngineConfig {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            library_directory: default_library_directory(),
            include_styles: false,
            separator: String::new(),
        }
    }

    pub fn with_library_directory(mut self, library_directory: impl Into<String>) -> Self {
        self.library_directory = library_directory.into();
        self
    }

    pub fn with_styles(mut self, include_styles: bool) -> Self {
        self.include_styles = include_styles;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl TryFrom<EngineJSONConfig> for EngineConfig {
    type Error = ConfigError;
    fn try_from(value: EngineJSONConfig) -> Result<Self, Self::Error> {
        if value.library_name.trim().is_empty() {
            return Err(ConfigError::MissingLibraryName);
        }
        Ok(EngineConfig {
            library_name: value.library_name,
            library_directory: value.library_directory,
            include_styles: value.style,
            separator: value.component_name_separator,
        })
    }
}

impl TransformJSONConfig {
    /// Validates every library entry. Each library may appear only once,
    /// since engines for the same library would share one slot of unit state.
    pub fn into_engine_configs(self) -> Result<Vec<EngineConfig>, ConfigError> {
        let raw = match self {
            TransformJSONConfig::Libraries { libraries } => libraries,
            TransformJSONConfig::Single(single) => vec![single],
        };
        if raw.is_empty() {
            return Err(ConfigError::NoLibraries);
        }

        let mut seen: AHashSet<String> = AHashSet::default();
        raw.into_iter()
            .map(|json_config| {
                let config = EngineConfig::try_from(json_config)?;
                if !seen.insert(config.library_name.clone()) {
                    return Err(ConfigError::DuplicateLibrary(config.library_name));
                }
                Ok(config)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{ConfigError, EngineConfig, EngineJSONConfig, TransformJSONConfig};

    #[test]
    fn test_defaults_from_json() {
        let json: EngineJSONConfig = serde_json::from_str(r#"{ "libraryName": "uilib" }"#).unwrap();
        let config = EngineConfig::try_from(json).unwrap();
        assert_eq!(config, EngineConfig::new("uilib"));
        assert_eq!(config.library_directory, "lib");
        assert!(!config.include_styles);
        assert_eq!(config.separator, "");
    }

    #[test]
    fn test_all_fields_from_json() {
        let json: EngineJSONConfig = serde_json::from_str(
            r#"{
                "libraryName": "uilib",
                "libraryDirectory": "es",
                "style": true,
                "componentNameSeparator": "-"
            }"#,
        )
        .unwrap();
        assert_eq!(
            EngineConfig::try_from(json).unwrap(),
            EngineConfig::new("uilib")
                .with_library_directory("es")
                .with_styles(true)
                .with_separator("-")
        );
    }

    #[test]
    fn test_empty_library_name_is_rejected() {
        let result = EngineConfig::try_from(EngineJSONConfig {
            library_name: "  ".to_string(),
            ..Default::default()
        });
        assert_eq!(result, Err(ConfigError::MissingLibraryName));
    }

    #[test]
    fn test_single_library_file() {
        let config: TransformJSONConfig =
            serde_json::from_str(r#"{ "libraryName": "uilib", "style": true }"#).unwrap();
        assert_eq!(
            config.into_engine_configs().unwrap(),
            vec![EngineConfig::new("uilib").with_styles(true)]
        );
    }

    #[test]
    fn test_library_list_file() {
        let config: TransformJSONConfig = serde_json::from_str(
            r#"{ "libraries": [
                { "libraryName": "uilib" },
                { "libraryName": "icons", "libraryDirectory": "es/icons" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            config.into_engine_configs().unwrap(),
            vec![
                EngineConfig::new("uilib"),
                EngineConfig::new("icons").with_library_directory("es/icons"),
            ]
        );
    }

    #[test]
    fn test_duplicate_and_empty_library_lists() {
        let duplicated: TransformJSONConfig = serde_json::from_str(
            r#"{ "libraries": [{ "libraryName": "uilib" }, { "libraryName": "uilib" }] }"#,
        )
        .unwrap();
        assert_eq!(
            duplicated.into_engine_configs(),
            Err(ConfigError::DuplicateLibrary("uilib".to_string()))
        );

        let empty: TransformJSONConfig = serde_json::from_str(r#"{ "libraries": [] }"#).unwrap();
        assert_eq!(empty.into_engine_configs(), Err(ConfigError::NoLibraries));
    }
}
