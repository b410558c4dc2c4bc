use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "url")]
    pub endpoint: Option<String>,
    pub input_file: Option<String>,
    #[serde(alias = "page_size")]
    pub items_per_page: Option<usize>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub reset_page_on_search: Option<bool>,
    pub timeout: Option<u64>,
    pub output_dir: Option<String>,
    pub formats: Option<Vec<String>>,
    pub date_format: Option<String>,
    pub utc: Option<bool>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".datatable").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# datatable config
#
# Location (default):
#   ~/.datatable/config.yml

# Source (the endpoint must answer GET with a JSON array of records)
endpoint: http://localhost:5000/data
# input_file: ./records.json
timeout: 10

# View
items_per_page: 10
# search: ""
# page: 1
# Jump back to page 1 whenever the search term changes.
reset_page_on_search: false

# Export
output_dir: .
# formats: [pdf, xlsx, csv]

# Dates are rendered with a strftime pattern in the local timezone.
date_format: "%-m/%-d/%Y"
utc: false

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg = parse_config(&default_config_yaml()).unwrap();
        assert_eq!(cfg.endpoint.as_deref(), Some("http://localhost:5000/data"));
        assert_eq!(cfg.items_per_page, Some(10));
        assert_eq!(cfg.reset_page_on_search, Some(false));
        assert_eq!(cfg.date_format.as_deref(), Some("%-m/%-d/%Y"));
        assert_eq!(cfg.formats, None);
    }

    #[test]
    fn aliases_are_accepted() {
        let cfg = parse_config("url: http://example.com/records\npage_size: 20\n").unwrap();
        assert_eq!(cfg.endpoint.as_deref(), Some("http://example.com/records"));
        assert_eq!(cfg.items_per_page, Some(20));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), ConfigFile::default());
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(parse_config("items_per_page: [1, 2").is_err());
        assert!(parse_config("items_per_page: lots").is_err());
    }

    #[test]
    fn missing_file_respects_allow_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.timeout, Some(10));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
        assert_eq!(expand_tilde("/abs/x.yml"), PathBuf::from("/abs/x.yml"));
    }
}
