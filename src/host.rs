use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Configuration;

/// Services the dashboard provides to an embedded widget.
pub trait DashboardHost {
    fn read_config(&self) -> Result<Option<Configuration>>;

    fn store_config(&mut self, config: &Configuration) -> Result<()>;

    fn enter_config_mode(&mut self);

    fn exit_config_mode(&mut self);

    fn remove_widget(&mut self);

    fn set_title(&mut self, title: &str);
}

/// Host that keeps everything in memory and remembers what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    config: Option<Configuration>,
    title: Option<String>,
    config_mode: bool,
    removed: bool,
    stores: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Configuration) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn in_config_mode(&self) -> bool {
        self.config_mode
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn store_count(&self) -> usize {
        self.stores
    }
}

impl DashboardHost for MemoryHost {
    fn read_config(&self) -> Result<Option<Configuration>> {
        Ok(self.config.clone())
    }

    fn store_config(&mut self, config: &Configuration) -> Result<()> {
        self.config = Some(config.clone());
        self.stores += 1;
        Ok(())
    }

    fn enter_config_mode(&mut self) {
        self.config_mode = true;
    }

    fn exit_config_mode(&mut self) {
        self.config_mode = false;
    }

    fn remove_widget(&mut self) {
        self.removed = true;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
}

/// Host that persists the configuration as a JSON file, for running the
/// widget outside a dashboard. Mode, title and removal are only logged.
#[derive(Debug, Clone)]
pub struct JsonFileHost {
    path: PathBuf,
}

impl JsonFileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DashboardHost for JsonFileHost {
    fn read_config(&self) -> Result<Option<Configuration>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store_config(&mut self, config: &Configuration) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(config)?)?;
        debug!("Stored widget configuration at {}", self.path.display());
        Ok(())
    }

    fn enter_config_mode(&mut self) {
        debug!("Entering configuration mode");
    }

    fn exit_config_mode(&mut self) {
        debug!("Leaving configuration mode");
    }

    fn remove_widget(&mut self) {
        debug!("Widget removed; deleting {}", self.path.display());
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to delete widget configuration {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    fn set_title(&mut self, title: &str) {
        debug!("Widget title: {}", title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_host_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = JsonFileHost::new(dir.path().join("nested").join("widget.json"));
        assert!(host.read_config().unwrap().is_none());

        let config =
            Configuration::from_url("https://github.com/acme/widgets", Some("tok".into()))
                .unwrap();
        host.store_config(&config).unwrap();
        assert_eq!(host.read_config().unwrap(), Some(config));

        host.remove_widget();
        assert!(host.read_config().unwrap().is_none());
    }

    #[test]
    fn test_json_file_host_reads_host_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");
        fs::write(
            &path,
            r#"{"repoUrl":"https://github.com/acme/widgets","userName":"acme","projectId":"widgets"}"#,
        )
        .unwrap();

        let config = JsonFileHost::new(&path).read_config().unwrap().unwrap();
        assert_eq!(config.project_id, "widgets");
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_json_file_host_remove_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = JsonFileHost::new(dir.path().join("widget.json"));

        host.remove_widget();
        assert!(host.read_config().unwrap().is_none());
    }

    #[test]
    fn test_json_file_host_remove_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("widget.json");
        fs::create_dir_all(blocked.join("child")).unwrap();
        let mut host = JsonFileHost::new(&blocked);

        host.remove_widget();
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_memory_host_records_calls() {
        let mut host = MemoryHost::new();
        host.enter_config_mode();
        host.set_title("Project: widgets");
        assert!(host.in_config_mode());
        assert_eq!(host.title(), Some("Project: widgets"));

        host.exit_config_mode();
        host.remove_widget();
        assert!(!host.in_config_mode());
        assert!(host.is_removed());
    }
}
