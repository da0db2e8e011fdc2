use log::{debug, info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::host::DashboardHost;
use crate::types::Configuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WidgetMode {
    Setup,
    Display,
}

/// Values shown in the setup form while the user edits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDraft {
    pub repository_url: String,
    pub access_token: String,
}

impl ConfigDraft {
    fn from_configuration(config: &Configuration) -> Self {
        Self {
            repository_url: config.repository_url.clone(),
            access_token: config.access_token.clone().unwrap_or_default(),
        }
    }

    /// The form's save action is only offered once a URL was typed.
    pub fn can_save(&self) -> bool {
        !self.repository_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Nothing was ever saved, so the host was asked to drop the widget.
    Removed,
    /// Edits were discarded and the persisted configuration is active again.
    Restored(Configuration),
}

/// Tracks setup/display mode and the active repository configuration.
/// Never touches the network; all failures here are user input errors.
#[derive(Debug, Clone)]
pub struct ConfigurationManager {
    mode: WidgetMode,
    draft: ConfigDraft,
    error: Option<String>,
    active: Option<Configuration>,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self {
            mode: WidgetMode::Setup,
            draft: ConfigDraft::default(),
            error: None,
            active: None,
        }
    }
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> WidgetMode {
        self.mode
    }

    pub fn draft(&self) -> &ConfigDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active(&self) -> Option<&Configuration> {
        self.active.as_ref()
    }

    pub fn set_draft_url(&mut self, repository_url: impl Into<String>) {
        self.draft.repository_url = repository_url.into();
    }

    pub fn set_draft_token(&mut self, access_token: impl Into<String>) {
        self.draft.access_token = access_token.into();
    }

    /// Reads the persisted configuration. Returns `None` and enters setup
    /// mode when the host has nothing stored yet.
    pub fn load_configuration<H: DashboardHost>(
        &mut self,
        host: &mut H,
    ) -> Result<Option<Configuration>> {
        match host.read_config()? {
            Some(config) => {
                debug!("Loaded configuration {:?}", config);
                self.draft = ConfigDraft::from_configuration(&config);
                self.active = Some(config.clone());
                self.error = None;
                self.mode = WidgetMode::Display;
                Ok(Some(config))
            }
            None => {
                info!("No stored configuration, entering setup");
                self.mode = WidgetMode::Setup;
                host.enter_config_mode();
                Ok(None)
            }
        }
    }

    /// Validates the URL, derives owner and project, and persists the result.
    ///
    /// A rejected URL leaves the manager in setup mode with the message
    /// available through [`error`](Self::error); nothing is persisted.
    pub fn validate_and_save<H: DashboardHost>(
        &mut self,
        host: &mut H,
        repository_url: &str,
        access_token: Option<String>,
    ) -> Result<Configuration> {
        self.draft.repository_url = repository_url.to_string();
        self.draft.access_token = access_token.clone().unwrap_or_default();

        let config = match Configuration::from_url(repository_url, access_token) {
            Ok(config) => config,
            Err(e) => {
                warn!("Rejected repository URL '{}': {}", repository_url, e);
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        host.store_config(&config)?;
        host.exit_config_mode();
        info!(
            "Saved configuration for {}/{}",
            config.owner_name, config.project_id
        );

        self.error = None;
        self.active = Some(config.clone());
        self.mode = WidgetMode::Display;
        Ok(config)
    }

    /// Saves whatever is currently in the draft.
    pub fn save_draft<H: DashboardHost>(&mut self, host: &mut H) -> Result<Configuration> {
        let ConfigDraft {
            repository_url,
            access_token,
        } = self.draft.clone();
        self.validate_and_save(host, &repository_url, Some(access_token))
    }

    pub fn cancel<H: DashboardHost>(&mut self, host: &mut H) -> Result<CancelOutcome> {
        self.error = None;

        if host.read_config()?.is_none() {
            info!("Setup cancelled before anything was saved, removing widget");
            host.remove_widget();
            return Ok(CancelOutcome::Removed);
        }

        self.mode = WidgetMode::Display;
        host.exit_config_mode();

        match self.load_configuration(host)? {
            Some(config) => Ok(CancelOutcome::Restored(config)),
            None => {
                host.remove_widget();
                Ok(CancelOutcome::Removed)
            }
        }
    }

    /// Re-enters setup with the current values as form defaults.
    pub fn request_reconfigure<H: DashboardHost>(&mut self, host: &mut H) {
        if let Some(config) = &self.active {
            self.draft = ConfigDraft::from_configuration(config);
        }
        self.error = None;
        self.mode = WidgetMode::Setup;
        host.enter_config_mode();
    }
}
