//! Controller configuration.
//!
//! Mirrors the options an installation actually varies: connection
//! parameters, poll interval and which subsystem groups exist. Everything
//! except the host has a working default (port 502, unit id 2, 60 s
//! interval, all groups enabled).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::point::Group;
use crate::session::SessionConfig;

fn default_true() -> bool {
    true
}

fn default_poll_interval_secs() -> u64 {
    60
}

/// Which subsystem groups the installation has. Disabled groups are never
/// polled and their points are not addressable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupToggles {
    #[serde(default = "default_true")]
    pub controller: bool,
    #[serde(default = "default_true")]
    pub boiler: bool,
    #[serde(default = "default_true")]
    pub dhw: bool,
    #[serde(default = "default_true")]
    pub hk1: bool,
    #[serde(default = "default_true")]
    pub hk2: bool,
    #[serde(default = "default_true")]
    pub buffer: bool,
    #[serde(default = "default_true")]
    pub discharge: bool,
    #[serde(default = "default_true")]
    pub circulation: bool,
}

impl GroupToggles {
    /// Everything enabled.
    pub fn all() -> Self {
        Self {
            controller: true,
            boiler: true,
            dhw: true,
            hk1: true,
            hk2: true,
            buffer: true,
            discharge: true,
            circulation: true,
        }
    }

    /// Everything disabled; enable groups individually.
    pub fn none() -> Self {
        Self {
            controller: false,
            boiler: false,
            dhw: false,
            hk1: false,
            hk2: false,
            buffer: false,
            discharge: false,
            circulation: false,
        }
    }

    fn enabled(&self, group: Group) -> bool {
        match group {
            Group::Controller => self.controller,
            Group::Boiler => self.boiler,
            Group::Dhw => self.dhw,
            Group::HeatingCircuit1 => self.hk1,
            Group::HeatingCircuit2 => self.hk2,
            Group::Buffer => self.buffer,
            Group::Discharge => self.discharge,
            Group::Circulation => self.circulation,
        }
    }
}

impl Default for GroupToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Full configuration for one controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(flatten)]
    pub session: SessionConfig,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub groups: GroupToggles,
}

impl ControllerConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            session: SessionConfig::new(host),
            poll_interval_secs: default_poll_interval_secs(),
            groups: GroupToggles::default(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Enabled groups in catalog order.
    pub fn enabled_groups(&self) -> Vec<Group> {
        Group::ALL
            .into_iter()
            .filter(|group| self.groups.enabled(*group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"host":"192.168.1.40"}"#).unwrap();
        assert_eq!(config.session.host, "192.168.1.40");
        assert_eq!(config.session.port, 502);
        assert_eq!(config.session.unit_id, 2);
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.enabled_groups().len(), Group::ALL.len());
    }

    #[test]
    fn test_group_toggles() {
        let config: ControllerConfig = serde_json::from_str(
            r#"{"host":"192.168.1.40","groups":{"boiler":true,"controller":false,"dhw":false,"hk1":false,"hk2":false,"buffer":false,"discharge":false,"circulation":false}}"#,
        )
        .unwrap();
        assert_eq!(config.enabled_groups(), vec![Group::Boiler]);
    }

    #[test]
    fn test_toggle_presets() {
        assert!(GroupToggles::all().enabled(Group::Circulation));
        assert!(!GroupToggles::none().enabled(Group::Boiler));
    }
}
