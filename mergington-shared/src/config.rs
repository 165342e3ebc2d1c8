use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{seed_activities, Activities};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub listen_on: SocketAddr,
    /// Directory served under `/static`, must contain `index.html`.
    pub static_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_on: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            static_dir: PathBuf::from("./static"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    /// Initial content of the registry.
    #[serde(default = "seed_activities")]
    pub activities: Activities,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            activities: seed_activities(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("activity {0:?} must have a positive max_participants")]
    ZeroCapacity(String),
    #[error("activity {activity:?} lists {email:?} more than once")]
    DuplicateParticipant { activity: String, email: String },
}

impl Config {
    /// Checks the seeded activities.
    ///
    /// Overbooked activities are accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, record) in &self.activities {
            if record.max_participants == 0 {
                return Err(ConfigError::ZeroCapacity(name.clone()));
            }
            for (i, email) in record.participants.iter().enumerate() {
                if record.participants[..i].contains(email) {
                    return Err(ConfigError::DuplicateParticipant {
                        activity: name.clone(),
                        email: email.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
