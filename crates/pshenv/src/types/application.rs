use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StringMap, Variables, nullable};
use crate::codec::{
    AccessLevel, AccessType, ApplicationMount, Duration, ServiceSize, SocketFamily,
    SocketProtocol,
};

/// Access levels keyed by access type.
pub type Access = BTreeMap<AccessType, AccessLevel>;

/// The application manifest (`PLATFORM_APPLICATION`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    /// Application name.
    pub name: String,
    /// Runtime type, e.g. `golang:1.22`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Runtime-specific settings.
    pub runtime: Value,
    /// Container size class.
    pub size: ServiceSize,
    /// Persistent disk in MB.
    #[serde(deserialize_with = "nullable")]
    pub disk: u32,
    /// SSH access levels.
    pub access: Access,
    /// Relationship name to `service:endpoint`.
    pub relationships: StringMap,
    /// Writable mounts keyed by path.
    pub mounts: BTreeMap<String, Mount>,
    /// Time zone for cron jobs.
    #[serde(deserialize_with = "nullable")]
    pub timezone: String,
    /// Variables declared in the manifest.
    pub variables: Variables,
    /// Build-time preflight checks.
    pub preflight: Preflight,
    /// Web server configuration.
    pub web: Web,
    /// Lifecycle hooks.
    pub hooks: Hooks,
    /// Scheduled jobs keyed by name.
    pub crons: BTreeMap<String, Cron>,
    /// Background workers keyed by name.
    pub workers: BTreeMap<String, Worker>,
    /// Tree hash of the deployed source.
    pub tree_id: String,
    /// Build slug identifier.
    pub slug_id: String,
    /// Absolute application directory.
    pub app_dir: String,
}

/// Web server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Web {
    /// Location blocks keyed by path prefix.
    pub locations: BTreeMap<String, WebLocation>,
    /// Start and stop commands.
    pub commands: Commands,
    /// How the front proxy talks to the application.
    pub upstream: Upstream,

    // Legacy fields, superseded by `locations`.
    /// Legacy document root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_root: Option<String>,
    /// Legacy passthru target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthru: Option<String>,
    /// Legacy index files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_files: Option<Vec<String>>,
    /// Legacy allow list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    /// Legacy deny list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
    /// Legacy static file expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Duration>,
    /// Legacy root relocation flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_to_root: Option<bool>,
}

/// A web location block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebLocation {
    /// Directory served, relative to the application root.
    #[serde(deserialize_with = "nullable")]
    pub root: String,
    /// Cache lifetime of static files.
    pub expires: Duration,
    /// Where requests for missing files go.
    pub passthru: Passthru,
    /// Whether scripts may execute.
    pub scripts: bool,
    /// Index files.
    #[serde(deserialize_with = "nullable")]
    pub index: Vec<String>,
    /// Whether files are served by default.
    pub allow: bool,
    /// Extra response headers.
    pub headers: StringMap,
    /// Per-pattern overrides.
    pub rules: BTreeMap<String, WebRule>,
}

/// A per-pattern override inside a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebRule {
    /// Cache lifetime.
    pub expires: Duration,
    /// Where matching requests go.
    pub passthru: Passthru,
    /// Whether scripts may execute.
    pub scripts: bool,
    /// Whether matching files are served.
    pub allow: bool,
    /// Extra response headers.
    pub headers: StringMap,
}

/// Passthru setting: disabled, enabled, or an explicit target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Passthru {
    /// `true` or `false`.
    Enabled(bool),
    /// A target path such as `/index.php`.
    Path(String),
}

impl Default for Passthru {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

/// Start and stop commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commands {
    /// Start command.
    pub start: String,
    /// Stop command.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub stop: String,
}

/// How the front proxy reaches the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upstream {
    /// TCP or Unix socket.
    pub socket_family: SocketFamily,
    /// Wire protocol.
    #[serde(rename = "socket_protocol")]
    pub protocol: SocketProtocol,
}

/// Lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hooks {
    /// Runs during the build.
    #[serde(deserialize_with = "nullable")]
    pub build: String,
    /// Runs on every deploy.
    #[serde(deserialize_with = "nullable")]
    pub deploy: String,
    /// Runs after the deploy, with traffic enabled.
    #[serde(deserialize_with = "nullable")]
    pub post_deploy: String,
}

/// A scheduled job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cron {
    /// Crontab schedule.
    pub spec: String,
    /// Command to run.
    pub cmd: String,
}

/// A background worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Worker {
    /// Start and stop commands.
    pub commands: Commands,
    /// Container size class.
    pub size: ServiceSize,
    /// Persistent disk in MB.
    #[serde(deserialize_with = "nullable")]
    pub disk: u32,
    /// Relationship name to `service:endpoint`.
    pub relationships: StringMap,
    /// Writable mounts keyed by path.
    pub mounts: BTreeMap<String, Mount>,
    /// Variables declared for the worker.
    pub variables: Variables,
}

/// A writable mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mount {
    /// Backing store.
    pub source: ApplicationMount,
    /// Path inside the backing store.
    #[serde(rename = "path")]
    pub source_path: String,
    /// Service name for network storage mounts.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub service: String,
}

/// Build-time preflight checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preflight {
    /// Whether checks run.
    pub enabled: bool,
    /// Rules to skip.
    pub ignored_rules: Vec<String>,
}
