/*
 *  host.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Boundary to the brewery automation host: state snapshots in,
 *  user notifications out
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;

use crate::model::Snapshot;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("cannot read state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {path} is malformed: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Danger,
}

/// A message for the brewer, shown by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub headline: String,
    pub message: String,
    pub kind: NotificationKind,
    /// None keeps the notification up until dismissed
    pub timeout: Option<Duration>,
}

impl Notification {
    pub fn persistent(kind: NotificationKind, headline: &str, message: &str) -> Self {
        Self {
            headline: headline.to_string(),
            message: message.to_string(),
            kind,
            timeout: None,
        }
    }
}

/// What the display needs from the automation host.
pub trait BreweryHost: Send + Sync + 'static {
    /// Current process state; called at least once per tick.
    fn snapshot(&self) -> Result<Snapshot, HostError>;

    fn notify(&self, notification: Notification);
}

/// Host state exported to a YAML or JSON file, re-read on every snapshot.
pub struct FileHost {
    path: PathBuf,
}

impl FileHost {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn parse(&self, text: &str) -> Result<Snapshot, HostError> {
        let is_json = self
            .path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let parsed = if is_json {
            serde_json::from_str(text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(text).map_err(|e| e.to_string())
        };
        parsed.map_err(|reason| HostError::Parse { path: self.path.clone(), reason })
    }
}

impl BreweryHost for FileHost {
    fn snapshot(&self) -> Result<Snapshot, HostError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| HostError::Io { path: self.path.clone(), source })?;
        self.parse(&text)
    }

    fn notify(&self, n: Notification) {
        match n.kind {
            NotificationKind::Info => info!("{}: {}", n.headline, n.message),
            NotificationKind::Warning => warn!("{}: {}", n.headline, n.message),
            NotificationKind::Danger => error!("{}: {}", n.headline, n.message),
        }
    }
}

/// In-process host; the snapshot can be swapped at any time and every
/// notification is kept for inspection.
#[derive(Default)]
pub struct StaticHost {
    snapshot: RwLock<Snapshot>,
    notifications: Mutex<Vec<Notification>>,
    offline: RwLock<Option<String>>,
}

impl StaticHost {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot: RwLock::new(snapshot), ..Default::default() }
    }

    pub fn update<F: FnOnce(&mut Snapshot)>(&self, f: F) {
        if let Ok(mut guard) = self.snapshot.write() {
            f(&mut guard);
        }
    }

    /// Make snapshot() fail with the given reason, None to recover.
    pub fn set_offline(&self, reason: Option<&str>) {
        if let Ok(mut guard) = self.offline.write() {
            *guard = reason.map(str::to_string);
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl BreweryHost for StaticHost {
    fn snapshot(&self) -> Result<Snapshot, HostError> {
        if let Some(reason) = self.offline.read().ok().and_then(|o| o.clone()) {
            return Err(HostError::Unavailable(reason));
        }
        self.snapshot
            .read()
            .map(|s| s.clone())
            .map_err(|_| HostError::Unavailable("snapshot lock poisoned".to_string()))
    }

    fn notify(&self, notification: Notification) {
        info!("notification: {}", notification.headline);
        if let Ok(mut list) = self.notifications.lock() {
            list.push(notification);
        }
    }
}
