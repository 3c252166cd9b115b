use anyhow::{bail, Result};
use std::collections::HashSet;
use std::fmt;

/// First API level that splits storage access into per-media permissions.
pub const GRANULAR_MEDIA_API_LEVEL: u32 = 33;

/// Message shown when the user refuses any requested permission.
pub const DENIED_MESSAGE: &str = "Permissions denied. App won't work.";

/// A runtime permission the viewer may need before it can read media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadMediaImages,
    ReadMediaVideo,
    ReadMediaAudio,
    PostNotifications,
    ReadExternalStorage,
}

impl Permission {
    /// Stable identifier, as the host platform names it.
    pub fn id(self) -> &'static str {
        match self {
            Self::ReadMediaImages => "READ_MEDIA_IMAGES",
            Self::ReadMediaVideo => "READ_MEDIA_VIDEO",
            Self::ReadMediaAudio => "READ_MEDIA_AUDIO",
            Self::PostNotifications => "POST_NOTIFICATIONS",
            Self::ReadExternalStorage => "READ_EXTERNAL_STORAGE",
        }
    }

    /// Short human-readable explanation for the permission prompt.
    pub fn description(self) -> &'static str {
        match self {
            Self::ReadMediaImages => "Read images",
            Self::ReadMediaVideo => "Read videos",
            Self::ReadMediaAudio => "Read audio files",
            Self::PostNotifications => "Show notifications",
            Self::ReadExternalStorage => "Read shared storage",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which permission model the host platform uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformVersion {
    /// One broad storage-read permission covers all media.
    Legacy,
    /// Separate image/video/audio read permissions plus notifications.
    Granular,
}

impl PlatformVersion {
    pub fn from_api_level(level: u32) -> Self {
        if level >= GRANULAR_MEDIA_API_LEVEL {
            Self::Granular
        } else {
            Self::Legacy
        }
    }

    /// Resolve the platform version, preferring an explicit API level override.
    pub fn detect(api_level_override: Option<u32>) -> Self {
        match api_level_override.or_else(host_api_level) {
            Some(level) => Self::from_api_level(level),
            None => Self::Granular,
        }
    }
}

#[cfg(target_os = "android")]
fn host_api_level() -> Option<u32> {
    let output = std::process::Command::new("getprop")
        .arg("ro.build.version.sdk")
        .output()
        .ok()?;
    String::from_utf8_lossy(&output.stdout).trim().parse().ok()
}

#[cfg(not(target_os = "android"))]
fn host_api_level() -> Option<u32> {
    None
}

const GRANULAR_PERMISSIONS: &[Permission] = &[
    Permission::ReadMediaImages,
    Permission::ReadMediaVideo,
    Permission::ReadMediaAudio,
    Permission::PostNotifications,
];

const LEGACY_PERMISSIONS: &[Permission] = &[Permission::ReadExternalStorage];

/// The fixed permission set a platform version requires, in request order.
pub fn required_permissions(version: PlatformVersion) -> &'static [Permission] {
    match version {
        PlatformVersion::Granular => GRANULAR_PERMISSIONS,
        PlatformVersion::Legacy => LEGACY_PERMISSIONS,
    }
}

/// Current grant state of permissions.
pub trait PermissionChecker {
    fn is_granted(&self, permission: Permission) -> bool;
}

/// Grants held in memory for the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionGrants {
    granted: HashSet<Permission>,
}

impl SessionGrants {
    pub fn grant(&mut self, permission: Permission) {
        self.granted.insert(permission);
    }

    /// Apply the answers of a permission request.
    pub fn record(&mut self, results: &[(Permission, bool)]) {
        for &(permission, granted) in results {
            if granted {
                self.granted.insert(permission);
            } else {
                self.granted.remove(&permission);
            }
        }
    }
}

impl PermissionChecker for SessionGrants {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }
}

/// What the front end must do after [`PermissionGate::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Everything is already granted.
    Proceed,
    /// Ask the user for these permissions as one batch.
    Request(Vec<Permission>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Idle,
    AwaitingResult(Vec<Permission>),
    Resolved(GateOutcome),
}

/// Two-state permission workflow: a request is issued, then resolved exactly once.
///
/// ```rust
/// use exif_viewer::permissions::*;
///
/// let mut gate = PermissionGate::new(PlatformVersion::Legacy);
/// let grants = SessionGrants::default();
///
/// let action = gate.begin(&grants).unwrap();
/// assert_eq!(action, GateAction::Request(vec![Permission::ReadExternalStorage]));
///
/// let outcome = gate.on_result(&[(Permission::ReadExternalStorage, true)]).unwrap();
/// assert_eq!(outcome, GateOutcome::Granted);
/// ```
#[derive(Debug)]
pub struct PermissionGate {
    version: PlatformVersion,
    state: GateState,
}

impl PermissionGate {
    pub fn new(version: PlatformVersion) -> Self {
        Self {
            version,
            state: GateState::Idle,
        }
    }

    /// Start (or restart) the flow. Only permissions not yet granted are requested.
    pub fn begin(&mut self, checker: &dyn PermissionChecker) -> Result<GateAction> {
        if let GateState::AwaitingResult(_) = self.state {
            bail!("A permission request is already awaiting its result");
        }

        let missing: Vec<Permission> = required_permissions(self.version)
            .iter()
            .copied()
            .filter(|p| !checker.is_granted(*p))
            .collect();

        if missing.is_empty() {
            log::debug!("All permissions already granted");
            self.state = GateState::Resolved(GateOutcome::Granted);
            return Ok(GateAction::Proceed);
        }

        log::info!(
            "Requesting permissions: {}",
            missing.iter().map(|p| p.id()).collect::<Vec<_>>().join(", ")
        );
        self.state = GateState::AwaitingResult(missing.clone());
        Ok(GateAction::Request(missing))
    }

    /// Resolve the outstanding request with the user's answers.
    pub fn on_result(&mut self, results: &[(Permission, bool)]) -> Result<GateOutcome> {
        let requested = match &self.state {
            GateState::AwaitingResult(requested) => requested,
            _ => bail!("No permission request is awaiting a result"),
        };

        let all_granted = requested.iter().all(|p| {
            results
                .iter()
                .any(|(answered, granted)| answered == p && *granted)
        }) && results.iter().all(|(_, granted)| *granted);

        let outcome = if all_granted {
            GateOutcome::Granted
        } else {
            GateOutcome::Denied
        };
        log::info!("Permission request resolved: {outcome:?}");
        self.state = GateState::Resolved(outcome);
        Ok(outcome)
    }

    pub fn outcome(&self) -> Option<GateOutcome> {
        match self.state {
            GateState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&[Permission]> {
        match &self.state {
            GateState::AwaitingResult(requested) => Some(requested),
            _ => None,
        }
    }
}
