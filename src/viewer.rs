use anyhow::{Result, bail};
use std::path::Path;

use crate::content::{ContentRef, LocalContentResolver};
use crate::metadata::{MetadataBackend, NativeBackend};
use crate::permissions::{
    DENIED_MESSAGE, GateAction, GateOutcome, Permission, PermissionGate, PlatformVersion,
    SessionGrants,
};
use crate::picker::{DocumentPicker, select_content};
use crate::presenter::{MetadataPresenter, OutputBuffer};
use crate::service::ForegroundService;

/// State of the single viewer screen.
///
/// Ties the permission gate, the foreground service, the content resolver and
/// the output buffer together. Front ends drive it with user events:
///
/// 1. [`start`](Self::start) when the screen opens
/// 2. [`answer_permissions`](Self::answer_permissions) when the user answers a request
/// 3. [`pick`](Self::pick) / [`show`](Self::show) for each selected file
pub struct Viewer<B: MetadataBackend = NativeBackend> {
    gate: PermissionGate,
    grants: SessionGrants,
    service: ForegroundService,
    resolver: LocalContentResolver,
    backend: B,
    output: OutputBuffer,
}

impl Viewer<NativeBackend> {
    pub fn new(version: PlatformVersion) -> Self {
        Self::with_backend(version, NativeBackend)
    }
}

impl<B: MetadataBackend> Viewer<B> {
    pub fn with_backend(version: PlatformVersion, backend: B) -> Self {
        Self {
            gate: PermissionGate::new(version),
            grants: SessionGrants::default(),
            service: ForegroundService::new(),
            resolver: LocalContentResolver::new(),
            backend,
            output: OutputBuffer::new(),
        }
    }

    /// Check permissions. Starts the service right away if nothing is missing.
    pub fn start(&mut self) -> Result<GateAction> {
        let action = self.gate.begin(&self.grants)?;
        if action == GateAction::Proceed {
            self.service.start()?;
        }
        Ok(action)
    }

    /// Deliver the user's answers to the outstanding permission request.
    pub fn answer_permissions(&mut self, results: &[(Permission, bool)]) -> Result<GateOutcome> {
        let outcome = self.gate.on_result(results)?;
        self.grants.record(results);
        match outcome {
            GateOutcome::Granted => self.service.start()?,
            GateOutcome::Denied => self.output.set_notice(DENIED_MESSAGE),
        }
        Ok(outcome)
    }

    /// Permissions still waiting for an answer, if a request is outstanding.
    pub fn pending_permissions(&self) -> Option<&[Permission]> {
        self.gate.pending()
    }

    /// Whether the user may pick files.
    pub fn can_pick(&self) -> bool {
        self.gate.outcome() == Some(GateOutcome::Granted)
    }

    pub fn service_running(&self) -> bool {
        self.service.is_running()
    }

    /// Let the user pick a file and show its metadata.
    ///
    /// Returns `false` if the pick was cancelled; the output is left as is.
    pub fn pick(&mut self, picker: &mut dyn DocumentPicker) -> Result<bool> {
        if !self.can_pick() {
            bail!("Permissions not granted");
        }
        match select_content(picker, &mut self.resolver)? {
            Some(uri) => {
                self.show(&uri);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Register a local file and issue a content reference for it.
    pub fn grant(&mut self, path: &Path) -> Result<ContentRef> {
        self.resolver.grant(path)
    }

    /// Replace the output with the metadata of `uri`.
    pub fn show(&mut self, uri: &ContentRef) {
        MetadataPresenter::new(&self.resolver, &self.backend).display(uri, &mut self.output);
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }
}
