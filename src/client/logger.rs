use crate::types::constants::LOG_TARGET;
use std::fmt::Arguments;

/// Diagnostic output gate for one client.
///
/// Enabled until an `init` payload says otherwise. Each `init` attempt applies
/// its `enableLogging` flag; once one succeeds the flag is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeLogger {
    enabled: bool,
}

impl BridgeLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn debug(&self, message: Arguments<'_>) {
        if self.enabled {
            tracing::debug!(target: LOG_TARGET, "{}", message);
        }
    }

    pub fn warn(&self, message: Arguments<'_>) {
        if self.enabled {
            tracing::warn!(target: LOG_TARGET, "{}", message);
        }
    }

    pub fn error(&self, message: Arguments<'_>) {
        if self.enabled {
            tracing::error!(target: LOG_TARGET, "{}", message);
        }
    }
}

impl Default for BridgeLogger {
    fn default() -> Self {
        Self::new(true)
    }
}
