//! Observable lock screen state types.
//!
//! Device state the lock screen displays but does not interpret. Formatting
//! it into status-bar text is the presentation layer's job.

/// Connectivity state shown on the lock screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityState {
    /// Airplane mode is on
    pub airplane_mode: bool,
    /// Carrier network name. `None` when not registered.
    pub carrier: Option<String>,
    /// Only emergency calls are possible
    pub emergency_calls_only: bool,
}

impl ConnectivityState {
    /// Whether calls other than emergency calls can be placed.
    pub fn has_service(&self) -> bool {
        !self.airplane_mode && !self.emergency_calls_only && self.carrier.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_requires_carrier_outside_airplane_mode() {
        let mut state = ConnectivityState { carrier: Some("Carrier".into()), ..Default::default() };
        assert!(state.has_service());

        state.airplane_mode = true;
        assert!(!state.has_service());

        assert!(!ConnectivityState::default().has_service());
    }
}
