//! Host Notifier
//!
//! Best-effort bridge to a host surface (the Mini App main button in the
//! original game). Failures are swallowed and never block core logic.

use tracing::debug;

/// Capability for surfacing game state on a host UI.
pub trait HostNotifier: Send + Sync {
    /// Signal the host that the game is ready.
    fn ready(&self) {}

    /// Show the current balance on the host's main button.
    fn show_balance(&self, _balance: f64) {}
}

/// Default notifier: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl HostNotifier for NoopNotifier {}

/// Notifier that mirrors the host button into the log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceNotifier;

impl HostNotifier for TraceNotifier {
    fn ready(&self) {
        debug!("Host bridge ready");
    }

    fn show_balance(&self, balance: f64) {
        debug!("Main button: Balance: {:.2}$", balance);
    }
}
