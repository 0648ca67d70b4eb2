use crate::proxy::Forwarder;
use crate::security::PolicyStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub policy: PolicyStore,
    pub forwarder: Forwarder,
    /// Config file base name the process started with; reload re-reads it.
    pub config_name: String,
}
