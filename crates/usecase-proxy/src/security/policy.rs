use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Settings;

/// A single authorized use case from the access control list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCase {
    pub id: String,
    pub description: String,
}

/// Immutable view of the access control policy.
///
/// Built once from settings and replaced whole on reload; handlers never
/// observe a partially updated allowlist. The allowlist keeps configuration
/// order so rejection payloads mirror the configured list exactly.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    pub use_cases: Vec<UseCase>,
    pub case_sensitive: bool,
    pub require_header: bool,
    pub log_rejected: bool,
}

impl PolicySnapshot {
    pub fn from_settings(settings: &Settings) -> Self {
        let use_cases = settings
            .access_control
            .allowed_use_cases
            .iter()
            .map(|id| UseCase {
                id: id.clone(),
                description: settings
                    .access_control
                    .use_case_descriptions
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| format!("Use case {}", id)),
            })
            .collect();

        Self {
            use_cases,
            case_sensitive: settings.security.case_sensitive_matching,
            require_header: settings.security.require_use_case_header,
            log_rejected: settings.security.log_rejected_requests,
        }
    }

    /// Check an identifier against the allowlist under the configured
    /// matching mode.
    pub fn is_allowed(&self, use_case_id: &str) -> bool {
        if self.case_sensitive {
            self.use_cases.iter().any(|uc| uc.id == use_case_id)
        } else {
            let folded = use_case_id.to_lowercase();
            self.use_cases
                .iter()
                .any(|uc| uc.id.to_lowercase() == folded)
        }
    }

    pub fn description_of(&self, use_case_id: &str) -> String {
        let matches = |uc: &&UseCase| {
            if self.case_sensitive {
                uc.id == use_case_id
            } else {
                uc.id.to_lowercase() == use_case_id.to_lowercase()
            }
        };
        self.use_cases
            .iter()
            .find(matches)
            .map(|uc| uc.description.clone())
            .unwrap_or_else(|| format!("Use case {}", use_case_id))
    }

    pub fn allowed_ids(&self) -> Vec<String> {
        self.use_cases.iter().map(|uc| uc.id.clone()).collect()
    }
}

/// Shared handle to the active policy snapshot.
///
/// Readers clone an `Arc` to the current snapshot; reload swaps the `Arc`
/// whole. In-flight requests that already took a snapshot keep the old one.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    current: Arc<RwLock<Arc<PolicySnapshot>>>,
}

impl PolicyStore {
    pub fn new(snapshot: PolicySnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub async fn current(&self) -> Arc<PolicySnapshot> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: PolicySnapshot) {
        let mut guard = self.current.write().await;
        *guard = Arc::new(snapshot);
        info!(
            "Policy snapshot replaced: {} use cases",
            guard.use_cases.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessControlConfig, ProxyConfig, SecurityConfig};
    use std::collections::HashMap;

    fn settings(ids: &[&str], case_sensitive: bool) -> Settings {
        let mut descriptions = HashMap::new();
        descriptions.insert("100000".to_string(), "Primary client application".to_string());
        Settings {
            proxy: ProxyConfig {
                host: "0.0.0.0".to_string(),
                port: 8001,
                backend_url: "http://localhost:8002".to_string(),
                timeout_seconds: 30,
            },
            access_control: AccessControlConfig {
                allowed_use_cases: ids.iter().map(|s| s.to_string()).collect(),
                use_case_descriptions: descriptions,
            },
            security: SecurityConfig {
                require_use_case_header: true,
                case_sensitive_matching: case_sensitive,
                log_rejected_requests: true,
            },
        }
    }

    #[test]
    fn case_insensitive_matching() {
        let snapshot = PolicySnapshot::from_settings(&settings(&["abc"], false));
        assert!(snapshot.is_allowed("ABC"));
        assert!(snapshot.is_allowed("abc"));
        assert!(!snapshot.is_allowed("abcd"));
    }

    #[test]
    fn case_sensitive_matching() {
        let snapshot = PolicySnapshot::from_settings(&settings(&["abc"], true));
        assert!(!snapshot.is_allowed("ABC"));
        assert!(snapshot.is_allowed("abc"));
    }

    #[test]
    fn descriptions_fall_back_to_generic() {
        let snapshot = PolicySnapshot::from_settings(&settings(&["100000", "100050"], false));
        assert_eq!(
            snapshot.description_of("100000"),
            "Primary client application"
        );
        assert_eq!(snapshot.description_of("100050"), "Use case 100050");
    }

    #[test]
    fn allowed_ids_preserve_configured_order() {
        let snapshot =
            PolicySnapshot::from_settings(&settings(&["100050", "100000", "103366"], false));
        assert_eq!(snapshot.allowed_ids(), vec!["100050", "100000", "103366"]);
    }

    #[tokio::test]
    async fn reload_swaps_snapshot_atomically() {
        let store = PolicyStore::new(PolicySnapshot::from_settings(&settings(&["100000"], false)));
        let before = store.current().await;
        assert!(before.is_allowed("100000"));
        assert!(!before.is_allowed("100050"));

        store
            .replace(PolicySnapshot::from_settings(&settings(
                &["100000", "100050"],
                false,
            )))
            .await;

        // The very next read observes the new snapshot.
        let after = store.current().await;
        assert!(after.is_allowed("100050"));

        // Holders of the old snapshot still see the old allowlist.
        assert!(!before.is_allowed("100050"));
    }
}
