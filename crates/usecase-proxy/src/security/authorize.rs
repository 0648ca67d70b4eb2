use crate::security::policy::PolicySnapshot;
use crate::utils::error::ApiError;

/// Outcome of a successful authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUseCase {
    pub id: String,
    pub description: String,
}

/// Decide whether a request carrying `use_case_id` may pass.
///
/// Pure function over the snapshot so the decision matrix is unit-testable
/// without a router. Rejections carry the full current allowlist so callers
/// can self-correct.
pub fn authorize(
    snapshot: &PolicySnapshot,
    use_case_id: Option<&str>,
) -> Result<AuthorizedUseCase, ApiError> {
    let use_case_id = match use_case_id {
        Some(id) => id,
        None => {
            if snapshot.require_header {
                return Err(ApiError::MissingHeader);
            }
            // Header optional and absent: pass through anonymously.
            return Ok(AuthorizedUseCase {
                id: String::new(),
                description: String::new(),
            });
        }
    };

    if !snapshot.is_allowed(use_case_id) {
        return Err(ApiError::UnauthorizedUseCase {
            use_case_id: use_case_id.to_string(),
            allowed: snapshot.allowed_ids(),
        });
    }

    Ok(AuthorizedUseCase {
        id: use_case_id.to_string(),
        description: snapshot.description_of(use_case_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::policy::UseCase;

    fn snapshot(ids: &[&str], case_sensitive: bool, require_header: bool) -> PolicySnapshot {
        PolicySnapshot {
            use_cases: ids
                .iter()
                .map(|id| UseCase {
                    id: id.to_string(),
                    description: format!("Use case {}", id),
                })
                .collect(),
            case_sensitive,
            require_header,
            log_rejected: true,
        }
    }

    #[test]
    fn missing_header_rejected_when_required() {
        let result = authorize(&snapshot(&["100000"], false, true), None);
        assert!(matches!(result, Err(ApiError::MissingHeader)));
    }

    #[test]
    fn missing_header_passes_when_not_required() {
        let result = authorize(&snapshot(&["100000"], false, false), None);
        assert!(result.is_ok());
    }

    #[test]
    fn unknown_id_rejected_with_full_allowlist() {
        let result = authorize(&snapshot(&["100000", "100050"], false, true), Some("hacker"));
        match result {
            Err(ApiError::UnauthorizedUseCase {
                use_case_id,
                allowed,
            }) => {
                assert_eq!(use_case_id, "hacker");
                assert_eq!(allowed, vec!["100000", "100050"]);
            }
            other => panic!("expected UnauthorizedUseCase, got {:?}", other),
        }
    }

    #[test]
    fn allowed_id_passes_with_description() {
        let result = authorize(&snapshot(&["100000"], false, true), Some("100000")).unwrap();
        assert_eq!(result.id, "100000");
        assert_eq!(result.description, "Use case 100000");
    }

    #[test]
    fn case_folding_follows_matching_mode() {
        assert!(authorize(&snapshot(&["abc"], false, true), Some("ABC")).is_ok());
        assert!(matches!(
            authorize(&snapshot(&["abc"], true, true), Some("ABC")),
            Err(ApiError::UnauthorizedUseCase { .. })
        ));
    }

    #[test]
    fn unknown_id_rejected_even_when_header_optional() {
        let result = authorize(&snapshot(&["100000"], false, false), Some("hacker"));
        assert!(matches!(
            result,
            Err(ApiError::UnauthorizedUseCase { .. })
        ));
    }
}
