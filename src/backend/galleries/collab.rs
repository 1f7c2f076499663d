//! Collaborator Reconciliation
//!
//! A gallery's people form a three-way partition: the owner, accepted
//! collaborators, and pending invitees. When the owner submits a new
//! desired collaborator list, [`reconcile_collaborators`] computes which
//! memberships stay, which invites are new, and which are withdrawn or
//! removed — the handler applies the result and emits the matching events.
//!
//! Invariant: the owner never appears in any output set, the output sets
//! are pairwise disjoint, and every output id comes from either the
//! submitted list or the current state.

use std::collections::HashSet;
use uuid::Uuid;

/// Outcome of reconciling the submitted list against current state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Accepted collaborators that stay accepted (no re-notification)
    pub kept_accepted: Vec<Uuid>,
    /// Pending invitees that stay pending (re-notified only if their
    /// original invite notification is gone or seen)
    pub kept_pending: Vec<Uuid>,
    /// Ids in neither set: newly invited
    pub invited: Vec<Uuid>,
    /// Pending invitees dropped from the list: invite withdrawn
    pub withdrawn: Vec<Uuid>,
    /// Accepted collaborators dropped from the list: removed
    pub removed: Vec<Uuid>,
}

/// Reconcile the owner's submitted collaborator list
///
/// The owner's own id is silently dropped from the submitted list, as are
/// duplicates; order within each output follows the submitted (or current)
/// order.
pub fn reconcile_collaborators(
    owner: Uuid,
    accepted: &[Uuid],
    pending: &[Uuid],
    submitted: &[Uuid],
) -> Reconciliation {
    let mut submitted_set = HashSet::new();
    let mut submitted_clean = Vec::new();
    for &id in submitted {
        if id == owner {
            continue;
        }
        if submitted_set.insert(id) {
            submitted_clean.push(id);
        }
    }

    let accepted_set: HashSet<Uuid> = accepted.iter().copied().collect();
    let pending_set: HashSet<Uuid> = pending.iter().copied().collect();

    let mut result = Reconciliation::default();

    for &id in &submitted_clean {
        if accepted_set.contains(&id) {
            result.kept_accepted.push(id);
        } else if pending_set.contains(&id) {
            result.kept_pending.push(id);
        } else {
            result.invited.push(id);
        }
    }

    for &id in accepted {
        if !submitted_set.contains(&id) {
            result.removed.push(id);
        }
    }

    for &id in pending {
        if !submitted_set.contains(&id) {
            result.withdrawn.push(id);
        }
    }

    result
}

/// Coerce a raw `collaborators` payload value into a list of user ids
///
/// Malformed payloads are not rejected: anything that is not an array
/// collapses to the empty list, and non-UUID entries are skipped. Returns
/// the ids plus whether anything had to be discarded (for logging).
pub fn coerce_collaborator_ids(value: &serde_json::Value) -> (Vec<Uuid>, bool) {
    let entries = match value.as_array() {
        Some(entries) => entries,
        None => return (Vec::new(), !value.is_null()),
    };

    let mut ids = Vec::new();
    let mut malformed = false;
    for entry in entries {
        match entry.as_str().and_then(|s| Uuid::parse_str(s).ok()) {
            Some(id) => ids.push(id),
            None => malformed = true,
        }
    }
    (ids, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|i| Uuid::from_u128(i as u128 + 1)).collect()
    }

    #[test]
    fn test_mixed_submission_partitions_correctly() {
        // current: accepted=[A], pending=[C]; submitted=[A, B]
        let owner = Uuid::from_u128(100);
        let v = ids(3);
        let (a, b, c) = (v[0], v[1], v[2]);

        let result = reconcile_collaborators(owner, &[a], &[c], &[a, b]);

        assert_eq!(result.kept_accepted, vec![a]);
        assert_eq!(result.invited, vec![b]);
        assert_eq!(result.withdrawn, vec![c]);
        assert_eq!(result.kept_pending, Vec::<Uuid>::new());
        assert_eq!(result.removed, Vec::<Uuid>::new());
    }

    #[test]
    fn test_owner_is_silently_dropped() {
        let owner = Uuid::from_u128(100);
        let result = reconcile_collaborators(owner, &[], &[], &[owner]);
        assert_eq!(result, Reconciliation::default());
    }

    #[test]
    fn test_duplicates_collapse() {
        let owner = Uuid::from_u128(100);
        let b = Uuid::from_u128(2);
        let result = reconcile_collaborators(owner, &[], &[], &[b, b, b]);
        assert_eq!(result.invited, vec![b]);
    }

    #[test]
    fn test_empty_submission_clears_everything() {
        let owner = Uuid::from_u128(100);
        let v = ids(4);
        let result = reconcile_collaborators(owner, &v[..2], &v[2..], &[]);
        assert_eq!(result.removed, v[..2].to_vec());
        assert_eq!(result.withdrawn, v[2..].to_vec());
        assert!(result.invited.is_empty());
    }

    #[test]
    fn test_pending_stays_pending() {
        let owner = Uuid::from_u128(100);
        let c = Uuid::from_u128(3);
        let result = reconcile_collaborators(owner, &[], &[c], &[c]);
        assert_eq!(result.kept_pending, vec![c]);
        assert!(result.withdrawn.is_empty());
        assert!(result.invited.is_empty());
    }

    #[test]
    fn test_outputs_are_disjoint() {
        let owner = Uuid::from_u128(100);
        let v = ids(6);
        let result =
            reconcile_collaborators(owner, &v[..2], &v[2..4], &[v[0], v[2], v[4], v[5]]);

        let mut seen = std::collections::HashSet::new();
        for id in result
            .kept_accepted
            .iter()
            .chain(&result.kept_pending)
            .chain(&result.invited)
            .chain(&result.withdrawn)
            .chain(&result.removed)
        {
            assert!(seen.insert(*id), "{} appeared twice", id);
            assert_ne!(*id, owner);
        }
    }

    #[test]
    fn test_coerce_valid_array() {
        let a = Uuid::new_v4();
        let value = serde_json::json!([a.to_string()]);
        let (ids, malformed) = coerce_collaborator_ids(&value);
        assert_eq!(ids, vec![a]);
        assert!(!malformed);
    }

    #[test]
    fn test_coerce_non_array_to_empty() {
        let (ids, malformed) = coerce_collaborator_ids(&serde_json::json!("not-a-list"));
        assert!(ids.is_empty());
        assert!(malformed);

        let (ids, malformed) = coerce_collaborator_ids(&serde_json::json!({"a": 1}));
        assert!(ids.is_empty());
        assert!(malformed);
    }

    #[test]
    fn test_coerce_skips_bad_entries() {
        let a = Uuid::new_v4();
        let value = serde_json::json!([a.to_string(), "garbage", 42]);
        let (ids, malformed) = coerce_collaborator_ids(&value);
        assert_eq!(ids, vec![a]);
        assert!(malformed);
    }

    #[test]
    fn test_coerce_null_is_clean_empty() {
        let (ids, malformed) = coerce_collaborator_ids(&serde_json::Value::Null);
        assert!(ids.is_empty());
        assert!(!malformed);
    }
}
