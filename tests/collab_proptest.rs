//! Property tests for the gallery collaborator reconciliation and product
//! ordering invariants. These run without a database.

use proptest::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

use artcorner::backend::galleries::collab::reconcile_collaborators;
use artcorner::backend::galleries::ordering::{normalize_positions, OrderedProduct};

fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    // a small id space so the sets actually overlap
    (0u128..20).prop_map(Uuid::from_u128)
}

fn id_vec() -> impl Strategy<Value = Vec<Uuid>> {
    prop::collection::vec(uuid_strategy(), 0..10)
}

fn disjoint_state() -> impl Strategy<Value = (Uuid, Vec<Uuid>, Vec<Uuid>)> {
    // owner, accepted, pending with the invariant the database maintains:
    // the three are pairwise disjoint
    (uuid_strategy(), id_vec(), id_vec()).prop_map(|(owner, accepted, pending)| {
        let mut seen = HashSet::new();
        seen.insert(owner);
        let accepted: Vec<Uuid> = accepted.into_iter().filter(|id| seen.insert(*id)).collect();
        let pending: Vec<Uuid> = pending.into_iter().filter(|id| seen.insert(*id)).collect();
        (owner, accepted, pending)
    })
}

proptest! {
    #[test]
    fn reconciliation_outputs_are_disjoint_and_exclude_owner(
        (owner, accepted, pending) in disjoint_state(),
        submitted in id_vec(),
    ) {
        let result = reconcile_collaborators(owner, &accepted, &pending, &submitted);

        let mut seen = HashSet::new();
        for id in result
            .kept_accepted
            .iter()
            .chain(&result.kept_pending)
            .chain(&result.invited)
            .chain(&result.withdrawn)
            .chain(&result.removed)
        {
            prop_assert_ne!(*id, owner);
            prop_assert!(seen.insert(*id), "id {} appeared in two outputs", id);
        }
    }

    #[test]
    fn reconciliation_accounts_for_every_current_member(
        (owner, accepted, pending) in disjoint_state(),
        submitted in id_vec(),
    ) {
        let result = reconcile_collaborators(owner, &accepted, &pending, &submitted);

        // every accepted id is either kept or removed, never dropped
        let kept: HashSet<Uuid> = result.kept_accepted.iter().copied().collect();
        let removed: HashSet<Uuid> = result.removed.iter().copied().collect();
        for id in &accepted {
            prop_assert!(kept.contains(id) ^ removed.contains(id));
        }

        // same for pending: kept pending or withdrawn
        let kept_pending: HashSet<Uuid> = result.kept_pending.iter().copied().collect();
        let withdrawn: HashSet<Uuid> = result.withdrawn.iter().copied().collect();
        for id in &pending {
            prop_assert!(kept_pending.contains(id) ^ withdrawn.contains(id));
        }
    }

    #[test]
    fn reconciliation_invites_only_new_ids(
        (owner, accepted, pending) in disjoint_state(),
        submitted in id_vec(),
    ) {
        let result = reconcile_collaborators(owner, &accepted, &pending, &submitted);

        let accepted_set: HashSet<Uuid> = accepted.iter().copied().collect();
        let pending_set: HashSet<Uuid> = pending.iter().copied().collect();
        for id in &result.invited {
            prop_assert!(!accepted_set.contains(id));
            prop_assert!(!pending_set.contains(id));
            prop_assert!(submitted.contains(id));
        }
    }

    #[test]
    fn normalized_positions_are_a_dense_permutation(
        entries in prop::collection::vec((0u128..50, -100i64..100), 0..20),
    ) {
        let submitted: Vec<OrderedProduct> = entries
            .into_iter()
            .map(|(id, position)| OrderedProduct {
                product_id: Uuid::from_u128(id),
                position,
            })
            .collect();

        let normalized = normalize_positions(&submitted);

        let positions: Vec<i64> = normalized.iter().map(|e| e.position).collect();
        let expected: Vec<i64> = (0..normalized.len() as i64).collect();
        prop_assert_eq!(positions, expected);

        // no duplicate products survive
        let unique: HashSet<Uuid> = normalized.iter().map(|e| e.product_id).collect();
        prop_assert_eq!(unique.len(), normalized.len());
    }

    #[test]
    fn normalization_is_idempotent(
        entries in prop::collection::vec((0u128..50, -100i64..100), 0..20),
    ) {
        let submitted: Vec<OrderedProduct> = entries
            .into_iter()
            .map(|(id, position)| OrderedProduct {
                product_id: Uuid::from_u128(id),
                position,
            })
            .collect();

        let once = normalize_positions(&submitted);
        let twice = normalize_positions(&once);
        prop_assert_eq!(once, twice);
    }
}
