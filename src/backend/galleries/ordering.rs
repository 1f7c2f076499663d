//! Gallery Product Ordering
//!
//! A gallery's products carry explicit positions. Whatever order values a
//! client submits, the stored positions must end up a dense permutation
//! `0..n`: sort by the submitted order (ties broken by submission order),
//! then reassign indices.

use uuid::Uuid;

/// One (product, order) pair as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedProduct {
    pub product_id: Uuid,
    pub position: i64,
}

/// Normalise submitted (product, order) pairs into dense positions
///
/// Duplicate product ids keep only their first occurrence.
pub fn normalize_positions(submitted: &[OrderedProduct]) -> Vec<OrderedProduct> {
    let mut deduped: Vec<OrderedProduct> = Vec::new();
    for entry in submitted {
        if !deduped.iter().any(|e| e.product_id == entry.product_id) {
            deduped.push(entry.clone());
        }
    }

    // stable sort keeps submission order for equal position values
    deduped.sort_by_key(|e| e.position);

    deduped
        .into_iter()
        .enumerate()
        .map(|(index, entry)| OrderedProduct {
            product_id: entry.product_id,
            position: index as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u128, position: i64) -> OrderedProduct {
        OrderedProduct {
            product_id: Uuid::from_u128(id),
            position,
        }
    }

    #[test]
    fn test_sparse_positions_become_dense() {
        let normalized = normalize_positions(&[entry(1, 10), entry(2, 3), entry(3, 7)]);
        let positions: Vec<i64> = normalized.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(normalized[0].product_id, Uuid::from_u128(2));
        assert_eq!(normalized[1].product_id, Uuid::from_u128(3));
        assert_eq!(normalized[2].product_id, Uuid::from_u128(1));
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let normalized = normalize_positions(&[entry(1, 0), entry(2, 0), entry(3, 0)]);
        let ids: Vec<Uuid> = normalized.iter().map(|e| e.product_id).collect();
        assert_eq!(
            ids,
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
    }

    #[test]
    fn test_duplicates_keep_first() {
        let normalized = normalize_positions(&[entry(1, 5), entry(1, 0), entry(2, 1)]);
        assert_eq!(normalized.len(), 2);
        // the duplicate's first occurrence (position 5) is the one that counts
        assert_eq!(normalized[0].product_id, Uuid::from_u128(2));
        assert_eq!(normalized[1].product_id, Uuid::from_u128(1));
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize_positions(&[]).is_empty());
    }

    #[test]
    fn test_negative_positions_allowed_in_input() {
        let normalized = normalize_positions(&[entry(1, -5), entry(2, 2)]);
        let positions: Vec<i64> = normalized.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }
}
