//! Comment Thread Assembly
//!
//! Storage allows replies to replies (creation performs no depth check),
//! but display is a single-level tree: true top-level comments are
//! promoted, and every other comment hangs off its nearest ancestor that is
//! itself top-level. Deeper chains collapse instead of nesting further;
//! comments whose parent chain never reaches a known top-level comment are
//! dropped from the result.

use std::collections::HashMap;
use uuid::Uuid;

use super::models::Comment;

/// A top-level comment with its collapsed replies
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Build the display tree from a resource's flat comment list
pub fn assemble_thread(comments: Vec<Comment>) -> Vec<CommentNode> {
    let parent_of: HashMap<Uuid, Option<Uuid>> =
        comments.iter().map(|c| (c.id, c.parent_id)).collect();

    let mut nodes: Vec<CommentNode> = Vec::new();
    let mut node_index: HashMap<Uuid, usize> = HashMap::new();

    for comment in comments.iter().filter(|c| c.parent_id.is_none()) {
        node_index.insert(comment.id, nodes.len());
        nodes.push(CommentNode {
            comment: comment.clone(),
            replies: Vec::new(),
        });
    }

    for comment in comments.into_iter().filter(|c| c.parent_id.is_some()) {
        if let Some(root) = nearest_top_level(comment.parent_id, &parent_of) {
            if let Some(&index) = node_index.get(&root) {
                nodes[index].replies.push(comment);
            }
        }
    }

    nodes
}

/// Walk the parent chain until a top-level comment; `None` when the chain
/// leaves the known set (orphan) or cycles
fn nearest_top_level(
    mut current: Option<Uuid>,
    parent_of: &HashMap<Uuid, Option<Uuid>>,
) -> Option<Uuid> {
    let mut hops = 0;
    while let Some(id) = current {
        match parent_of.get(&id) {
            Some(None) => return Some(id),
            Some(&parent) => {
                current = parent;
                hops += 1;
                if hops > parent_of.len() {
                    // cycle guard; cannot happen through the API but the
                    // storage layer does not forbid it
                    return None;
                }
            }
            None => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ResourceKind;
    use chrono::Utc;

    fn comment(id: u128, parent: Option<u128>) -> Comment {
        Comment {
            id: Uuid::from_u128(id),
            author_id: Uuid::from_u128(1000),
            resource_kind: ResourceKind::Product,
            resource_id: Uuid::from_u128(2000),
            parent_id: parent.map(Uuid::from_u128),
            content: format!("comment {}", id),
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_top_level_promoted_in_order() {
        let nodes = assemble_thread(vec![comment(1, None), comment(2, None)]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].comment.id, Uuid::from_u128(1));
        assert_eq!(nodes[1].comment.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_direct_replies_nest_one_level() {
        let nodes = assemble_thread(vec![comment(1, None), comment(2, Some(1))]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].replies.len(), 1);
        assert_eq!(nodes[0].replies[0].id, Uuid::from_u128(2));
    }

    #[test]
    fn test_deep_chain_collapses_to_root() {
        // 1 <- 2 <- 3 <- 4: all of 2,3,4 land directly under 1
        let nodes = assemble_thread(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
        ]);
        assert_eq!(nodes.len(), 1);
        let reply_ids: Vec<Uuid> = nodes[0].replies.iter().map(|c| c.id).collect();
        assert_eq!(
            reply_ids,
            vec![Uuid::from_u128(2), Uuid::from_u128(3), Uuid::from_u128(4)]
        );
    }

    #[test]
    fn test_orphan_is_dropped() {
        // parent 99 is not in the set
        let nodes = assemble_thread(vec![comment(1, None), comment(2, Some(99))]);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].replies.is_empty());
    }

    #[test]
    fn test_orphaned_grandchild_of_deleted_parent() {
        // 3's parent 2 was deleted; 3 cannot reach a root and disappears
        let nodes = assemble_thread(vec![comment(1, None), comment(3, Some(2))]);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].replies.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble_thread(vec![]).is_empty());
    }
}
