//! Outbox Consumer
//!
//! Maps a [`DomainEvent`] to the notification and audit records it entails.
//! `plan` is a pure function so the fan-out rules are testable on their
//! own; `apply` pushes a plan through the pool.

use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::audit;
use crate::backend::notifications::db as notifications_db;
use crate::backend::outbox::events::DomainEvent;
use crate::shared::ResourceKind;

/// Notification kinds as stored in the `kind` column
pub mod kinds {
    pub const GALLERY_INVITE: &str = "gallery_invite";
    pub const GALLERY_INVITE_WITHDRAWN: &str = "gallery_invite_withdrawn";
    pub const GALLERY_COLLABORATOR_REMOVED: &str = "gallery_collaborator_removed";
    pub const GALLERY_INVITE_ACCEPTED: &str = "gallery_invite_accepted";
    pub const GALLERY_INVITE_DECLINED: &str = "gallery_invite_declined";
    pub const FAVORITE: &str = "favorite";
    pub const COMMENT: &str = "comment";
    pub const REPLY: &str = "reply";
    pub const ORDER_PLACED: &str = "order_placed";
    pub const ORDER_STATUS: &str = "order_status";
    pub const REVIEW: &str = "review";
    pub const REPORT_RESOLVED: &str = "report_resolved";
    pub const PRODUCT_REMOVED: &str = "product_removed";
}

/// A notification row to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub user_id: Uuid,
    pub kind: &'static str,
    pub message: String,
    pub link: Option<String>,
    pub meta: serde_json::Value,
}

/// Existing notifications to delete, matched on owner, optional kind, and
/// meta containment
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRemoval {
    pub user_id: Uuid,
    pub kind: Option<&'static str>,
    pub meta: serde_json::Value,
}

/// An audit row to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub action: &'static str,
    pub performed_by: Option<Uuid>,
    pub target_kind: Option<ResourceKind>,
    pub target_id: Option<Uuid>,
    pub details: String,
}

/// Everything one event entails
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectPlan {
    pub notifications: Vec<NotificationDraft>,
    pub removals: Vec<NotificationRemoval>,
    pub audits: Vec<AuditDraft>,
}

fn gallery_meta(gallery_id: Uuid) -> serde_json::Value {
    serde_json::json!({ "gallery_id": gallery_id.to_string() })
}

fn gallery_link(gallery_id: Uuid) -> Option<String> {
    Some(format!("/galleries/{}", gallery_id))
}

/// Compute the effect plan for one event
pub fn plan(event: &DomainEvent) -> EffectPlan {
    let mut out = EffectPlan::default();

    match event {
        DomainEvent::CollaboratorInvited {
            gallery_id,
            gallery_title,
            owner_name,
            invitee_id,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *invitee_id,
                kind: kinds::GALLERY_INVITE,
                message: format!(
                    "{} invited you to collaborate on '{}'",
                    owner_name, gallery_title
                ),
                link: gallery_link(*gallery_id),
                meta: gallery_meta(*gallery_id),
            });
        }

        DomainEvent::InviteWithdrawn {
            gallery_id,
            gallery_title,
            invitee_id,
        } => {
            // the stale invite disappears before the withdrawal notice lands
            out.removals.push(NotificationRemoval {
                user_id: *invitee_id,
                kind: Some(kinds::GALLERY_INVITE),
                meta: gallery_meta(*gallery_id),
            });
            out.notifications.push(NotificationDraft {
                user_id: *invitee_id,
                kind: kinds::GALLERY_INVITE_WITHDRAWN,
                message: format!("Your invite to '{}' was withdrawn", gallery_title),
                link: None,
                meta: gallery_meta(*gallery_id),
            });
        }

        DomainEvent::CollaboratorRemoved {
            gallery_id,
            gallery_title,
            user_id,
        } => {
            out.removals.push(NotificationRemoval {
                user_id: *user_id,
                kind: None,
                meta: gallery_meta(*gallery_id),
            });
            out.notifications.push(NotificationDraft {
                user_id: *user_id,
                kind: kinds::GALLERY_COLLABORATOR_REMOVED,
                message: format!("You were removed as a collaborator on '{}'", gallery_title),
                link: None,
                meta: gallery_meta(*gallery_id),
            });
        }

        DomainEvent::InviteAccepted {
            gallery_id,
            gallery_title,
            owner_id,
            collaborator_name,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *owner_id,
                kind: kinds::GALLERY_INVITE_ACCEPTED,
                message: format!(
                    "{} accepted your invite to '{}'",
                    collaborator_name, gallery_title
                ),
                link: gallery_link(*gallery_id),
                meta: gallery_meta(*gallery_id),
            });
        }

        DomainEvent::InviteDeclined {
            gallery_id,
            gallery_title,
            owner_id,
            invitee_name,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *owner_id,
                kind: kinds::GALLERY_INVITE_DECLINED,
                message: format!(
                    "{} declined your invite to '{}'",
                    invitee_name, gallery_title
                ),
                link: gallery_link(*gallery_id),
                meta: gallery_meta(*gallery_id),
            });
        }

        DomainEvent::FavoriteAdded {
            actor_id,
            actor_name,
            owner_id,
            resource_kind,
            resource_id,
            resource_title,
        } => {
            // owners favouriting their own work stay silent
            if actor_id != owner_id {
                out.notifications.push(NotificationDraft {
                    user_id: *owner_id,
                    kind: kinds::FAVORITE,
                    message: format!("{} favourited '{}'", actor_name, resource_title),
                    link: Some(format!("/{}s/{}", resource_kind.as_str(), resource_id)),
                    meta: serde_json::json!({
                        "resource_kind": resource_kind.as_str(),
                        "resource_id": resource_id.to_string(),
                    }),
                });
            }
        }

        DomainEvent::CommentPosted {
            author_id,
            author_name,
            resource_kind,
            resource_id,
            resource_owner_id,
            comment_id,
        } => {
            if author_id != resource_owner_id {
                out.notifications.push(NotificationDraft {
                    user_id: *resource_owner_id,
                    kind: kinds::COMMENT,
                    message: format!("{} commented on your {}", author_name, resource_kind.as_str()),
                    link: Some(format!("/{}s/{}", resource_kind.as_str(), resource_id)),
                    meta: serde_json::json!({
                        "resource_kind": resource_kind.as_str(),
                        "resource_id": resource_id.to_string(),
                        "comment_id": comment_id.to_string(),
                    }),
                });
            }
        }

        DomainEvent::ReplyPosted {
            author_id,
            author_name,
            parent_author_id,
            resource_kind,
            resource_id,
            comment_id,
        } => {
            if author_id != parent_author_id {
                out.notifications.push(NotificationDraft {
                    user_id: *parent_author_id,
                    kind: kinds::REPLY,
                    message: format!("{} replied to your comment", author_name),
                    link: Some(format!("/{}s/{}", resource_kind.as_str(), resource_id)),
                    meta: serde_json::json!({
                        "resource_kind": resource_kind.as_str(),
                        "resource_id": resource_id.to_string(),
                        "comment_id": comment_id.to_string(),
                    }),
                });
            }
        }

        DomainEvent::OrderPlaced {
            order_id,
            buyer_id,
            total_cents,
            item_count,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *buyer_id,
                kind: kinds::ORDER_PLACED,
                message: format!(
                    "Your order of {} item(s) was placed",
                    item_count
                ),
                link: Some(format!("/orders/{}", order_id)),
                meta: serde_json::json!({ "order_id": order_id.to_string() }),
            });
            out.audits.push(AuditDraft {
                action: "order.placed",
                performed_by: Some(*buyer_id),
                target_kind: None,
                target_id: Some(*order_id),
                details: format!("{} item(s), total {} cents", item_count, total_cents),
            });
        }

        DomainEvent::OrderStatusChanged {
            order_id,
            buyer_id,
            status,
            changed_by,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *buyer_id,
                kind: kinds::ORDER_STATUS,
                message: format!("Your order is now {}", status),
                link: Some(format!("/orders/{}", order_id)),
                meta: serde_json::json!({ "order_id": order_id.to_string() }),
            });
            out.audits.push(AuditDraft {
                action: "order.status_changed",
                performed_by: Some(*changed_by),
                target_kind: None,
                target_id: Some(*order_id),
                details: format!("status set to {}", status),
            });
        }

        DomainEvent::ReviewPosted {
            product_id,
            product_title,
            product_owner_id,
            reviewer_id,
            reviewer_name,
            rating,
        } => {
            if reviewer_id != product_owner_id {
                out.notifications.push(NotificationDraft {
                    user_id: *product_owner_id,
                    kind: kinds::REVIEW,
                    message: format!(
                        "{} rated '{}' {} out of 5",
                        reviewer_name, product_title, rating
                    ),
                    link: Some(format!("/products/{}", product_id)),
                    meta: serde_json::json!({ "product_id": product_id.to_string() }),
                });
            }
        }

        DomainEvent::UserBlocked {
            admin_id,
            user_id,
            username,
        } => {
            out.audits.push(AuditDraft {
                action: "user.blocked",
                performed_by: Some(*admin_id),
                target_kind: Some(ResourceKind::User),
                target_id: Some(*user_id),
                details: format!("blocked {}", username),
            });
        }

        DomainEvent::UserUnblocked {
            admin_id,
            user_id,
            username,
        } => {
            out.audits.push(AuditDraft {
                action: "user.unblocked",
                performed_by: Some(*admin_id),
                target_kind: Some(ResourceKind::User),
                target_id: Some(*user_id),
                details: format!("unblocked {}", username),
            });
        }

        DomainEvent::UserDeleted {
            admin_id,
            user_id,
            username,
        } => {
            out.audits.push(AuditDraft {
                action: "user.deleted",
                performed_by: Some(*admin_id),
                target_kind: Some(ResourceKind::User),
                target_id: Some(*user_id),
                details: format!("deleted account {}", username),
            });
        }

        DomainEvent::ReportFiled {
            report_id,
            reporter_id,
            resource_kind,
            resource_id,
        } => {
            out.audits.push(AuditDraft {
                action: "report.filed",
                performed_by: Some(*reporter_id),
                target_kind: Some(*resource_kind),
                target_id: Some(*resource_id),
                details: format!("report {}", report_id),
            });
        }

        DomainEvent::ReportResolved {
            report_id,
            admin_id,
            reporter_id,
            status,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *reporter_id,
                kind: kinds::REPORT_RESOLVED,
                message: format!("Your report was {}", status),
                link: None,
                meta: serde_json::json!({ "report_id": report_id.to_string() }),
            });
            out.audits.push(AuditDraft {
                action: "report.resolved",
                performed_by: Some(*admin_id),
                target_kind: None,
                target_id: Some(*report_id),
                details: format!("report marked {}", status),
            });
        }

        DomainEvent::ProductRemovedByAdmin {
            admin_id,
            product_id,
            owner_id,
            title,
        } => {
            out.notifications.push(NotificationDraft {
                user_id: *owner_id,
                kind: kinds::PRODUCT_REMOVED,
                message: format!("Your listing '{}' was removed by a moderator", title),
                link: None,
                meta: serde_json::json!({ "product_id": product_id.to_string() }),
            });
            out.audits.push(AuditDraft {
                action: "product.removed_by_admin",
                performed_by: Some(*admin_id),
                target_kind: Some(ResourceKind::Product),
                target_id: Some(*product_id),
                details: format!("removed '{}'", title),
            });
        }
    }

    out
}

/// Apply an effect plan: removals first, then inserts, then audit rows
pub async fn apply(pool: &PgPool, plan: &EffectPlan) -> Result<(), sqlx::Error> {
    for removal in &plan.removals {
        match removal.kind {
            Some(kind) => {
                notifications_db::delete_matching(pool, removal.user_id, kind, &removal.meta)
                    .await?;
            }
            None => {
                notifications_db::delete_matching_any_kind(pool, removal.user_id, &removal.meta)
                    .await?;
            }
        }
    }

    for draft in &plan.notifications {
        notifications_db::insert(
            pool,
            draft.user_id,
            draft.kind,
            &draft.message,
            draft.link.as_deref(),
            draft.meta.clone(),
        )
        .await?;
    }

    for audit_draft in &plan.audits {
        audit::db::record(
            pool,
            audit_draft.action,
            audit_draft.performed_by,
            audit_draft.target_kind,
            audit_draft.target_id,
            audit_draft.details.clone(),
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_by_owner_is_silent() {
        let owner = Uuid::new_v4();
        let effect = plan(&DomainEvent::FavoriteAdded {
            actor_id: owner,
            actor_name: "maya".to_string(),
            owner_id: owner,
            resource_kind: ResourceKind::Product,
            resource_id: Uuid::new_v4(),
            resource_title: "Dusk".to_string(),
        });
        assert!(effect.notifications.is_empty());
        assert!(effect.audits.is_empty());
    }

    #[test]
    fn test_favorite_by_other_notifies_owner_once() {
        let owner = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let effect = plan(&DomainEvent::FavoriteAdded {
            actor_id: actor,
            actor_name: "maya".to_string(),
            owner_id: owner,
            resource_kind: ResourceKind::Gallery,
            resource_id: Uuid::new_v4(),
            resource_title: "Dusk".to_string(),
        });
        assert_eq!(effect.notifications.len(), 1);
        assert_eq!(effect.notifications[0].user_id, owner);
        assert_eq!(effect.notifications[0].kind, kinds::FAVORITE);
    }

    #[test]
    fn test_invite_withdrawn_removes_stale_invite() {
        let gallery_id = Uuid::new_v4();
        let invitee = Uuid::new_v4();
        let effect = plan(&DomainEvent::InviteWithdrawn {
            gallery_id,
            gallery_title: "Dusk".to_string(),
            invitee_id: invitee,
        });

        assert_eq!(effect.removals.len(), 1);
        assert_eq!(effect.removals[0].kind, Some(kinds::GALLERY_INVITE));
        assert_eq!(effect.removals[0].user_id, invitee);
        assert_eq!(effect.notifications.len(), 1);
        assert_eq!(
            effect.notifications[0].kind,
            kinds::GALLERY_INVITE_WITHDRAWN
        );
    }

    #[test]
    fn test_collaborator_removed_purges_all_gallery_notifications() {
        let effect = plan(&DomainEvent::CollaboratorRemoved {
            gallery_id: Uuid::new_v4(),
            gallery_title: "Dusk".to_string(),
            user_id: Uuid::new_v4(),
        });
        assert_eq!(effect.removals.len(), 1);
        assert_eq!(effect.removals[0].kind, None);
    }

    #[test]
    fn test_order_placed_notifies_and_audits() {
        let effect = plan(&DomainEvent::OrderPlaced {
            order_id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            total_cents: 5000,
            item_count: 2,
        });
        assert_eq!(effect.notifications.len(), 1);
        assert_eq!(effect.audits.len(), 1);
        assert_eq!(effect.audits[0].action, "order.placed");
    }

    #[test]
    fn test_user_blocked_is_audit_only() {
        let effect = plan(&DomainEvent::UserBlocked {
            admin_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "spammer".to_string(),
        });
        assert!(effect.notifications.is_empty());
        assert_eq!(effect.audits.len(), 1);
    }

    #[test]
    fn test_self_reply_is_silent() {
        let author = Uuid::new_v4();
        let effect = plan(&DomainEvent::ReplyPosted {
            author_id: author,
            author_name: "maya".to_string(),
            parent_author_id: author,
            resource_kind: ResourceKind::Article,
            resource_id: Uuid::new_v4(),
            comment_id: Uuid::new_v4(),
        });
        assert!(effect.notifications.is_empty());
    }
}
