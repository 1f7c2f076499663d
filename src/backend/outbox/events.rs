//! Domain Events
//!
//! Handlers never write notification or audit rows inline. They describe
//! what happened as a typed event and hand it to the outbox dispatcher; the
//! consumer decides which notification and audit records follow. That keeps
//! the fan-out rules in one place and testable without a database.

use uuid::Uuid;

use crate::shared::ResourceKind;

/// Everything that can happen on the platform that carries a notification
/// or audit side effect
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Owner invited a user to collaborate on a gallery
    CollaboratorInvited {
        gallery_id: Uuid,
        gallery_title: String,
        owner_name: String,
        invitee_id: Uuid,
    },
    /// Owner withdrew a pending invite
    InviteWithdrawn {
        gallery_id: Uuid,
        gallery_title: String,
        invitee_id: Uuid,
    },
    /// Owner removed an accepted collaborator
    CollaboratorRemoved {
        gallery_id: Uuid,
        gallery_title: String,
        user_id: Uuid,
    },
    /// Invitee accepted an invite
    InviteAccepted {
        gallery_id: Uuid,
        gallery_title: String,
        owner_id: Uuid,
        collaborator_name: String,
    },
    /// Invitee declined an invite
    InviteDeclined {
        gallery_id: Uuid,
        gallery_title: String,
        owner_id: Uuid,
        invitee_name: String,
    },
    /// A user favourited an item (fires on the add edge only)
    FavoriteAdded {
        actor_id: Uuid,
        actor_name: String,
        owner_id: Uuid,
        resource_kind: ResourceKind,
        resource_id: Uuid,
        resource_title: String,
    },
    /// A top-level comment was posted on a resource
    CommentPosted {
        author_id: Uuid,
        author_name: String,
        resource_kind: ResourceKind,
        resource_id: Uuid,
        resource_owner_id: Uuid,
        comment_id: Uuid,
    },
    /// A reply was posted under an existing comment
    ReplyPosted {
        author_id: Uuid,
        author_name: String,
        parent_author_id: Uuid,
        resource_kind: ResourceKind,
        resource_id: Uuid,
        comment_id: Uuid,
    },
    /// Checkout completed and an order row exists
    OrderPlaced {
        order_id: Uuid,
        buyer_id: Uuid,
        total_cents: i64,
        item_count: usize,
    },
    /// Admin changed an order's status
    OrderStatusChanged {
        order_id: Uuid,
        buyer_id: Uuid,
        status: String,
        changed_by: Uuid,
    },
    /// A review landed on a product
    ReviewPosted {
        product_id: Uuid,
        product_title: String,
        product_owner_id: Uuid,
        reviewer_id: Uuid,
        reviewer_name: String,
        rating: i16,
    },
    /// Admin blocked an account
    UserBlocked {
        admin_id: Uuid,
        user_id: Uuid,
        username: String,
    },
    /// Admin unblocked an account
    UserUnblocked {
        admin_id: Uuid,
        user_id: Uuid,
        username: String,
    },
    /// Admin hard-deleted an account
    UserDeleted {
        admin_id: Uuid,
        user_id: Uuid,
        username: String,
    },
    /// A user reported a resource
    ReportFiled {
        report_id: Uuid,
        reporter_id: Uuid,
        resource_kind: ResourceKind,
        resource_id: Uuid,
    },
    /// Admin resolved or dismissed a report
    ReportResolved {
        report_id: Uuid,
        admin_id: Uuid,
        reporter_id: Uuid,
        status: String,
    },
    /// Admin removed a product listing
    ProductRemovedByAdmin {
        admin_id: Uuid,
        product_id: Uuid,
        owner_id: Uuid,
        title: String,
    },
}
