mod common;

use common::{Harness, harness, harness_with};
use mutuals::application_port::RelationError;
use mutuals::domain_model::*;
use mutuals::domain_port::{EdgeWrite, RelationshipStore};
use mutuals::infra_memory::MemoryRelationshipStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

async fn statuses(h: &Harness, a: UserId, b: UserId) -> (RelationshipStatus, RelationshipStatus) {
    let ab = h.relationships.relationship_status(a, b).await.unwrap();
    let ba = h.relationships.relationship_status(b, a).await.unwrap();
    (ab, ba)
}

fn assert_complementary(ab: RelationshipStatus, ba: RelationshipStatus) {
    assert_eq!(ab.complement(), ba, "edges out of complement: {ab:?}/{ba:?}");
}

#[tokio::test]
async fn send_request_creates_complementary_pending_pair() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::PendingOutgoing);
    assert_eq!(ba, RelationshipStatus::PendingIncoming);
    assert_complementary(ab, ba);

    let inbox = h.notifications.my_notifications(bob).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::FriendRequest);
    assert_eq!(inbox[0].sender, Some(alice));
}

#[tokio::test]
async fn accept_makes_friends_and_notifies_requester() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::Friends);
    assert_eq!(ba, RelationshipStatus::Friends);

    let inbox = h.notifications.my_notifications(alice).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::FriendAccept);
    assert_eq!(inbox[0].sender, Some(bob));
}

#[tokio::test]
async fn decline_resets_both_edges() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.decline_request(bob, alice).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::None);
    assert_eq!(ba, RelationshipStatus::None);
}

#[tokio::test]
async fn cancel_resets_both_edges_without_notifying() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    let before = h.notifications.my_notifications(bob).await.unwrap().len();
    h.relationships.cancel_request(alice, bob).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::None);
    assert_eq!(ba, RelationshipStatus::None);
    let after = h.notifications.my_notifications(bob).await.unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn self_request_rejected() {
    let h = harness();
    let alice = h.user("alice");

    let err = h.relationships.send_request(alice, alice).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));
}

#[tokio::test]
async fn unknown_target_rejected() {
    let h = harness();
    let alice = h.user("alice");
    let ghost = UserId(uuid::Uuid::new_v4());

    let err = h.relationships.send_request(alice, ghost).await.unwrap_err();
    assert!(matches!(err, RelationError::UserNotFound));
}

#[tokio::test]
async fn at_most_one_pending_request_per_pair() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();

    let again = h.relationships.send_request(alice, bob).await.unwrap_err();
    assert!(matches!(again, RelationError::Validation(_)));

    // The reverse direction is also refused while one request is pending.
    let reverse = h.relationships.send_request(bob, alice).await.unwrap_err();
    assert!(matches!(reverse, RelationError::Validation(_)));
}

#[tokio::test]
async fn request_between_friends_rejected() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();

    let err = h.relationships.send_request(alice, bob).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));
}

#[tokio::test]
async fn accept_without_incoming_request_rejected() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    let err = h.relationships.accept_request(bob, alice).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));

    // The requester cannot accept their own request.
    h.relationships.send_request(alice, bob).await.unwrap();
    let err = h.relationships.accept_request(alice, bob).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));
}

#[tokio::test]
async fn block_clears_friendship_silently() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();
    let inbox_before = h.notifications.my_notifications(bob).await.unwrap().len();

    h.relationships.block_user(alice, bob).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::Blocking);
    assert_eq!(ba, RelationshipStatus::Blocked);

    let inbox_after = h.notifications.my_notifications(bob).await.unwrap().len();
    assert_eq!(inbox_before, inbox_after, "blocking must not notify");
}

#[tokio::test]
async fn block_is_idempotent() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.block_user(alice, bob).await.unwrap();
    h.relationships.block_user(alice, bob).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::Blocking);
    assert_eq!(ba, RelationshipStatus::Blocked);
}

#[tokio::test]
async fn unblock_resets_to_none_not_friends() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();
    h.relationships.block_user(alice, bob).await.unwrap();
    h.relationships.unblock_user(alice, bob).await.unwrap();

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::None);
    assert_eq!(ba, RelationshipStatus::None);
}

#[tokio::test]
async fn unblock_requires_an_existing_block() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    let err = h.relationships.unblock_user(alice, bob).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));

    // The blocked side cannot lift the block either.
    h.relationships.block_user(alice, bob).await.unwrap();
    let err = h.relationships.unblock_user(bob, alice).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));
}

#[tokio::test]
async fn requests_across_a_block_rejected() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");

    h.relationships.block_user(alice, bob).await.unwrap();

    // The blocker knows about the block.
    let err = h.relationships.send_request(alice, bob).await.unwrap_err();
    assert!(matches!(err, RelationError::Permission));

    // The blocked side gets a generic refusal, never a permission error that
    // would reveal the block.
    let err = h.relationships.send_request(bob, alice).await.unwrap_err();
    assert!(matches!(err, RelationError::Validation(_)));
}

#[tokio::test]
async fn store_level_write_requires_expected_status() {
    let store = MemoryRelationshipStore::new();
    let alice = UserId(uuid::Uuid::new_v4());
    let bob = UserId(uuid::Uuid::new_v4());

    let applied = store
        .write_edge_pair(
            alice,
            bob,
            RelationshipStatus::PendingOutgoing,
            RelationshipStatus::PendingIncoming,
            RelationshipStatus::None,
        )
        .await
        .unwrap();
    assert_eq!(applied, EdgeWrite::Applied);

    // Stale expectation loses.
    let conflict = store
        .write_edge_pair(
            alice,
            bob,
            RelationshipStatus::Friends,
            RelationshipStatus::Friends,
            RelationshipStatus::None,
        )
        .await
        .unwrap();
    assert_eq!(conflict, EdgeWrite::Conflict);

    let status = store.read_edge(alice, bob).await.unwrap();
    assert_eq!(status, RelationshipStatus::PendingOutgoing);
}

/// Delegating store that fires a competing cancel right before the first
/// conditional write goes through, forcing the accept's precondition to fail.
struct RacingStore {
    inner: Arc<MemoryRelationshipStore>,
    fired: AtomicBool,
    alice: UserId,
    bob: UserId,
}

#[async_trait::async_trait]
impl RelationshipStore for RacingStore {
    async fn read_edge(
        &self,
        owner: UserId,
        other: UserId,
    ) -> Result<RelationshipStatus, RelationError> {
        self.inner.read_edge(owner, other).await
    }

    async fn write_edge_pair(
        &self,
        owner: UserId,
        other: UserId,
        owner_status: RelationshipStatus,
        other_status: RelationshipStatus,
        expected_owner: RelationshipStatus,
    ) -> Result<EdgeWrite, RelationError> {
        if expected_owner == RelationshipStatus::PendingIncoming
            && !self.fired.swap(true, Ordering::SeqCst)
        {
            // Alice cancels from another device between Bob's read and write.
            let raced = self
                .inner
                .write_edge_pair(
                    self.alice,
                    self.bob,
                    RelationshipStatus::None,
                    RelationshipStatus::None,
                    RelationshipStatus::PendingOutgoing,
                )
                .await?;
            assert_eq!(raced, EdgeWrite::Applied);
        }
        self.inner
            .write_edge_pair(owner, other, owner_status, other_status, expected_owner)
            .await
    }

    async fn list_edges(
        &self,
        owner: UserId,
        filter: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEdge>, RelationError> {
        self.inner.list_edges(owner, filter).await
    }
}

#[tokio::test]
async fn concurrent_cancel_beats_accept_with_conflict() {
    let inner = Arc::new(MemoryRelationshipStore::new());
    let alice = UserId(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, b"alice"));
    let bob = UserId(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, b"bob"));

    let racing = Arc::new(RacingStore {
        inner: inner.clone(),
        fired: AtomicBool::new(false),
        alice,
        bob,
    });
    let h = harness_with(racing);
    h.directory.add_user(alice, "alice");
    h.directory.add_user(bob, "bob");

    h.relationships.send_request(alice, bob).await.unwrap();

    let err = h.relationships.accept_request(bob, alice).await.unwrap_err();
    assert!(matches!(err, RelationError::Conflict));

    // The cancel won; the pair is back to rest.
    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_eq!(ab, RelationshipStatus::None);
    assert_eq!(ba, RelationshipStatus::None);
}

#[tokio::test]
async fn concurrent_accept_and_cancel_exactly_one_wins() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    h.relationships.send_request(alice, bob).await.unwrap();

    let (accepted, cancelled) = tokio::join!(
        h.relationships.accept_request(bob, alice),
        h.relationships.cancel_request(alice, bob),
    );
    assert!(
        accepted.is_ok() ^ cancelled.is_ok(),
        "exactly one operation must win: accept={accepted:?} cancel={cancelled:?}"
    );

    let (ab, ba) = statuses(&h, alice, bob).await;
    assert_complementary(ab, ba);
    if accepted.is_ok() {
        assert_eq!(ab, RelationshipStatus::Friends);
    } else {
        assert_eq!(ab, RelationshipStatus::None);
    }
}

#[tokio::test]
async fn friend_and_request_lists_reflect_edges() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let carol = h.user("carol");

    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();
    h.relationships.send_request(carol, alice).await.unwrap();

    let friends = h.relationships.list_friends(alice).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].user_id, bob);
    assert_eq!(friends[0].username, "bob");

    let requests = h.relationships.list_friend_requests(alice).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_id, carol);
}

#[tokio::test]
async fn suggestions_exclude_related_users_but_not_declined() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let carol = h.user("carol");
    let dave = h.user("dave");
    let erin = h.user("erin");
    let frank = h.user("frank");

    // bob: friend; carol: pending; dave: blocked; frank: declined (back to rest)
    h.relationships.send_request(alice, bob).await.unwrap();
    h.relationships.accept_request(bob, alice).await.unwrap();
    h.relationships.send_request(alice, carol).await.unwrap();
    h.relationships.block_user(alice, dave).await.unwrap();
    h.relationships.send_request(frank, alice).await.unwrap();
    h.relationships.decline_request(alice, frank).await.unwrap();

    let suggestions = h
        .relationships
        .friend_suggestions(alice, PageSize(10))
        .await
        .unwrap();
    let ids: Vec<UserId> = suggestions.iter().map(|s| s.user_id).collect();

    assert!(ids.contains(&erin));
    assert!(ids.contains(&frank), "a declined pair is suggestible again");
    assert!(!ids.contains(&alice));
    assert!(!ids.contains(&bob));
    assert!(!ids.contains(&carol));
    assert!(!ids.contains(&dave));
}
