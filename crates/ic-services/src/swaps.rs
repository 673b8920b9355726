//! Swap request lifecycle.
//!
//! pending → accepted → completed, or pending/accepted → cancelled. Every
//! transition is a compare-and-set on the status the request was loaded with.

use chrono::Utc;
use ic_core::forms::SwapRequestForm;
use ic_core::{
    AppError, FriendRepo, Item, ItemRepo, Notification, Page, PageRequest, Result, SwapDirection,
    SwapRepo, SwapRequest, SwapStatus, UserRef, SWAPS_PER_PAGE,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SwapLists {
    pub incoming: Page<SwapRequest>,
    pub outgoing: Page<SwapRequest>,
}

pub struct SwapService {
    items: Arc<dyn ItemRepo>,
    friends: Arc<dyn FriendRepo>,
    swaps: Arc<dyn SwapRepo>,
}

impl SwapService {
    pub fn new(items: Arc<dyn ItemRepo>, friends: Arc<dyn FriendRepo>, swaps: Arc<dyn SwapRepo>) -> Self {
        Self { items, friends, swaps }
    }

    /// Loads an item the actor is allowed to ask for: someone else's,
    /// still available, and owned by a friend.
    pub async fn requestable(&self, actor: &UserRef, item_id: Uuid) -> Result<Item> {
        let item = self
            .items
            .get_item(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item", item_id))?;

        if item.is_owned_by(actor.id) {
            return Err(AppError::unauthorized("You can't request your own items."));
        }
        if !item.is_available {
            return Err(AppError::invalid("This item is no longer available."));
        }
        if !self.friends.are_friends(actor.id, item.owner.id).await? {
            return Err(AppError::unauthorized("You must be friends to request items."));
        }
        Ok(item)
    }

    pub async fn request(&self, actor: &UserRef, item_id: Uuid, form: &SwapRequestForm) -> Result<SwapRequest> {
        let item = self.requestable(actor, item_id).await?;
        let message = form.validate().map_err(AppError::Validation)?;

        let now = Utc::now();
        let request = SwapRequest {
            id: Uuid::now_v7(),
            sender: actor.clone(),
            receiver: item.owner.clone(),
            item: item.to_ref(),
            message,
            status: SwapStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let notification = Notification::swap_request(item.owner.id, &actor.username, &item.title);
        self.swaps.insert_swap_request(&request, &notification).await?;

        tracing::info!(swap_id = %request.id, item_id = %item.id, sender = %actor.username, "swap requested");
        Ok(request)
    }

    /// Receiver only, from pending only. Notifies the sender.
    pub async fn accept(&self, actor: &UserRef, id: Uuid) -> Result<SwapRequest> {
        let request = self.load(id).await?;
        if request.receiver.id != actor.id {
            return Err(AppError::unauthorized("Invalid request."));
        }
        let notification = Notification::swap_accepted(request.sender.id, &actor.username, &request.item.title);
        self.transition(request, SwapStatus::Accepted, Some(notification)).await
    }

    /// Either party, from pending or accepted.
    pub async fn cancel(&self, actor: &UserRef, id: Uuid) -> Result<SwapRequest> {
        let request = self.load(id).await?;
        if !request.involves(actor.id) {
            return Err(AppError::unauthorized("Invalid request."));
        }
        self.transition(request, SwapStatus::Cancelled, None).await
    }

    /// Either party, from accepted. Marks the item unavailable in the same
    /// store transaction.
    pub async fn complete(&self, actor: &UserRef, id: Uuid) -> Result<SwapRequest> {
        let mut request = self.load(id).await?;
        if !request.involves(actor.id) {
            return Err(AppError::unauthorized("Invalid request."));
        }
        ensure_transition(&request, SwapStatus::Completed)?;

        let now = Utc::now();
        if !self.swaps.complete_swap_request(id, now).await? {
            return Err(stale());
        }
        request.status = SwapStatus::Completed;
        request.updated_at = now;

        tracing::info!(swap_id = %id, item_id = %request.item.id, "swap completed");
        Ok(request)
    }

    pub async fn lists(&self, user: Uuid, page_in: Option<&str>, page_out: Option<&str>) -> Result<SwapLists> {
        Ok(SwapLists {
            incoming: self.page(user, SwapDirection::Incoming, page_in).await?,
            outgoing: self.page(user, SwapDirection::Outgoing, page_out).await?,
        })
    }

    async fn page(&self, user: Uuid, direction: SwapDirection, raw: Option<&str>) -> Result<Page<SwapRequest>> {
        let total = self.swaps.count_swap_requests(user, direction).await?;
        let request = PageRequest::resolve(raw, SWAPS_PER_PAGE, total);
        let rows = self
            .swaps
            .list_swap_requests(user, direction, request.limit(), request.offset())
            .await?;
        Ok(Page::new(rows, request, total))
    }

    async fn load(&self, id: Uuid) -> Result<SwapRequest> {
        self.swaps
            .get_swap_request(id)
            .await?
            .ok_or_else(|| AppError::not_found("Swap request", id))
    }

    async fn transition(
        &self,
        mut request: SwapRequest,
        next: SwapStatus,
        notification: Option<Notification>,
    ) -> Result<SwapRequest> {
        ensure_transition(&request, next)?;

        let now = Utc::now();
        let from = request.status;
        if !self
            .swaps
            .transition_swap_request(request.id, from, next, now, notification)
            .await?
        {
            return Err(stale());
        }
        request.status = next;
        request.updated_at = now;

        tracing::info!(swap_id = %request.id, from = from.as_str(), to = next.as_str(), "swap status changed");
        Ok(request)
    }
}

fn ensure_transition(request: &SwapRequest, next: SwapStatus) -> Result<()> {
    if request.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::invalid(format!(
            "A {} request cannot be {}.",
            request.status.as_str(),
            next.as_str()
        )))
    }
}

fn stale() -> AppError {
    AppError::invalid("This request changed in the meantime. Please try again.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{Category, Condition, MockFriendRepo, MockItemRepo, MockSwapRepo, NotificationType};
    use mockall::predicate::eq;

    fn person(name: &str) -> UserRef {
        UserRef { id: Uuid::now_v7(), username: name.into() }
    }

    fn item_of(owner: &UserRef) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::now_v7(),
            owner: owner.clone(),
            title: "Red Scarf".into(),
            description: String::new(),
            photo: None,
            category: Category::Accessories,
            size: None,
            condition: Condition::New,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn swap(sender: &UserRef, receiver: &UserRef, status: SwapStatus) -> SwapRequest {
        let now = Utc::now();
        SwapRequest {
            id: Uuid::now_v7(),
            sender: sender.clone(),
            receiver: receiver.clone(),
            item: ic_core::ItemRef { id: Uuid::now_v7(), title: "Red Scarf".into() },
            message: String::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn swap_service(items: MockItemRepo, friends: MockFriendRepo, swaps: MockSwapRepo) -> SwapService {
        SwapService::new(Arc::new(items), Arc::new(friends), Arc::new(swaps))
    }

    fn stored(swaps: &mut MockSwapRepo, request: SwapRequest) {
        swaps
            .expect_get_swap_request()
            .with(eq(request.id))
            .returning(move |_| Ok(Some(request.clone())));
    }

    #[tokio::test]
    async fn own_item_cannot_be_requested() {
        let alice = person("alice");
        let item = item_of(&alice);
        let item_id = item.id;
        let mut items = MockItemRepo::new();
        items.expect_get_item().returning(move |_| Ok(Some(item.clone())));
        let mut swaps = MockSwapRepo::new();
        swaps.expect_insert_swap_request().never();

        let err = swap_service(items, MockFriendRepo::new(), swaps)
            .request(&alice, item_id, &SwapRequestForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "You can't request your own items.");
    }

    #[tokio::test]
    async fn strangers_cannot_request() {
        let (alice, bob) = (person("alice"), person("bob"));
        let item = item_of(&alice);
        let item_id = item.id;
        let mut items = MockItemRepo::new();
        items.expect_get_item().returning(move |_| Ok(Some(item.clone())));
        let mut friends = MockFriendRepo::new();
        friends.expect_are_friends().with(eq(bob.id), eq(alice.id)).returning(|_, _| Ok(false));
        let mut swaps = MockSwapRepo::new();
        swaps.expect_insert_swap_request().never();

        let err = swap_service(items, friends, swaps)
            .request(&bob, item_id, &SwapRequestForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unavailable_item_cannot_be_requested() {
        let (alice, bob) = (person("alice"), person("bob"));
        let mut item = item_of(&alice);
        item.is_available = false;
        let item_id = item.id;
        let mut items = MockItemRepo::new();
        items.expect_get_item().returning(move |_| Ok(Some(item.clone())));
        let mut friends = MockFriendRepo::new();
        friends.expect_are_friends().returning(|_, _| Ok(true));
        let mut swaps = MockSwapRepo::new();
        swaps.expect_insert_swap_request().never();

        let err = swap_service(items, friends, swaps)
            .request(&bob, item_id, &SwapRequestForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.user_message(), "This item is no longer available.");
    }

    #[tokio::test]
    async fn friend_request_for_item_notifies_owner() {
        let (alice, bob) = (person("alice"), person("bob"));
        let item = item_of(&alice);
        let item_id = item.id;
        let alice_id = alice.id;
        let mut items = MockItemRepo::new();
        items.expect_get_item().returning(move |_| Ok(Some(item.clone())));
        let mut friends = MockFriendRepo::new();
        friends.expect_are_friends().returning(|_, _| Ok(true));
        let mut swaps = MockSwapRepo::new();
        swaps
            .expect_insert_swap_request()
            .withf(move |request, notification| {
                request.status == SwapStatus::Pending
                    && request.receiver.id == alice_id
                    && request.message == "swap for my boots?"
                    && notification.user_id == alice_id
                    && notification.notification_type == NotificationType::SwapRequest
                    && notification.text == "bob requested Red Scarf"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let form = SwapRequestForm { message: "swap for my boots?".into() };
        let request = swap_service(items, friends, swaps).request(&bob, item_id, &form).await.unwrap();
        assert_eq!(request.item.id, item_id);
    }

    #[tokio::test]
    async fn accept_only_by_receiver_from_pending() {
        let (alice, bob) = (person("alice"), person("bob"));
        let statuses = [
            (SwapStatus::Pending, true),
            (SwapStatus::Accepted, false),
            (SwapStatus::Completed, false),
            (SwapStatus::Cancelled, false),
        ];
        for (status, allowed) in statuses {
            let request = swap(&bob, &alice, status);
            let id = request.id;
            let bob_id = bob.id;
            let mut swaps = MockSwapRepo::new();
            stored(&mut swaps, request);
            swaps
                .expect_transition_swap_request()
                .withf(move |rid, from, to, _, notification| {
                    *rid == id
                        && *from == SwapStatus::Pending
                        && *to == SwapStatus::Accepted
                        && notification.as_ref().is_some_and(|n| {
                            n.user_id == bob_id && n.text == "alice accepted your swap request for Red Scarf"
                        })
                })
                .times(usize::from(allowed))
                .returning(|_, _, _, _, _| Ok(true));
            let service = swap_service(MockItemRepo::new(), MockFriendRepo::new(), swaps);

            // The sender may never accept, whatever the status.
            assert!(service.accept(&bob, id).await.is_err());

            let result = service.accept(&alice, id).await;
            assert_eq!(result.is_ok(), allowed, "status {status:?}");
            if let Ok(accepted) = result {
                assert_eq!(accepted.status, SwapStatus::Accepted);
            }
        }
    }

    #[tokio::test]
    async fn cancel_by_either_party_until_terminal() {
        let (alice, bob, carol) = (person("alice"), person("bob"), person("carol"));
        for (status, allowed) in [
            (SwapStatus::Pending, true),
            (SwapStatus::Accepted, true),
            (SwapStatus::Completed, false),
            (SwapStatus::Cancelled, false),
        ] {
            let request = swap(&bob, &alice, status);
            let id = request.id;
            let mut swaps = MockSwapRepo::new();
            stored(&mut swaps, request);
            swaps
                .expect_transition_swap_request()
                .withf(move |_, from, to, _, notification| {
                    *from == status && *to == SwapStatus::Cancelled && notification.is_none()
                })
                .returning(|_, _, _, _, _| Ok(true));
            let service = swap_service(MockItemRepo::new(), MockFriendRepo::new(), swaps);

            assert!(matches!(service.cancel(&carol, id).await, Err(AppError::Unauthorized(_))));
            assert_eq!(service.cancel(&bob, id).await.is_ok(), allowed);
            assert_eq!(service.cancel(&alice, id).await.is_ok(), allowed);
        }
    }

    #[tokio::test]
    async fn stale_status_is_reported() {
        let (alice, bob) = (person("alice"), person("bob"));
        let request = swap(&bob, &alice, SwapStatus::Pending);
        let id = request.id;
        let mut swaps = MockSwapRepo::new();
        stored(&mut swaps, request);
        swaps.expect_transition_swap_request().returning(|_, _, _, _, _| Ok(false));

        let err = swap_service(MockItemRepo::new(), MockFriendRepo::new(), swaps)
            .accept(&alice, id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn complete_requires_accepted() {
        let (alice, bob, carol) = (person("alice"), person("bob"), person("carol"));
        let pending = swap(&bob, &alice, SwapStatus::Pending);
        let accepted = swap(&bob, &alice, SwapStatus::Accepted);
        let (pending_id, accepted_id) = (pending.id, accepted.id);
        let mut swaps = MockSwapRepo::new();
        stored(&mut swaps, pending);
        stored(&mut swaps, accepted);
        swaps
            .expect_complete_swap_request()
            .withf(move |id, _| *id == accepted_id)
            .times(1)
            .returning(|_, _| Ok(true));
        let service = swap_service(MockItemRepo::new(), MockFriendRepo::new(), swaps);

        assert!(service.complete(&alice, pending_id).await.is_err());
        assert!(matches!(service.complete(&carol, accepted_id).await, Err(AppError::Unauthorized(_))));
        let done = service.complete(&bob, accepted_id).await.unwrap();
        assert_eq!(done.status, SwapStatus::Completed);
    }
}
