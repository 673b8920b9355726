//! Friendship lifecycle.
//!
//! A friendship is one directional `FriendRequest` row. It counts in both
//! directions once accepted; no reciprocal row is ever written.

use chrono::Utc;
use ic_core::forms::FriendRequestForm;
use ic_core::{
    AppError, FriendRepo, FriendRequest, Notification, Result, UserRef, UserRepo, SEARCH_LIMIT,
};
use std::sync::Arc;
use uuid::Uuid;

/// Minimum trimmed query length before a search touches the store.
pub const SEARCH_MIN_CHARS: usize = 2;

/// The friends page: what is waiting on whom, and who is already a friend.
#[derive(Debug, Clone, Default)]
pub struct FriendOverview {
    pub incoming: Vec<FriendRequest>,
    pub outgoing: Vec<FriendRequest>,
    pub accepted: Vec<FriendRequest>,
}

pub struct FriendService {
    users: Arc<dyn UserRepo>,
    friends: Arc<dyn FriendRepo>,
}

impl FriendService {
    pub fn new(users: Arc<dyn UserRepo>, friends: Arc<dyn FriendRepo>) -> Self {
        Self { users, friends }
    }

    pub async fn search(&self, actor: Uuid, query: &str) -> Result<Vec<UserRef>> {
        let query = query.trim();
        if query.chars().count() < SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.users.search_users(query, actor, SEARCH_LIMIT).await
    }

    pub async fn send_request(
        &self,
        actor: &UserRef,
        to_user: Uuid,
        form: &FriendRequestForm,
    ) -> Result<FriendRequest> {
        let target = self
            .users
            .get_user(to_user)
            .await?
            .ok_or_else(|| AppError::not_found("User", to_user))?;

        if target.id == actor.id {
            return Err(AppError::invalid("You can't send a request to yourself."));
        }
        if self.friends.friend_request_exists(actor.id, target.id).await? {
            return Err(AppError::invalid(format!(
                "You already sent a request to {}.",
                target.username
            )));
        }
        let message = form.validate().map_err(AppError::Validation)?;

        let request = FriendRequest {
            id: Uuid::now_v7(),
            from_user: actor.clone(),
            to_user: target.to_ref(),
            message,
            accepted: false,
            accepted_at: None,
            created_at: Utc::now(),
        };
        let notification = Notification::friend_request(target.id, &actor.username);
        // A racing duplicate slips past the check above and is rejected here
        // by the unique (from_user, to_user) constraint.
        self.friends.insert_friend_request(&request, &notification).await?;

        tracing::info!(request_id = %request.id, from = %actor.username, to = %target.username, "friend request sent");
        Ok(request)
    }

    pub async fn accept(&self, actor: &UserRef, id: Uuid) -> Result<FriendRequest> {
        let mut request = self.pending_for_recipient(actor, id).await?;
        let now = Utc::now();
        let notification = Notification::request_accepted(request.from_user.id, &actor.username);
        if !self.friends.accept_friend_request(id, now, &notification).await? {
            return Err(AppError::invalid("This friend request was already answered."));
        }
        request.accepted = true;
        request.accepted_at = Some(now);

        tracing::info!(request_id = %id, "friend request accepted");
        Ok(request)
    }

    pub async fn decline(&self, actor: &UserRef, id: Uuid) -> Result<FriendRequest> {
        let request = self.pending_for_recipient(actor, id).await?;
        if !self.friends.delete_friend_request(id).await? {
            return Err(AppError::invalid("This friend request was already answered."));
        }

        tracing::info!(request_id = %id, "friend request declined");
        Ok(request)
    }

    pub async fn overview(&self, user: Uuid) -> Result<FriendOverview> {
        Ok(FriendOverview {
            incoming: self.friends.incoming_pending(user).await?,
            outgoing: self.friends.outgoing_pending(user).await?,
            accepted: self.friends.accepted_for(user).await?,
        })
    }

    pub async fn is_friend(&self, a: Uuid, b: Uuid) -> Result<bool> {
        self.friends.are_friends(a, b).await
    }

    async fn pending_for_recipient(&self, actor: &UserRef, id: Uuid) -> Result<FriendRequest> {
        let request = self
            .friends
            .get_friend_request(id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request", id))?;
        if request.to_user.id != actor.id {
            return Err(AppError::unauthorized("Invalid request."));
        }
        if request.accepted {
            return Err(AppError::invalid("This friend request was already answered."));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{MockFriendRepo, MockUserRepo, NotificationType, User};
    use mockall::predicate::eq;

    fn user(name: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: name.into(),
            email: format!("{name}@example.com"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            date_joined: Utc::now(),
        }
    }

    fn pending(from: &User, to: &User) -> FriendRequest {
        FriendRequest {
            id: Uuid::now_v7(),
            from_user: from.to_ref(),
            to_user: to.to_ref(),
            message: String::new(),
            accepted: false,
            accepted_at: None,
            created_at: Utc::now(),
        }
    }

    fn users_with(list: Vec<User>) -> MockUserRepo {
        let mut users = MockUserRepo::new();
        users
            .expect_get_user()
            .returning(move |id| Ok(list.iter().find(|u| u.id == id).cloned()));
        users
    }

    #[tokio::test]
    async fn request_notifies_recipient() {
        let (alice, bob) = (user("alice"), user("bob"));
        let bob_id = bob.id;
        let mut friends = MockFriendRepo::new();
        friends
            .expect_friend_request_exists()
            .with(eq(alice.id), eq(bob.id))
            .returning(|_, _| Ok(false));
        friends
            .expect_insert_friend_request()
            .withf(move |request, notification| {
                !request.accepted
                    && notification.user_id == bob_id
                    && notification.notification_type == NotificationType::FriendRequest
                    && notification.text == "alice sent you a friend request"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = FriendService::new(Arc::new(users_with(vec![alice.clone(), bob.clone()])), Arc::new(friends));
        let request = service
            .send_request(&alice.to_ref(), bob.id, &FriendRequestForm::default())
            .await
            .unwrap();
        assert_eq!(request.to_user.username, "bob");
    }

    #[tokio::test]
    async fn self_request_is_rejected() {
        let alice = user("alice");
        let mut friends = MockFriendRepo::new();
        friends.expect_insert_friend_request().never();

        let service = FriendService::new(Arc::new(users_with(vec![alice.clone()])), Arc::new(friends));
        let err = service
            .send_request(&alice.to_ref(), alice.id, &FriendRequestForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "You can't send a request to yourself.");
    }

    #[tokio::test]
    async fn duplicate_request_is_rejected_whatever_its_state() {
        let (alice, bob) = (user("alice"), user("bob"));
        let mut friends = MockFriendRepo::new();
        friends.expect_friend_request_exists().returning(|_, _| Ok(true));
        friends.expect_insert_friend_request().never();

        let service = FriendService::new(Arc::new(users_with(vec![alice.clone(), bob.clone()])), Arc::new(friends));
        let err = service
            .send_request(&alice.to_ref(), bob.id, &FriendRequestForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "You already sent a request to bob.");
    }

    #[tokio::test]
    async fn racing_duplicate_surfaces_integrity_error() {
        let (alice, bob) = (user("alice"), user("bob"));
        let mut friends = MockFriendRepo::new();
        friends.expect_friend_request_exists().returning(|_, _| Ok(false));
        friends
            .expect_insert_friend_request()
            .returning(|_, _| Err(AppError::Integrity("UNIQUE constraint failed".into())));

        let service = FriendService::new(Arc::new(users_with(vec![alice.clone(), bob.clone()])), Arc::new(friends));
        let err = service
            .send_request(&alice.to_ref(), bob.id, &FriendRequestForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[tokio::test]
    async fn only_recipient_accepts_and_sender_is_notified() {
        let (alice, bob) = (user("alice"), user("bob"));
        let request = pending(&alice, &bob);
        let id = request.id;
        let alice_id = alice.id;
        let mut friends = MockFriendRepo::new();
        friends
            .expect_get_friend_request()
            .with(eq(id))
            .returning(move |_| Ok(Some(request.clone())));
        friends
            .expect_accept_friend_request()
            .withf(move |rid, _, notification| {
                *rid == id
                    && notification.user_id == alice_id
                    && notification.text == "bob accepted your friend request"
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = FriendService::new(Arc::new(MockUserRepo::new()), Arc::new(friends));
        let err = service.accept(&alice.to_ref(), id).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let accepted = service.accept(&bob.to_ref(), id).await.unwrap();
        assert!(accepted.accepted);
        assert!(accepted.accepted_at.is_some());
    }

    #[tokio::test]
    async fn accepted_request_cannot_be_declined() {
        let (alice, bob) = (user("alice"), user("bob"));
        let mut request = pending(&alice, &bob);
        request.accepted = true;
        let id = request.id;
        let mut friends = MockFriendRepo::new();
        friends.expect_get_friend_request().returning(move |_| Ok(Some(request.clone())));
        friends.expect_delete_friend_request().never();

        let service = FriendService::new(Arc::new(MockUserRepo::new()), Arc::new(friends));
        assert!(matches!(service.decline(&bob.to_ref(), id).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn short_search_does_not_query() {
        let mut users = MockUserRepo::new();
        users.expect_search_users().never();
        let service = FriendService::new(Arc::new(users), Arc::new(MockFriendRepo::new()));
        assert!(service.search(Uuid::now_v7(), " a ").await.unwrap().is_empty());
    }
}
