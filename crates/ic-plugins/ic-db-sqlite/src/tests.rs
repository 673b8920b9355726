use super::*;
use chrono::{Duration, Utc};
use ic_core::models::{
    Category, FriendRequest, Item, Notification, NotificationType, Profile, SwapRequest, SwapStatus, User,
    UserRef,
};
use ic_core::traits::{FriendRepo, ItemRepo, NotificationRepo, ProfileRepo, SwapDirection, SwapRepo, UserRepo};
use uuid::Uuid;

async fn store() -> SqliteStore {
    SqliteStore::in_memory().await.unwrap()
}

async fn account(store: &SqliteStore, name: &str) -> User {
    let user = User {
        id: Uuid::now_v7(),
        username: name.into(),
        email: format!("{name}@example.com"),
        password_hash: "hash".into(),
        first_name: String::new(),
        last_name: String::new(),
        date_joined: Utc::now(),
    };
    store.create_account(&user, &Profile::new(user.id, user.date_joined)).await.unwrap();
    user
}

async fn post_item(store: &SqliteStore, owner: &User, title: &str, minutes_ago: i64) -> Item {
    let at = Utc::now() - Duration::minutes(minutes_ago);
    let item = Item {
        id: Uuid::now_v7(),
        owner: owner.to_ref(),
        title: title.into(),
        description: String::new(),
        photo: None,
        category: Category::Accessories,
        size: None,
        condition: Default::default(),
        is_available: true,
        created_at: at,
        updated_at: at,
    };
    store.insert_item(&item).await.unwrap();
    item
}

fn friend_request(from: &User, to: &User) -> FriendRequest {
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

async fn befriend(store: &SqliteStore, from: &User, to: &User) -> FriendRequest {
    let request = friend_request(from, to);
    store
        .insert_friend_request(&request, &Notification::friend_request(to.id, &from.username))
        .await
        .unwrap();
    assert!(store
        .accept_friend_request(request.id, Utc::now(), &Notification::request_accepted(from.id, &to.username))
        .await
        .unwrap());
    request
}

fn swap(sender: &User, item: &Item) -> SwapRequest {
    let now = Utc::now();
    SwapRequest {
        id: Uuid::now_v7(),
        sender: sender.to_ref(),
        receiver: item.owner.clone(),
        item: item.to_ref(),
        message: "please".into(),
        status: SwapStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn account_round_trip_with_profile() {
    let store = store().await;
    let alice = account(&store, "alice").await;

    let found = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert!(store.get_profile(alice.id).await.unwrap().is_some());
    assert!(store.username_exists("alice").await.unwrap());
    assert!(store.email_exists("ALICE@example.com").await.unwrap());
    assert!(!store.email_exists("bob@example.com").await.unwrap());
}

#[tokio::test]
async fn duplicate_username_is_an_integrity_error() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let mut clone = alice.clone();
    clone.id = Uuid::now_v7();
    clone.email = "other@example.com".into();

    let err = store.create_account(&clone, &Profile::new(clone.id, Utc::now())).await.unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)));
}

#[tokio::test]
async fn feed_shows_own_and_friends_available_items_newest_first() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let carol = account(&store, "carol").await;

    let scarf = post_item(&store, &bob, "Red Scarf", 10).await;
    let coat = post_item(&store, &alice, "Wool Coat", 5).await;
    post_item(&store, &carol, "Hidden Hat", 1).await;

    // Before friendship, bob's scarf is invisible to alice.
    assert_eq!(store.count_feed(alice.id).await.unwrap(), 1);

    befriend(&store, &alice, &bob).await;

    let feed = store.list_feed(alice.id, 12, 0).await.unwrap();
    let titles: Vec<_> = feed.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Wool Coat", "Red Scarf"]);
    assert_eq!(feed[1].owner.username, "bob");

    // Friendship counts from the recipient's side too.
    let bob_feed = store.list_feed(bob.id, 12, 0).await.unwrap();
    assert!(bob_feed.iter().any(|i| i.id == coat.id));

    let mut taken = scarf.clone();
    taken.is_available = false;
    store.update_item(&taken).await.unwrap();
    assert_eq!(store.count_feed(alice.id).await.unwrap(), 1);
}

#[tokio::test]
async fn owned_listing_includes_unavailable_items() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let mut gone = post_item(&store, &alice, "Old Jeans", 3).await;
    post_item(&store, &alice, "New Jeans", 1).await;
    gone.is_available = false;
    store.update_item(&gone).await.unwrap();

    assert_eq!(store.count_owned(alice.id, false).await.unwrap(), 2);
    assert_eq!(store.count_owned(alice.id, true).await.unwrap(), 1);
    assert_eq!(store.list_owned(alice.id, false, 12, 0).await.unwrap()[0].title, "New Jeans");
    assert_eq!(store.items_count(alice.id).await.unwrap(), 2);
}

#[tokio::test]
async fn duplicate_friend_request_is_an_integrity_error() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;

    let first = friend_request(&alice, &bob);
    store.insert_friend_request(&first, &Notification::friend_request(bob.id, "alice")).await.unwrap();

    let again = friend_request(&alice, &bob);
    let err = store
        .insert_friend_request(&again, &Notification::friend_request(bob.id, "alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)));
    // The failed insert rolled its notification back.
    assert_eq!(store.count_notifications(bob.id).await.unwrap(), 1);

    // The reverse direction is a distinct pair.
    let reverse = friend_request(&bob, &alice);
    assert!(store
        .insert_friend_request(&reverse, &Notification::friend_request(alice.id, "bob"))
        .await
        .is_ok());
}

#[tokio::test]
async fn friendship_is_symmetric_and_accept_is_once() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;

    let request = befriend(&store, &alice, &bob).await;
    assert!(store.are_friends(alice.id, bob.id).await.unwrap());
    assert!(store.are_friends(bob.id, alice.id).await.unwrap());
    assert_eq!(store.friends_count(bob.id).await.unwrap(), 1);

    let again = store
        .accept_friend_request(request.id, Utc::now(), &Notification::request_accepted(alice.id, "bob"))
        .await
        .unwrap();
    assert!(!again);
    // Only the first acceptance notified alice.
    assert_eq!(store.count_notifications(alice.id).await.unwrap(), 1);
    assert!(!store.delete_friend_request(request.id).await.unwrap());

    let overview = store.accepted_for(bob.id).await.unwrap();
    assert_eq!(overview[0].counterpart(bob.id).username, "alice");
}

#[tokio::test]
async fn pending_lists_and_decline() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let request = friend_request(&alice, &bob);
    store.insert_friend_request(&request, &Notification::friend_request(bob.id, "alice")).await.unwrap();

    assert_eq!(store.incoming_pending(bob.id).await.unwrap().len(), 1);
    assert_eq!(store.outgoing_pending(alice.id).await.unwrap().len(), 1);
    assert!(store.incoming_pending(alice.id).await.unwrap().is_empty());

    assert!(store.delete_friend_request(request.id).await.unwrap());
    assert!(store.get_friend_request(request.id).await.unwrap().is_none());
    assert!(!store.are_friends(alice.id, bob.id).await.unwrap());
}

#[tokio::test]
async fn swap_transition_is_compare_and_set() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let scarf = post_item(&store, &bob, "Red Scarf", 1).await;

    let request = swap(&alice, &scarf);
    store
        .insert_swap_request(&request, &Notification::swap_request(bob.id, "alice", "Red Scarf"))
        .await
        .unwrap();

    let accepted = Notification::swap_accepted(alice.id, "bob", "Red Scarf");
    assert!(store
        .transition_swap_request(request.id, SwapStatus::Pending, SwapStatus::Accepted, Utc::now(), Some(accepted))
        .await
        .unwrap());
    assert!(!store
        .transition_swap_request(request.id, SwapStatus::Pending, SwapStatus::Cancelled, Utc::now(), None)
        .await
        .unwrap());

    let stored = store.get_swap_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SwapStatus::Accepted);
    assert_eq!(stored.item.title, "Red Scarf");

    let alice_inbox = store.list_notifications(alice.id, 20, 0).await.unwrap();
    assert_eq!(alice_inbox[0].notification_type, NotificationType::SwapAccepted);
}

#[tokio::test]
async fn completing_a_swap_takes_the_item_off_the_feed() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let scarf = post_item(&store, &bob, "Red Scarf", 1).await;
    let request = swap(&alice, &scarf);
    store
        .insert_swap_request(&request, &Notification::swap_request(bob.id, "alice", "Red Scarf"))
        .await
        .unwrap();

    // Only an accepted request completes.
    assert!(!store.complete_swap_request(request.id, Utc::now()).await.unwrap());
    assert!(store.get_item(scarf.id).await.unwrap().unwrap().is_available);

    store
        .transition_swap_request(request.id, SwapStatus::Pending, SwapStatus::Accepted, Utc::now(), None)
        .await
        .unwrap();
    assert!(store.complete_swap_request(request.id, Utc::now()).await.unwrap());

    let stored = store.get_swap_request(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SwapStatus::Completed);
    assert!(!store.get_item(scarf.id).await.unwrap().unwrap().is_available);
}

#[tokio::test]
async fn swap_lists_split_by_direction() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let scarf = post_item(&store, &bob, "Red Scarf", 1).await;
    let request = swap(&alice, &scarf);
    store
        .insert_swap_request(&request, &Notification::swap_request(bob.id, "alice", "Red Scarf"))
        .await
        .unwrap();

    assert_eq!(store.count_swap_requests(bob.id, SwapDirection::Incoming).await.unwrap(), 1);
    assert_eq!(store.count_swap_requests(bob.id, SwapDirection::Outgoing).await.unwrap(), 0);
    let outgoing = store.list_swap_requests(alice.id, SwapDirection::Outgoing, 10, 0).await.unwrap();
    assert_eq!(outgoing[0].receiver, UserRef { id: bob.id, username: "bob".into() });
}

#[tokio::test]
async fn deleting_an_item_cascades_to_its_swap_requests() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let scarf = post_item(&store, &bob, "Red Scarf", 1).await;
    let request = swap(&alice, &scarf);
    store
        .insert_swap_request(&request, &Notification::swap_request(bob.id, "alice", "Red Scarf"))
        .await
        .unwrap();

    store.delete_item(scarf.id).await.unwrap();
    assert!(store.get_swap_request(request.id).await.unwrap().is_none());
}

#[tokio::test]
async fn mark_read_flips_once() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let bob = account(&store, "bob").await;
    let request = friend_request(&bob, &alice);
    store.insert_friend_request(&request, &Notification::friend_request(alice.id, "bob")).await.unwrap();

    assert_eq!(store.unread_count(alice.id).await.unwrap(), 1);
    let note = store.list_notifications(alice.id, 20, 0).await.unwrap().remove(0);
    assert_eq!(note.text, "bob sent you a friend request");

    let first = Utc::now();
    assert!(store.mark_read(note.id, first).await.unwrap());
    assert!(!store.mark_read(note.id, first + Duration::minutes(5)).await.unwrap());

    let stored = store.get_notification(note.id).await.unwrap().unwrap();
    assert!(stored.read);
    assert!(stored.read_at.is_some_and(|at| at < first + Duration::minutes(1)));
    assert_eq!(store.unread_count(alice.id).await.unwrap(), 0);
}

#[tokio::test]
async fn search_matches_username_or_email_and_skips_self() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    account(&store, "alicia").await;
    account(&store, "bob").await;

    let found = store.search_users("ALI", alice.id, 20).await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alicia"]);

    let by_email = store.search_users("bob@", alice.id, 20).await.unwrap();
    assert_eq!(by_email.len(), 1);

    // LIKE wildcards in the query are literal.
    assert!(store.search_users("%", alice.id, 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_returns_at_most_the_limit_in_username_order() {
    let store = store().await;
    let viewer = account(&store, "viewer").await;
    for n in 0..25 {
        account(&store, &format!("knit{n:02}")).await;
    }

    let found = store.search_users("knit", viewer.id, ic_core::SEARCH_LIMIT).await.unwrap();
    assert_eq!(found.len(), 20);
    assert_eq!(found.first().unwrap().username, "knit00");
    assert_eq!(found.last().unwrap().username, "knit19");
}

#[tokio::test]
async fn profile_update_saves_names_too() {
    let store = store().await;
    let alice = account(&store, "alice").await;
    let mut profile = store.get_profile(alice.id).await.unwrap().unwrap();
    profile.bio = "Vintage lover".into();
    profile.avatar = Some("https://img.example.com/a.png".into());
    store.update_profile(&profile, "Alice", "Liddell").await.unwrap();

    let saved = store.get_profile(alice.id).await.unwrap().unwrap();
    assert_eq!(saved.bio, "Vintage lover");
    let user = store.get_user(alice.id).await.unwrap().unwrap();
    assert_eq!(user.display_name(), "Alice Liddell");
}
