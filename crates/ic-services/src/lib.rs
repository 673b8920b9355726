//! # ic-services
//!
//! Workflows of InnerCircle. Each service reads the acting user, checks the
//! authorization predicate, validates, and hands one transition to the store.

pub mod accounts;
pub mod friends;
pub mod items;
pub mod notifications;
pub mod profiles;
pub mod swaps;

pub use accounts::AccountService;
pub use friends::{FriendOverview, FriendService};
pub use items::ItemService;
pub use notifications::NotificationService;
pub use profiles::{ProfileService, ProfileView};
pub use swaps::{SwapLists, SwapService};

use ic_core::{AuthProvider, FriendRepo, ItemRepo, NotificationRepo, ProfileRepo, SwapRepo, UserRepo};
use std::sync::Arc;

/// Every service, wired to one store.
pub struct Services {
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub items: ItemService,
    pub friends: FriendService,
    pub swaps: SwapService,
    pub notifications: NotificationService,
}

impl Services {
    pub fn new<S>(store: Arc<S>, auth: Arc<dyn AuthProvider>) -> Self
    where
        S: UserRepo + ProfileRepo + ItemRepo + FriendRepo + SwapRepo + NotificationRepo + 'static,
    {
        let users: Arc<dyn UserRepo> = store.clone();
        let profiles: Arc<dyn ProfileRepo> = store.clone();
        let items: Arc<dyn ItemRepo> = store.clone();
        let friends: Arc<dyn FriendRepo> = store.clone();
        let swaps: Arc<dyn SwapRepo> = store.clone();
        let notifications: Arc<dyn NotificationRepo> = store;

        Self {
            accounts: AccountService::new(users.clone(), auth),
            profiles: ProfileService::new(users.clone(), profiles, items.clone()),
            items: ItemService::new(items.clone()),
            friends: FriendService::new(users, friends.clone()),
            swaps: SwapService::new(items, friends, swaps),
            notifications: NotificationService::new(notifications),
        }
    }
}
