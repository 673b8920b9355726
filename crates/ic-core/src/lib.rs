//! innercircle/crates/ic-core/src/lib.rs
//!
//! The central domain logic and interface definitions for InnerCircle.

pub mod error;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use pagination::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn swap_status_transitions() {
        use SwapStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Accepted.can_transition_to(Accepted));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Accepted));
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
    }

    #[test]
    fn choices_round_trip_through_keys() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        assert_eq!(Condition::New.label(), "Like New");
        assert_eq!(Size::Xxl.to_string(), "XXL");
        assert!("huge".parse::<Size>().is_err());
    }

    #[test]
    fn notification_text_is_truncated() {
        let owner = Uuid::now_v7();
        let title = "t".repeat(300);
        let n = Notification::swap_request(owner, "bob", &title);
        assert_eq!(n.text.chars().count(), NOTIFICATION_TEXT_MAX);
        assert!(n.text.starts_with("bob requested "));
        assert!(!n.read);
        assert!(n.read_at.is_none());
        assert_eq!(n.notification_type, NotificationType::SwapRequest);
    }

    #[test]
    fn friend_request_counterpart() {
        let alice = UserRef { id: Uuid::now_v7(), username: "alice".into() };
        let bob = UserRef { id: Uuid::now_v7(), username: "bob".into() };
        let fr = FriendRequest {
            id: Uuid::now_v7(),
            from_user: alice.clone(),
            to_user: bob.clone(),
            message: String::new(),
            accepted: true,
            accepted_at: Some(chrono::Utc::now()),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(fr.counterpart(alice.id), &bob);
        assert_eq!(fr.counterpart(bob.id), &alice);
    }
}
