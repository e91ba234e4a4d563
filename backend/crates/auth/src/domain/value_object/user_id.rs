use kernel::id::Id;

pub struct UserMarker;

/// Database-assigned user key (`users.id`)
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display_is_token_subject() {
        let user_id = UserId::new(42);
        assert_eq!(user_id.to_string(), "42");
        assert!(user_id.is_valid());
    }

    #[test]
    fn test_non_positive_ids_are_invalid() {
        assert!(!UserId::new(0).is_valid());
        assert!(!UserId::new(-7).is_valid());
    }

    #[test]
    fn test_user_id_serializes_as_number() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(back, UserId::new(7));
    }
}
