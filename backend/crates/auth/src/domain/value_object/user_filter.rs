//! User list filter
//!
//! Callers send free-form `key -> value` pairs. Only allow-listed keys with
//! well-formed values are accepted, and a single bad pair rejects the whole
//! filter.

use std::collections::BTreeMap;

use derive_more::Display;
use thiserror::Error;

use super::email::Email;
use super::user_id::UserId;
use super::user_role::UserRole;

/// Filterable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum FilterField {
    #[display("id")]
    Id,
    #[display("email")]
    Email,
    #[display("role")]
    Role,
}

impl FilterField {
    /// Column name in the `users` table
    pub const fn column(&self) -> &'static str {
        match self {
            FilterField::Id => "id",
            FilterField::Email => "email",
            FilterField::Role => "role",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(FilterField::Id),
            "email" => Some(FilterField::Email),
            "role" => Some(FilterField::Role),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unsupported filter key '{0}'")]
    UnknownKey(String),

    #[error("invalid value for filter '{0}'")]
    InvalidValue(FilterField),
}

/// Validated equality filter, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<UserId>,
    pub email: Option<Email>,
    pub role: Option<UserRole>,
}

impl UserFilter {
    pub fn parse<K, V, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = UserFilter::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();
            let field =
                FilterField::from_key(key).ok_or_else(|| FilterError::UnknownKey(key.to_string()))?;

            match field {
                FilterField::Id => {
                    let id = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .map(UserId::new)
                        .filter(UserId::is_valid)
                        .ok_or(FilterError::InvalidValue(field))?;
                    filter.id = Some(id);
                }
                FilterField::Email => {
                    let email = Email::new(value).map_err(|_| FilterError::InvalidValue(field))?;
                    filter.email = Some(email);
                }
                FilterField::Role => {
                    let role = value
                        .parse::<UserRole>()
                        .map_err(|_| FilterError::InvalidValue(field))?;
                    filter.role = Some(role);
                }
            }
        }

        Ok(filter)
    }

    pub fn matches(&self, id: UserId, email: &Email, role: UserRole) -> bool {
        self.id.is_none_or(|want| want == id)
            && self.email.as_ref().is_none_or(|want| want == email)
            && self.role.is_none_or(|want| want == role)
    }
}

impl TryFrom<&BTreeMap<String, String>> for UserFilter {
    type Error = FilterError;

    fn try_from(map: &BTreeMap<String, String>) -> Result<Self, Self::Error> {
        UserFilter::parse(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        let filter = UserFilter::parse(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(filter, UserFilter::default());
    }

    #[test]
    fn test_all_fields() {
        let filter =
            UserFilter::parse([("id", "3"), ("email", "A@Example.com"), ("role", "manager")])
                .unwrap();

        assert_eq!(filter.id, Some(UserId::new(3)));
        assert_eq!(filter.email.as_ref().map(Email::as_str), Some("a@example.com"));
        assert_eq!(filter.role, Some(UserRole::Manager));
    }

    #[test]
    fn test_unknown_key_rejects_whole_filter() {
        let result = UserFilter::parse([("role", "admin"), ("password", "x")]);
        assert_eq!(result, Err(FilterError::UnknownKey("password".to_string())));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            UserFilter::parse([("id", "0")]),
            Err(FilterError::InvalidValue(FilterField::Id))
        );
        assert_eq!(
            UserFilter::parse([("id", "1 OR 1=1")]),
            Err(FilterError::InvalidValue(FilterField::Id))
        );
        assert_eq!(
            UserFilter::parse([("email", "nope")]),
            Err(FilterError::InvalidValue(FilterField::Email))
        );
        assert_eq!(
            UserFilter::parse([("role", "root")]),
            Err(FilterError::InvalidValue(FilterField::Role))
        );
    }

    #[test]
    fn test_matches() {
        let filter = UserFilter::parse([("role", "admin")]).unwrap();
        let email = Email::new("a@example.com").unwrap();

        assert!(filter.matches(UserId::new(1), &email, UserRole::Admin));
        assert!(!filter.matches(UserId::new(1), &email, UserRole::User));
        assert!(UserFilter::default().matches(UserId::new(9), &email, UserRole::User));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = FilterError::InvalidValue(FilterField::Email);
        assert_eq!(err.to_string(), "invalid value for filter 'email'");
    }
}
