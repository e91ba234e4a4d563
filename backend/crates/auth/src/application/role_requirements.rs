//! Role Requirements (RBAC)
//!
//! Static map from operation name to the roles allowed to call it. An
//! operation without an entry only needs an authenticated caller.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use thiserror::Error;

use crate::application::operation;
use crate::domain::entity::context::AuthenticatedContext;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleRequirementsError {
    #[error("expected 'operation=role[,role...]', got '{0}'")]
    Syntax(String),

    #[error("unknown role '{role}' for operation '{operation}'")]
    UnknownRole { operation: String, role: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("operation '{0}' is public and cannot require a role")]
    PublicOperation(String),

    #[error("operation '{0}' has an empty role set")]
    EmptyRoleSet(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirements {
    rules: BTreeMap<String, BTreeSet<UserRole>>,
}

impl Default for RoleRequirements {
    /// Listing users is reserved to admins
    fn default() -> Self {
        Self::empty().with_rule(operation::LIST_USERS, [UserRole::Admin])
    }
}

impl RoleRequirements {
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    pub fn with_rule(
        mut self,
        operation: impl Into<String>,
        roles: impl IntoIterator<Item = UserRole>,
    ) -> Self {
        self.rules
            .entry(operation.into())
            .or_default()
            .extend(roles);
        self
    }

    pub fn required_roles(&self, operation: &str) -> Option<&BTreeSet<UserRole>> {
        self.rules.get(operation)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every entry against the known operation names
    ///
    /// Run once at startup so a misspelt operation cannot become a rule that
    /// silently never matches.
    pub fn validate(&self) -> Result<(), RoleRequirementsError> {
        for (op, roles) in &self.rules {
            if !operation::is_known(op) {
                return Err(RoleRequirementsError::UnknownOperation(op.clone()));
            }
            if operation::is_public(op) {
                return Err(RoleRequirementsError::PublicOperation(op.clone()));
            }
            if roles.is_empty() {
                return Err(RoleRequirementsError::EmptyRoleSet(op.clone()));
            }
        }
        Ok(())
    }

    /// Decide whether the caller may invoke `operation`
    ///
    /// A rule with no established identity is an internal fault, not a pass.
    pub fn authorize(
        &self,
        operation: &str,
        context: Option<&AuthenticatedContext>,
    ) -> AuthResult<()> {
        let Some(allowed) = self.required_roles(operation) else {
            return Ok(());
        };

        let Some(context) = context else {
            tracing::error!(
                operation = %operation,
                "Role requirement evaluated without an authenticated context"
            );
            return Err(AuthError::Internal(format!(
                "no authenticated context for '{operation}'"
            )));
        };

        if allowed.contains(&context.role) {
            Ok(())
        } else {
            tracing::warn!(
                operation = %operation,
                user_id = %context.user_id,
                role = %context.role,
                "Role not allowed for operation"
            );
            Err(AuthError::PermissionDenied)
        }
    }
}

impl FromStr for RoleRequirements {
    type Err = RoleRequirementsError;

    /// Parse `"/auth.Auth/ListUsers=admin;/auth.Auth/IsAdmin=admin,manager"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut requirements = Self::empty();

        for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (op, roles) = entry
                .split_once('=')
                .ok_or_else(|| RoleRequirementsError::Syntax(entry.to_string()))?;
            let op = op.trim();
            if op.is_empty() {
                return Err(RoleRequirementsError::Syntax(entry.to_string()));
            }

            let roles = roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| {
                    r.parse::<UserRole>()
                        .map_err(|_| RoleRequirementsError::UnknownRole {
                            operation: op.to_string(),
                            role: r.to_string(),
                        })
                })
                .collect::<Result<BTreeSet<_>, _>>()?;

            if roles.is_empty() {
                return Err(RoleRequirementsError::EmptyRoleSet(op.to_string()));
            }
            requirements = requirements.with_rule(op, roles);
        }

        Ok(requirements)
    }
}
