//! Authorization decisions as composable, data-shaped rules.
//!
//! A `Rule` is evaluated against an explicit `SecurityContext` and, for
//! ownership checks, a `TaskOwnership` lookup. Evaluation performs no writes.

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use tasktrack_core::{TaskId, UserId};

use crate::principal::{AuthenticatedPrincipal, SecurityContext};
use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("access denied")]
    Denied,

    #[error("resource not found")]
    ResourceNotFound,
}

/// Who owns a task, as reported by the task collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipFact {
    pub task_id: TaskId,
    pub executor_id: Option<UserId>,
    pub author_id: Option<UserId>,
}

impl OwnershipFact {
    pub fn is_executed_by(&self, user: UserId) -> bool {
        self.executor_id == Some(user)
    }
}

/// Read-only ownership lookup consulted by `Rule::ExecutorOf`.
pub trait TaskOwnership: Send + Sync {
    fn ownership(&self, task_id: TaskId) -> Option<OwnershipFact>;
}

impl<T> TaskOwnership for Arc<T>
where
    T: TaskOwnership + ?Sized,
{
    fn ownership(&self, task_id: TaskId) -> Option<OwnershipFact> {
        (**self).ownership(task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Always allowed, even anonymously.
    Public,
    /// Any authenticated caller.
    Authenticated,
    /// Caller holds the role.
    HasRole(Role),
    /// Caller is this account.
    IsUser(UserId),
    /// Caller is the task's executor. Missing task is `ResourceNotFound`.
    ExecutorOf(TaskId),
    AnyOf(Vec<Rule>),
    AllOf(Vec<Rule>),
}

impl Rule {
    pub fn role(role: Role) -> Self {
        Rule::HasRole(role)
    }

    pub fn admin() -> Self {
        Rule::HasRole(Role::Admin)
    }

    pub fn user(id: UserId) -> Self {
        Rule::IsUser(id)
    }

    pub fn executor_of(task_id: TaskId) -> Self {
        Rule::ExecutorOf(task_id)
    }

    pub fn self_or_admin(id: UserId) -> Self {
        Rule::admin().or(Rule::user(id))
    }

    pub fn executor_or_admin(task_id: TaskId) -> Self {
        Rule::admin().or(Rule::executor_of(task_id))
    }

    pub fn or(self, other: Rule) -> Self {
        match self {
            Rule::AnyOf(mut rules) => {
                rules.push(other);
                Rule::AnyOf(rules)
            }
            first => Rule::AnyOf(vec![first, other]),
        }
    }

    pub fn and(self, other: Rule) -> Self {
        match self {
            Rule::AllOf(mut rules) => {
                rules.push(other);
                Rule::AllOf(rules)
            }
            first => Rule::AllOf(vec![first, other]),
        }
    }

    /// Evaluate to `true`/`false`.
    ///
    /// Every branch of `AnyOf`/`AllOf` is evaluated, so a missing resource is
    /// reported even when another branch (e.g. the admin role) would grant.
    /// Anonymous callers satisfy only `Public` and never trigger a lookup.
    pub fn evaluate(
        &self,
        ctx: &SecurityContext,
        tasks: &dyn TaskOwnership,
    ) -> Result<bool, AuthzError> {
        match ctx.principal() {
            Some(principal) => self.evaluate_for(principal, tasks),
            None => Ok(self.allows_anonymous()),
        }
    }

    fn evaluate_for(
        &self,
        principal: &AuthenticatedPrincipal,
        tasks: &dyn TaskOwnership,
    ) -> Result<bool, AuthzError> {
        match self {
            Rule::Public | Rule::Authenticated => Ok(true),
            Rule::HasRole(role) => Ok(principal.has_role(*role)),
            Rule::IsUser(id) => Ok(principal.id == *id),
            Rule::ExecutorOf(task_id) => {
                let fact = tasks
                    .ownership(*task_id)
                    .ok_or(AuthzError::ResourceNotFound)?;
                let granted = fact.is_executed_by(principal.id);
                if !granted {
                    trace!(
                        task_id = %fact.task_id,
                        executor_id = ?fact.executor_id,
                        author_id = ?fact.author_id,
                        caller_id = %principal.id,
                        "caller is not the task executor"
                    );
                }
                Ok(granted)
            }
            Rule::AnyOf(rules) => {
                let outcomes = rules
                    .iter()
                    .map(|r| r.evaluate_for(principal, tasks))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(outcomes.into_iter().any(|granted| granted))
            }
            Rule::AllOf(rules) => {
                let outcomes = rules
                    .iter()
                    .map(|r| r.evaluate_for(principal, tasks))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(outcomes.into_iter().all(|granted| granted))
            }
        }
    }

    fn allows_anonymous(&self) -> bool {
        match self {
            Rule::Public => true,
            Rule::AnyOf(rules) => rules.iter().any(Rule::allows_anonymous),
            Rule::AllOf(rules) => rules.iter().all(Rule::allows_anonymous),
            _ => false,
        }
    }
}

/// Authorize an operation: `Ok(())` to proceed, `Denied` otherwise.
///
/// - No IO beyond the ownership lookup
/// - No panics
pub fn authorize(
    rule: &Rule,
    ctx: &SecurityContext,
    tasks: &dyn TaskOwnership,
) -> Result<(), AuthzError> {
    if rule.evaluate(ctx, tasks)? {
        Ok(())
    } else {
        Err(AuthzError::Denied)
    }
}
