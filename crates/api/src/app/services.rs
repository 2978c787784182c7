//! Service wiring: stores, token service, account flow and gate.

use std::sync::Arc;

use tracing::info;

use tasktrack_auth::{
    AccountService, AuthenticationGate, CredentialError, CredentialStore, PasswordHasher,
    Registration, Role, TokenService,
};
use tasktrack_core::UserId;
use tasktrack_infra::{InMemoryCommentStore, InMemoryCredentialStore, InMemoryTaskStore};
use tasktrack_tasks::{Task, TaskStore};

use crate::app::errors::ApiError;
use crate::config::ApiConfig;

pub type Credentials = Arc<InMemoryCredentialStore>;

pub struct AppServices {
    pub credentials: Credentials,
    pub tasks: Arc<InMemoryTaskStore>,
    pub comments: Arc<InMemoryCommentStore>,
    pub accounts: AccountService<Credentials>,
    pub gate: AuthenticationGate<Credentials>,
}

impl AppServices {
    /// Wire everything from config and seed the bootstrap admin, if any.
    pub fn build(config: &ApiConfig) -> Result<Self, CredentialError> {
        let credentials: Credentials = Arc::new(InMemoryCredentialStore::new());
        let tokens = Arc::new(TokenService::with_validity(
            config.jwt_secret.as_bytes(),
            config.token_ttl,
        ));

        let accounts = AccountService::new(
            credentials.clone(),
            PasswordHasher::new(config.bcrypt_cost),
            tokens.clone(),
        )?;

        if let Some(seed) = &config.admin {
            let admin = accounts.ensure_account(Registration {
                email: seed.email.clone(),
                password: seed.password.clone(),
                role: Role::Admin,
            })?;
            info!(user_id = %admin.id, "bootstrap admin ready");
        }

        Ok(Self {
            gate: AuthenticationGate::new(tokens, credentials.clone()),
            credentials,
            tasks: Arc::new(InMemoryTaskStore::new()),
            comments: Arc::new(InMemoryCommentStore::new()),
            accounts,
        })
    }

    /// `Validation` unless the account exists.
    pub fn ensure_user(&self, id: UserId) -> Result<(), ApiError> {
        match self.credentials.find_by_id(id) {
            Some(_) => Ok(()),
            None => Err(ApiError::validation(format!("user {id} does not exist"))),
        }
    }

    /// Clear references to accounts removed between `ensure_user` and the insert.
    ///
    /// A concurrent user delete runs `forget_user` before the new task exists,
    /// so the task is re-checked once it is stored.
    pub fn drop_missing_users(&self, task: Task) -> Task {
        let missing: Vec<UserId> = [task.author_id, task.executor_id]
            .into_iter()
            .flatten()
            .filter(|id| self.credentials.find_by_id(*id).is_none())
            .collect();
        if missing.is_empty() {
            return task;
        }

        for user in missing {
            self.tasks.forget_user(user);
        }
        self.tasks.get(task.id).unwrap_or(task)
    }
}

/// Run bcrypt-bound work off the async workers.
pub async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_tasks::NewTask;

    fn services() -> AppServices {
        let config = ApiConfig::new("services-test").with_bcrypt_cost(4);
        AppServices::build(&config).unwrap()
    }

    fn register(services: &AppServices, email: &str) -> UserId {
        services
            .accounts
            .register(Registration {
                email: email.to_string(),
                password: "pw".to_string(),
                role: Role::User,
            })
            .unwrap()
            .id
    }

    #[test]
    fn task_referencing_a_removed_account_is_unassigned() {
        let services = services();
        let alice = register(&services, "alice@x.com");
        let bob = register(&services, "bob@x.com");

        // Bob is removed after his existence was checked but before the insert.
        services.accounts.delete(bob).unwrap();
        services.tasks.forget_user(bob);
        let task = services
            .tasks
            .create(NewTask {
                title: "race".to_string(),
                author_id: Some(alice),
                executor_id: Some(bob),
                ..NewTask::default()
            })
            .unwrap();

        let task = services.drop_missing_users(task);
        assert_eq!(task.executor_id, None);
        assert_eq!(task.author_id, Some(alice));
        assert_eq!(services.tasks.get(task.id).unwrap().executor_id, None);
    }

    #[test]
    fn task_with_live_accounts_is_untouched() {
        let services = services();
        let alice = register(&services, "alice@x.com");
        let task = services
            .tasks
            .create(NewTask {
                title: "fine".to_string(),
                author_id: Some(alice),
                executor_id: Some(alice),
                ..NewTask::default()
            })
            .unwrap();

        assert_eq!(services.drop_missing_users(task.clone()), task);
    }

    #[test]
    fn seeds_the_bootstrap_admin_once() {
        let config = ApiConfig::new("services-test")
            .with_bcrypt_cost(4)
            .with_admin("root@x.com", "root-pw");
        let services = AppServices::build(&config).unwrap();

        let admin = services.credentials.find_by_email("root@x.com").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(services.ensure_user(admin.id).is_ok());
        assert!(matches!(
            services.ensure_user(UserId::new(99)),
            Err(ApiError::Validation(_))
        ));
    }
}
