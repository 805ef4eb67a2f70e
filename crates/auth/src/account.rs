//! Account registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use shopcart_core::{Entity, StoreResult, UserId};

use crate::{AuthError, CredentialService, IssuedToken, PasswordHash};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub name: String,
    /// Normalized (trimmed, lowercase).
    pub email: String,
    pub password_hash: PasswordHash,
}

impl Entity for Account {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Account persistence boundary. A taken email is `StoreError::Duplicate`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: Account) -> StoreResult<Account>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn create(&self, account: Account) -> StoreResult<Account> {
        (**self).create(account).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        (**self).find_by_email(email).await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register/login on top of an account store and a credential service.
pub struct AccountService<A> {
    accounts: A,
    credentials: Arc<dyn CredentialService>,
}

impl<A> AccountService<A>
where
    A: AccountStore,
{
    pub fn new(accounts: A, credentials: Arc<dyn CredentialService>) -> Self {
        Self { accounts, credentials }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialService> {
        &self.credentials
    }

    #[instrument(skip_all)]
    pub async fn register(&self, new: NewAccount) -> Result<Account, AuthError> {
        let name = new.name.trim();
        let email = normalize_email(&new.email);
        if name.is_empty() || email.is_empty() || new.password.is_empty() {
            return Err(AuthError::Validation(
                "name, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("email is malformed".to_string()));
        }

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Duplicate);
        }

        let account = Account {
            id: UserId::new(),
            name: name.to_string(),
            email,
            password_hash: self.credentials.hash(&new.password)?,
        };
        let account = self.accounts.create(account).await?;
        info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = normalize_email(email);
        let Some(account) = self.accounts.find_by_email(&email).await? else {
            warn!("login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.credentials.verify(password, &account.password_hash) {
            warn!(user_id = %account.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.credentials.issue_token(account.id)?;
        info!(user_id = %account.id, "login succeeded");
        Ok(token)
    }

    pub fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        self.credentials.verify_token(token)
    }
}
