use std::sync::Arc;

use tracing::{info, warn};

use shopcart_auth::{AccountService, AccountStore, CredentialService, Hs256Credentials};
use shopcart_cart::{CartService, CartStore};
use shopcart_catalog::CatalogStore;
use shopcart_core::StoreError;
use shopcart_infra::{InMemoryAccountStore, InMemoryCartStore, InMemoryCatalogStore};

use crate::config::{AppConfig, Persistence};

pub type SharedCartService = CartService<Arc<dyn CatalogStore>, Arc<dyn CartStore>>;
pub type SharedAccountService = AccountService<Arc<dyn AccountStore>>;

/// Everything a handler can reach, shared behind one `Arc`.
pub struct AppServices {
    pub cart: SharedCartService,
    pub accounts: SharedAccountService,
}

impl AppServices {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        cart: Arc<dyn CartStore>,
        accounts: Arc<dyn AccountStore>,
        credentials: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            cart: CartService::new(catalog, cart),
            accounts: AccountService::new(accounts, credentials),
        }
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(InMemoryCartStore::new()),
            Arc::new(InMemoryAccountStore::new()),
            credentials(config),
        )
    }

    /// Pick the store backend named by the configuration.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match &config.persistence {
            Persistence::InMemory => {
                info!("using in-memory stores");
                Ok(Self::in_memory(config))
            }
            Persistence::Postgres { database_url } => {
                #[cfg(feature = "postgres")]
                {
                    Self::postgres(config, database_url).await
                }
                #[cfg(not(feature = "postgres"))]
                {
                    let _ = database_url;
                    warn!("USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory");
                    Ok(Self::in_memory(config))
                }
            }
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &AppConfig, database_url: &str) -> Result<Self, StoreError> {
        use shopcart_infra::stores::postgres;
        use shopcart_infra::{PostgresAccountStore, PostgresCartStore, PostgresCatalogStore};

        let pool = postgres::connect(database_url).await?;
        postgres::migrate(&pool).await?;
        info!("using postgres stores");

        Ok(Self::new(
            Arc::new(PostgresCatalogStore::new(pool.clone())),
            Arc::new(PostgresCartStore::new(pool.clone())),
            Arc::new(PostgresAccountStore::new(pool)),
            credentials(config),
        ))
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialService> {
        self.accounts.credentials()
    }
}

fn credentials(config: &AppConfig) -> Arc<dyn CredentialService> {
    Arc::new(Hs256Credentials::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ))
}
