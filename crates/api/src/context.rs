use shopcart_core::UserId;

/// Authenticated caller for a request.
///
/// Present only on routes behind the auth middleware, and then only when a
/// valid bearer token was sent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
