//! Who is using the dashboard.
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SessionProvider: Send + Sync + 'static {
    /// ID of the signed-in user, or `None` when nobody is signed in
    async fn current_user_id(&self) -> Result<Option<String>>;
}

/// Session fixed at startup from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    user_id: Option<String>,
}

impl StaticSessionProvider {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
        }
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self::new(Some(user_id.into()))
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.user_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_session() {
        let session = StaticSessionProvider::signed_in("user-1");
        assert_eq!(session.current_user_id().await.unwrap().as_deref(), Some("user-1"));

        assert_eq!(StaticSessionProvider::signed_out().current_user_id().await.unwrap(), None);
        assert_eq!(StaticSessionProvider::new(Some("  ".to_string())).current_user_id().await.unwrap(), None);
    }
}
