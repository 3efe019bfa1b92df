use crate::ports::notification_service::{NotificationService, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// 会員エンティティ
///
/// 各会員は自分専用の通知チャネルを持つ。
/// 登録後はカタログ側から変更されない。
#[async_trait]
pub trait User: Send + Sync {
    fn id(&self) -> Option<&str>;

    fn name(&self) -> Option<&str>;

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>>;

    /// 会員の通知チャネルでメッセージを送信する
    ///
    /// 一時的な配信失敗はエラーとして返す。
    async fn send_notification(&self, message: &str) -> Result<()>;
}

/// 登録簿に登録される標準の会員
pub struct LibraryUser {
    id: String,
    name: String,
    notification_service: Arc<dyn NotificationService>,
}

impl LibraryUser {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notification_service,
        }
    }
}

#[async_trait]
impl User for LibraryUser {
    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>> {
        Some(Arc::clone(&self.notification_service))
    }

    async fn send_notification(&self, message: &str) -> Result<()> {
        self.notification_service
            .send_notification(&self.id, message)
            .await
    }
}
