use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 会員への通知配信メカニズムを抽象化する。
/// 実装はメール、SMS、プッシュ通知などが考えられる。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 会員にメッセージを送信する
    ///
    /// 一時的な配信失敗はエラーとして返す。呼び出し側が再試行を判断する。
    async fn send_notification(&self, user_id: &str, message: &str) -> Result<()>;
}
