/// 通知配信の既定の最大試行回数（初回 + 再試行4回）
pub const DEFAULT_MAX_NOTIFICATION_ATTEMPTS: u32 = 5;

/// 試行回数を上書きする環境変数
pub const NOTIFICATION_ATTEMPTS_ENV: &str = "LIBRARY_NOTIFICATION_ATTEMPTS";

/// ライブラリサービスの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryConfig {
    /// 通知配信の最大試行回数（1以上）
    pub max_notification_attempts: u32,
}

impl LibraryConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 未設定、数値でない、または0の場合は既定値を使う。
    pub fn from_env() -> Self {
        let raw = std::env::var(NOTIFICATION_ATTEMPTS_ENV).unwrap_or_default();
        Self::from_attempts_value(&raw)
    }

    fn from_attempts_value(raw: &str) -> Self {
        let max_notification_attempts = raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|attempts| *attempts > 0)
            .unwrap_or(DEFAULT_MAX_NOTIFICATION_ATTEMPTS);

        Self {
            max_notification_attempts,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            max_notification_attempts: DEFAULT_MAX_NOTIFICATION_ATTEMPTS,
        }
    }
}
