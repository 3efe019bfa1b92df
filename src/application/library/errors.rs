use thiserror::Error;

/// ライブラリアプリケーション層のエラー
///
/// 表示メッセージは呼び出し側に返す固定文字列。
#[derive(Debug, Error)]
pub enum LibraryError {
    /// 入力値が不正（null、識別子の形式違反、項目の欠損、重複登録など）
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// 書籍が見つからない
    #[error("Book not found!")]
    BookNotFound,

    /// 会員が登録されていない
    #[error("User not found!")]
    UserNotRegistered,

    /// 書籍が貸出中
    #[error("{0}")]
    BookAlreadyBorrowed(&'static str),

    /// 書籍が貸出されていない
    #[error("Book wasn't borrowed!")]
    BookNotBorrowed,

    /// レビューが1件もない
    #[error("No reviews found!")]
    NoReviewsFound,

    /// レビューサービスが一時的に利用できない
    #[error("Review service unavailable!")]
    ReviewServiceUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// すべての試行で通知に失敗した
    #[error("Notification failed!")]
    NotificationFailure {
        attempts: u32,
        #[source]
        last_error: Box<dyn std::error::Error + Send + Sync>,
    },

    /// DatabaseServiceのエラー
    #[error("Database error")]
    DatabaseError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryError>;
