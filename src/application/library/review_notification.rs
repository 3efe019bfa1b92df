use crate::domain::{user::User, value_objects::Isbn};
use crate::ports::ReviewService;

use super::errors::{LibraryError, Result};
use super::library_service::{ServiceDependencies, find_book, find_user, parse_isbn, parse_user_id};

/// レビュー取得のスコープ
///
/// 生成から破棄までがレビューサービスの接続を保持する区間。
/// 破棄時に必ず`close()`を1回だけ呼ぶ（成功・レビューなし・障害・キャンセルのいずれでも）。
struct ReviewSession<'a> {
    review_service: &'a dyn ReviewService,
}

impl<'a> ReviewSession<'a> {
    fn open(review_service: &'a dyn ReviewService) -> Self {
        Self { review_service }
    }

    /// レビューを取得し、1件以上あることを確認する
    async fn fetch(&self, isbn: &Isbn) -> Result<Vec<String>> {
        let reviews = self
            .review_service
            .get_reviews_for_book(isbn)
            .await
            .map_err(|e| {
                tracing::error!(isbn = %isbn, error = %e, "Review service unavailable");
                LibraryError::ReviewServiceUnavailable(e)
            })?;

        match reviews {
            Some(reviews) if !reviews.is_empty() => Ok(reviews),
            _ => Err(LibraryError::NoReviewsFound),
        }
    }
}

impl Drop for ReviewSession<'_> {
    fn drop(&mut self) {
        self.review_service.close();
    }
}

/// レビューを取得する。セッションはこの関数を抜ける時点で閉じられる
async fn fetch_reviews(review_service: &dyn ReviewService, isbn: &Isbn) -> Result<Vec<String>> {
    let session = ReviewSession::open(review_service);
    session.fetch(isbn).await
}

/// 通知メッセージを組み立てる
///
/// 形式: `Reviews for '<title>':` の後にレビューを取得順に1行ずつ並べる。
pub fn format_review_notification(title: &str, reviews: &[String]) -> String {
    format!("Reviews for '{}':\n{}", title, reviews.join("\n"))
}

/// 会員の通知チャネルで配信する（最大`max_attempts`回、待機なし）
///
/// 途中の失敗はログに記録して握りつぶし、最初に成功した時点で終了する。
/// すべて失敗した場合は最後のエラーを原因として`NotificationFailure`を返す。
/// `max_attempts`が0の場合も1回は配信を試みる。
pub async fn deliver_with_retry(user: &dyn User, message: &str, max_attempts: u32) -> Result<()> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match user.send_notification(message).await {
            Ok(()) => {
                tracing::info!(attempt, "Notification delivered");
                return Ok(());
            }
            Err(e) if attempt < max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %e, "Notification attempt failed");
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    attempts = max_attempts,
                    error = %e,
                    "Notification failed on every attempt"
                );
                return Err(LibraryError::NotificationFailure {
                    attempts: max_attempts,
                    last_error: e,
                });
            }
        }
    }
}

/// 書籍のレビューを会員に通知する
///
/// 処理フロー：
/// 1. ISBNの検証
/// 2. 会員IDの検証
/// 3. 書籍の取得
/// 4. 会員の取得
/// 5. レビューの取得（レビューサービスはこの段階の終了時に必ず閉じる）
/// 6. メッセージの組み立て
/// 7. 再試行付きの配信
///
/// 配信の失敗でレビューを再取得することはない。
pub async fn notify_user_with_book_reviews(
    deps: &ServiceDependencies,
    isbn: &str,
    user_id: &str,
) -> Result<()> {
    tracing::debug!(isbn, user_id, "Notifying user with book reviews");

    let isbn = parse_isbn(isbn)?;
    let user_id = parse_user_id(user_id)?;

    let book = find_book(deps, &isbn).await?;
    let user = find_user(deps, &user_id).await?;

    let reviews = fetch_reviews(deps.review_service.as_ref(), &isbn).await?;

    let message = format_review_notification(book.title().unwrap_or_default(), &reviews);

    deliver_with_retry(user.as_ref(), &message, deps.config.max_notification_attempts).await
}
