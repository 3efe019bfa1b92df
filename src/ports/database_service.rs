use crate::domain::{
    book::Book,
    user::User,
    value_objects::{Isbn, UserId},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// データベースサービスポート
///
/// 書籍カタログと会員登録簿の保存先を抽象化する。
/// 呼び出し前に識別子とエンティティの検証は済んでいる。
#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// ISBNで書籍を取得する
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Arc<dyn Book>>>;

    /// 書籍をISBNをキーとして保存する
    async fn add_book(&self, isbn: &Isbn, book: Arc<dyn Book>) -> Result<()>;

    /// 書籍と借りた会員の対応を記録する
    async fn borrow_book(&self, isbn: &Isbn, user_id: &UserId) -> Result<()>;

    /// 返却を記録する
    async fn return_book(&self, isbn: &Isbn) -> Result<()>;

    /// IDで会員を取得する
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<Arc<dyn User>>>;

    /// 会員をIDをキーとして保存する
    async fn register_user(&self, user_id: &UserId, user: Arc<dyn User>) -> Result<()>;
}
