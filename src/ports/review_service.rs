use crate::domain::value_objects::Isbn;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// レビューサービスポート
///
/// 外部のレビュー提供元を抽象化する。
/// 提供元の障害はエラーとして返され、「レビューなし」（`Ok(None)` や空の列）とは区別される。
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// 書籍のレビューを提供元が返した順で取得する
    async fn get_reviews_for_book(&self, isbn: &Isbn) -> Result<Option<Vec<String>>>;

    /// 保持している接続を解放する
    ///
    /// 取得1回につき、結果にかかわらずちょうど1回呼ばれる。
    fn close(&self);
}
