use crate::domain::value_objects::Isbn;
use crate::ports::review_service::{Result, ReviewService as ReviewServiceTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// レビュー提供元の障害
#[derive(Debug, Error)]
#[error("Review provider outage")]
pub struct ReviewOutage;

/// ReviewServiceのモック実装
///
/// 登録されたレビューを返す。登録のない書籍には`None`を返す。
/// 取得回数と`close()`の呼び出し回数を記録する。
#[derive(Default)]
pub struct ReviewService {
    reviews: Mutex<HashMap<Isbn, Vec<String>>>,
    unavailable: AtomicBool,
    fetch_count: AtomicUsize,
    close_count: AtomicUsize,
}

impl ReviewService {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用に書籍のレビューを登録
    pub fn add_reviews(&self, isbn: Isbn, reviews: Vec<String>) {
        self.reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(isbn, reviews);
    }

    /// テスト用に障害状態を切り替える
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewServiceTrait for ReviewService {
    async fn get_reviews_for_book(&self, isbn: &Isbn) -> Result<Option<Vec<String>>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Box::new(ReviewOutage));
        }

        let reviews = self.reviews.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(reviews.get(isbn).cloned())
    }

    fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}
