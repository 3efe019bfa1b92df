use crate::domain::{
    book::Book,
    user::User,
    value_objects::{Isbn, UserId},
};
use crate::ports::database_service::{DatabaseService as DatabaseServiceTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// インメモリDatabaseServiceのエラー
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// 障害を模擬している
    #[error("Database unavailable")]
    Unavailable,

    /// 貸出を記録しようとした書籍が保存されていない
    #[error("Book {0} is not stored")]
    UnknownBook(Isbn),
}

/// 貸出記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowRecord {
    pub user_id: UserId,
    pub borrowed_at: DateTime<Utc>,
}

/// DatabaseServiceのインメモリ実装
///
/// 書籍・会員・貸出記録をメモリ上に保持する。
/// `set_unavailable`で障害を模擬できる。
#[derive(Default)]
pub struct DatabaseService {
    books: Mutex<HashMap<Isbn, Arc<dyn Book>>>,
    users: Mutex<HashMap<UserId, Arc<dyn User>>>,
    borrow_records: Mutex<HashMap<Isbn, BorrowRecord>>,
    unavailable: AtomicBool,
}

impl DatabaseService {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用に障害状態を切り替える
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 書籍の貸出記録を取得する
    pub fn borrow_record(&self, isbn: &Isbn) -> Option<BorrowRecord> {
        self.borrow_records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(isbn)
            .cloned()
    }

    /// 書籍を借りている会員のIDを取得する
    pub fn borrower_of(&self, isbn: &Isbn) -> Option<UserId> {
        self.borrow_record(isbn).map(|record| record.user_id)
    }

    pub fn book_count(&self) -> usize {
        self.books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn user_count(&self) -> usize {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Box::new(DatabaseError::Unavailable));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseServiceTrait for DatabaseService {
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Arc<dyn Book>>> {
        self.ensure_available()?;
        let books = self.books.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(books.get(isbn).cloned())
    }

    async fn add_book(&self, isbn: &Isbn, book: Arc<dyn Book>) -> Result<()> {
        self.ensure_available()?;
        let mut books = self.books.lock().unwrap_or_else(PoisonError::into_inner);
        books.insert(isbn.clone(), book);
        Ok(())
    }

    async fn borrow_book(&self, isbn: &Isbn, user_id: &UserId) -> Result<()> {
        self.ensure_available()?;
        if !self
            .books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(isbn)
        {
            return Err(Box::new(DatabaseError::UnknownBook(isbn.clone())));
        }

        let record = BorrowRecord {
            user_id: user_id.clone(),
            borrowed_at: Utc::now(),
        };
        self.borrow_records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(isbn.clone(), record);
        Ok(())
    }

    async fn return_book(&self, isbn: &Isbn) -> Result<()> {
        self.ensure_available()?;
        self.borrow_records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(isbn);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<Arc<dyn User>>> {
        self.ensure_available()?;
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(user_id).cloned())
    }

    async fn register_user(&self, user_id: &UserId, user: Arc<dyn User>) -> Result<()> {
        self.ensure_available()?;
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        users.insert(user_id.clone(), user);
        Ok(())
    }
}
