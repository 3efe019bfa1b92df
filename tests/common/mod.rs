#![allow(dead_code)]

use async_trait::async_trait;
use rusty_library_catalog::adapters::mock::{
    DatabaseService as InMemoryDatabaseService, NotificationService as MockNotificationService,
    ReviewService as MockReviewService,
};
use rusty_library_catalog::application::library::ServiceDependencies;
use rusty_library_catalog::domain::{Book, Isbn, User, UserId};
use rusty_library_catalog::ports::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VALID_ISBN: &str = "978-3-16-148410-0";
pub const VALID_USER_ID: &str = "123456789012";

// ============================================================================
// 呼び出し回数を記録する書籍
// ============================================================================

/// 各アクセサの呼び出し回数を記録する書籍
///
/// 検証の短絡評価（失敗後の項目を読まないこと）の確認に使う。
pub struct CountingBook {
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    borrowed: AtomicBool,
    check_delay: Option<Duration>,
    pub isbn_calls: AtomicUsize,
    pub title_calls: AtomicUsize,
    pub author_calls: AtomicUsize,
    pub borrowed_calls: AtomicUsize,
    pub borrow_calls: AtomicUsize,
    pub return_calls: AtomicUsize,
}

impl CountingBook {
    pub fn new(isbn: Option<&str>, title: Option<&str>, author: Option<&str>) -> Self {
        Self {
            isbn: isbn.map(str::to_string),
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            borrowed: AtomicBool::new(false),
            check_delay: None,
            isbn_calls: AtomicUsize::new(0),
            title_calls: AtomicUsize::new(0),
            author_calls: AtomicUsize::new(0),
            borrowed_calls: AtomicUsize::new(0),
            borrow_calls: AtomicUsize::new(0),
            return_calls: AtomicUsize::new(0),
        }
    }

    /// 有効な項目をすべて持つ書籍
    pub fn valid() -> Self {
        Self::new(Some(VALID_ISBN), Some("New-Book"), Some("James Bond"))
    }

    pub fn with_borrowed(self, borrowed: bool) -> Self {
        self.borrowed.store(borrowed, Ordering::SeqCst);
        self
    }

    /// 貸出状態の確認に時間がかかる書籍（同時実行の確認用）
    pub fn with_check_delay(self, delay: Duration) -> Self {
        Self {
            check_delay: Some(delay),
            ..self
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl Book for CountingBook {
    fn isbn(&self) -> Option<&str> {
        self.isbn_calls.fetch_add(1, Ordering::SeqCst);
        self.isbn.as_deref()
    }

    fn title(&self) -> Option<&str> {
        self.title_calls.fetch_add(1, Ordering::SeqCst);
        self.title.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author_calls.fetch_add(1, Ordering::SeqCst);
        self.author.as_deref()
    }

    fn is_borrowed(&self) -> bool {
        self.borrowed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.check_delay {
            std::thread::sleep(delay);
        }
        self.borrowed.load(Ordering::SeqCst)
    }

    fn borrow(&self) {
        self.borrow_calls.fetch_add(1, Ordering::SeqCst);
        self.borrowed.store(true, Ordering::SeqCst);
    }

    fn return_book(&self) {
        self.return_calls.fetch_add(1, Ordering::SeqCst);
        self.borrowed.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// 呼び出し回数を記録する会員
// ============================================================================

/// 各アクセサの呼び出し回数を記録する会員
pub struct CountingUser {
    id: Option<String>,
    name: Option<String>,
    channel: Option<Arc<dyn NotificationService>>,
    pub id_calls: AtomicUsize,
    pub name_calls: AtomicUsize,
    pub channel_calls: AtomicUsize,
}

impl CountingUser {
    pub fn new(
        id: Option<&str>,
        name: Option<&str>,
        channel: Option<Arc<dyn NotificationService>>,
    ) -> Self {
        Self {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
            channel,
            id_calls: AtomicUsize::new(0),
            name_calls: AtomicUsize::new(0),
            channel_calls: AtomicUsize::new(0),
        }
    }

    pub fn valid(channel: Arc<dyn NotificationService>) -> Self {
        Self::new(Some(VALID_USER_ID), Some("Noa"), Some(channel))
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl User for CountingUser {
    fn id(&self) -> Option<&str> {
        self.id_calls.fetch_add(1, Ordering::SeqCst);
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        self.name.as_deref()
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        self.channel.clone()
    }

    async fn send_notification(&self, message: &str) -> notification_service::Result<()> {
        match &self.channel {
            Some(channel) => {
                channel
                    .send_notification(self.id.as_deref().unwrap_or_default(), message)
                    .await
            }
            None => Err("no notification channel".into()),
        }
    }
}

// ============================================================================
// 呼び出しを記録するDatabaseService
// ============================================================================

/// インメモリ実装をラップし、呼び出されたメソッド名を記録する
pub struct RecordingDatabase {
    inner: InMemoryDatabaseService,
    calls: Mutex<Vec<&'static str>>,
    fail_writes: AtomicBool,
}

impl RecordingDatabase {
    pub fn new() -> Self {
        Self {
            inner: InMemoryDatabaseService::new(),
            calls: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// 書き込み系のメソッドだけを失敗させる
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> database_service::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("write rejected".into());
        }
        Ok(())
    }

    pub fn inner(&self) -> &InMemoryDatabaseService {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|name| **name == method).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

#[async_trait]
impl DatabaseService for RecordingDatabase {
    async fn get_book_by_isbn(
        &self,
        isbn: &Isbn,
    ) -> database_service::Result<Option<Arc<dyn Book>>> {
        self.record("get_book_by_isbn");
        self.inner.get_book_by_isbn(isbn).await
    }

    async fn add_book(&self, isbn: &Isbn, book: Arc<dyn Book>) -> database_service::Result<()> {
        self.record("add_book");
        self.check_write()?;
        self.inner.add_book(isbn, book).await
    }

    async fn borrow_book(&self, isbn: &Isbn, user_id: &UserId) -> database_service::Result<()> {
        self.record("borrow_book");
        self.check_write()?;
        self.inner.borrow_book(isbn, user_id).await
    }

    async fn return_book(&self, isbn: &Isbn) -> database_service::Result<()> {
        self.record("return_book");
        self.check_write()?;
        self.inner.return_book(isbn).await
    }

    async fn get_user_by_id(
        &self,
        user_id: &UserId,
    ) -> database_service::Result<Option<Arc<dyn User>>> {
        self.record("get_user_by_id");
        self.inner.get_user_by_id(user_id).await
    }

    async fn register_user(
        &self,
        user_id: &UserId,
        user: Arc<dyn User>,
    ) -> database_service::Result<()> {
        self.record("register_user");
        self.check_write()?;
        self.inner.register_user(user_id, user).await
    }
}

// ============================================================================
// 応答しないReviewService
// ============================================================================

/// レビュー取得が完了しないReviewService
///
/// 取得中に呼び出し側の future が破棄された場合の`close()`を確認する。
#[derive(Default)]
pub struct HangingReviewService {
    close_count: AtomicUsize,
}

impl HangingReviewService {
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewService for HangingReviewService {
    async fn get_reviews_for_book(
        &self,
        _isbn: &Isbn,
    ) -> review_service::Result<Option<Vec<String>>> {
        std::future::pending().await
    }

    fn close(&self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// テスト環境
// ============================================================================

pub struct TestEnv {
    pub database: Arc<RecordingDatabase>,
    pub reviews: Arc<MockReviewService>,
    pub deps: ServiceDependencies,
}

impl TestEnv {
    pub fn new() -> Self {
        let database = Arc::new(RecordingDatabase::new());
        let reviews = Arc::new(MockReviewService::new());
        let deps = ServiceDependencies::new(database.clone(), reviews.clone());
        Self {
            database,
            reviews,
            deps,
        }
    }

    /// 書籍をストアに直接保存する（検証を通さない）
    pub async fn seed_book(&self, book: Arc<dyn Book>) {
        let isbn = Isbn::parse(book.isbn().unwrap()).unwrap();
        self.database.inner().add_book(&isbn, book).await.unwrap();
    }

    /// 会員をストアに直接保存する（検証を通さない）
    pub async fn seed_user(&self, user: Arc<dyn User>) {
        let user_id = UserId::parse(user.id().unwrap()).unwrap();
        self.database.inner().register_user(&user_id, user).await.unwrap();
    }

    pub fn isbn() -> Isbn {
        Isbn::parse(VALID_ISBN).unwrap()
    }
}

pub fn channel() -> Arc<MockNotificationService> {
    Arc::new(MockNotificationService::new())
}
