use crate::config::LibraryConfig;
use crate::domain::{
    book::Book,
    user::User,
    value_objects::{Isbn, UserId, is_valid_author_name},
};
use crate::ports::*;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::{LibraryError, Result};

const INVALID_BOOK: &str = "Invalid book.";
const INVALID_ISBN: &str = "Invalid ISBN.";
const INVALID_TITLE: &str = "Invalid title.";
const INVALID_AUTHOR: &str = "Invalid author.";
const INVALID_BORROWED_STATE: &str = "Book with invalid borrowed state.";
const BOOK_ALREADY_EXISTS: &str = "Book already exists.";

const INVALID_USER: &str = "Invalid user.";
const INVALID_USER_ID: &str = "Invalid user Id.";
const INVALID_USER_NAME: &str = "Invalid user name.";
const INVALID_NOTIFICATION_SERVICE: &str = "Invalid notification service.";
const USER_ALREADY_EXISTS: &str = "User already exists.";

const BOOK_IS_ALREADY_BORROWED: &str = "Book is already borrowed!";
const BOOK_WAS_ALREADY_BORROWED: &str = "Book was already borrowed!";

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// テストではインメモリ実装に差し替える。
///
/// `loan_lock`は複製間で共有され、貸出状態の確認から記録までを直列化する。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub database: Arc<dyn DatabaseService>,
    pub review_service: Arc<dyn ReviewService>,
    pub config: LibraryConfig,
    loan_lock: Arc<Mutex<()>>,
}

impl ServiceDependencies {
    /// 既定の設定で依存関係を構築する
    pub fn new(
        database: Arc<dyn DatabaseService>,
        review_service: Arc<dyn ReviewService>,
    ) -> Self {
        Self {
            database,
            review_service,
            config: LibraryConfig::default(),
            loan_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_config(self, config: LibraryConfig) -> Self {
        Self { config, ..self }
    }
}

/// ISBNの形式を検証して値オブジェクトに変換する
pub(super) fn parse_isbn(isbn: &str) -> Result<Isbn> {
    Isbn::parse(isbn).map_err(|_| LibraryError::InvalidArgument(INVALID_ISBN))
}

/// 会員IDの形式を検証して値オブジェクトに変換する
pub(super) fn parse_user_id(user_id: &str) -> Result<UserId> {
    UserId::parse(user_id).map_err(|_| LibraryError::InvalidArgument(INVALID_USER_ID))
}

/// 書籍を取得する。存在しなければ`BookNotFound`
pub(super) async fn find_book(deps: &ServiceDependencies, isbn: &Isbn) -> Result<Arc<dyn Book>> {
    deps.database
        .get_book_by_isbn(isbn)
        .await
        .map_err(LibraryError::DatabaseError)?
        .ok_or(LibraryError::BookNotFound)
}

/// 会員を取得する。存在しなければ`UserNotRegistered`
pub(super) async fn find_user(
    deps: &ServiceDependencies,
    user_id: &UserId,
) -> Result<Arc<dyn User>> {
    deps.database
        .get_user_by_id(user_id)
        .await
        .map_err(LibraryError::DatabaseError)?
        .ok_or(LibraryError::UserNotRegistered)
}

/// 書籍をカタログに追加する
///
/// 検証は以下の順で行い、最初に失敗した項目のエラーを返す。
/// 失敗した時点で後続の項目は読まない。
/// 1. 書籍が渡されていること
/// 2. ISBNの形式
/// 3. タイトルが空でないこと
/// 4. 著者名の形式
/// 5. 貸出中でないこと
/// 6. 同じISBNの書籍が存在しないこと
pub async fn add_book(deps: &ServiceDependencies, book: Option<Arc<dyn Book>>) -> Result<()> {
    let book = book.ok_or(LibraryError::InvalidArgument(INVALID_BOOK))?;

    let isbn = book
        .isbn()
        .and_then(|isbn| Isbn::parse(isbn).ok())
        .ok_or(LibraryError::InvalidArgument(INVALID_ISBN))?;

    if book.title().is_none_or(str::is_empty) {
        return Err(LibraryError::InvalidArgument(INVALID_TITLE));
    }

    if !book.author().is_some_and(is_valid_author_name) {
        return Err(LibraryError::InvalidArgument(INVALID_AUTHOR));
    }

    if book.is_borrowed() {
        return Err(LibraryError::InvalidArgument(INVALID_BORROWED_STATE));
    }

    let existing = deps
        .database
        .get_book_by_isbn(&isbn)
        .await
        .map_err(LibraryError::DatabaseError)?;

    if existing.is_some() {
        return Err(LibraryError::InvalidArgument(BOOK_ALREADY_EXISTS));
    }

    deps.database
        .add_book(&isbn, book)
        .await
        .map_err(LibraryError::DatabaseError)?;

    tracing::info!(isbn = %isbn, "Book added to catalog");
    Ok(())
}

/// 会員を登録する
///
/// 検証順：会員が渡されていること → IDの形式 → 名前が空でないこと
/// → 通知チャネルがあること → 未登録であること。
pub async fn register_user(
    deps: &ServiceDependencies,
    user: Option<Arc<dyn User>>,
) -> Result<()> {
    let user = user.ok_or(LibraryError::InvalidArgument(INVALID_USER))?;

    let user_id = user
        .id()
        .and_then(|id| UserId::parse(id).ok())
        .ok_or(LibraryError::InvalidArgument(INVALID_USER_ID))?;

    if user.name().is_none_or(str::is_empty) {
        return Err(LibraryError::InvalidArgument(INVALID_USER_NAME));
    }

    if user.notification_service().is_none() {
        return Err(LibraryError::InvalidArgument(INVALID_NOTIFICATION_SERVICE));
    }

    let existing = deps
        .database
        .get_user_by_id(&user_id)
        .await
        .map_err(LibraryError::DatabaseError)?;

    if existing.is_some() {
        return Err(LibraryError::InvalidArgument(USER_ALREADY_EXISTS));
    }

    deps.database
        .register_user(&user_id, user)
        .await
        .map_err(LibraryError::DatabaseError)?;

    tracing::info!(user_id = %user_id, "User registered");
    Ok(())
}

/// 書籍を貸し出す
///
/// ISBNの検証と書籍の存在確認は会員IDの検証より先に行う。
/// 書籍が見つからなければ、会員IDが不正でも`BookNotFound`を返す。
///
/// 貸出状態の確認から記録までは`loan_lock`を保持して行うため、
/// 同時に呼ばれても貸出に成功するのは1件のみ。
/// 保存に失敗した場合は書籍の貸出状態を元に戻す。
pub async fn borrow_book(deps: &ServiceDependencies, isbn: &str, user_id: &str) -> Result<()> {
    tracing::debug!(isbn, user_id, "Borrowing book");

    // 1. ISBNの検証と書籍の取得
    let isbn = parse_isbn(isbn)?;
    let book = find_book(deps, &isbn).await?;

    // 2. 会員IDの検証と会員の取得
    let user_id = parse_user_id(user_id)?;
    find_user(deps, &user_id).await?;

    // 3. 貸出状態の確認（記録が終わるまでロックを保持する）
    let _loan = deps.loan_lock.lock().await;
    if book.is_borrowed() {
        return Err(LibraryError::BookAlreadyBorrowed(BOOK_IS_ALREADY_BORROWED));
    }

    // 4. 状態の変更と記録
    book.borrow();
    if let Err(e) = deps.database.borrow_book(&isbn, &user_id).await {
        book.return_book();
        return Err(LibraryError::DatabaseError(e));
    }

    tracing::info!(isbn = %isbn, user_id = %user_id, "Book borrowed");
    Ok(())
}

/// 書籍を返却する
///
/// 貸出中の書籍のみ返却できる。
pub async fn return_book(deps: &ServiceDependencies, isbn: &str) -> Result<()> {
    tracing::debug!(isbn, "Returning book");

    let isbn = parse_isbn(isbn)?;
    let book = find_book(deps, &isbn).await?;

    let _loan = deps.loan_lock.lock().await;
    if !book.is_borrowed() {
        return Err(LibraryError::BookNotBorrowed);
    }

    book.return_book();
    if let Err(e) = deps.database.return_book(&isbn).await {
        book.borrow();
        return Err(LibraryError::DatabaseError(e));
    }

    tracing::info!(isbn = %isbn, "Book returned");
    Ok(())
}

/// ISBNで貸出可能な書籍を取得する
///
/// 状態は変更しない。同じ書籍に対しては常に同じ参照を返す。
pub async fn get_book_by_isbn(
    deps: &ServiceDependencies,
    isbn: &str,
    user_id: &str,
) -> Result<Arc<dyn Book>> {
    let isbn = parse_isbn(isbn)?;
    parse_user_id(user_id)?;

    let book = find_book(deps, &isbn).await?;

    if book.is_borrowed() {
        return Err(LibraryError::BookAlreadyBorrowed(BOOK_WAS_ALREADY_BORROWED));
    }

    Ok(book)
}
