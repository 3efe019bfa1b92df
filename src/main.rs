use rusty_library_catalog::{
    adapters::mock::{
        database_service::DatabaseService as InMemoryDatabaseService,
        notification_service::NotificationService as MockNotificationService,
        review_service::ReviewService as MockReviewService,
    },
    application::library::{
        ServiceDependencies, add_book, borrow_book, get_book_by_isbn,
        notify_user_with_book_reviews, register_user, return_book,
    },
    config::LibraryConfig,
    domain::{CatalogBook, Isbn, LibraryUser},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_ISBN: &str = "978-3-16-148410-0";
const DEMO_USER_ID: &str = "123456789012";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LibraryConfig::from_env();
    tracing::info!(
        max_notification_attempts = config.max_notification_attempts,
        "Configuration loaded"
    );

    // Initialize adapters
    let database = Arc::new(InMemoryDatabaseService::new());
    let review_service = Arc::new(MockReviewService::new());
    let channel = Arc::new(MockNotificationService::failing_first(2));

    review_service.add_reviews(
        Isbn::parse(DEMO_ISBN)?,
        vec![
            "A masterpiece of world-building.".to_string(),
            "Long, but worth every page.".to_string(),
        ],
    );

    let deps =
        ServiceDependencies::new(database, review_service.clone()).with_config(config);

    // 書籍と会員の登録
    add_book(
        &deps,
        Some(Arc::new(CatalogBook::new(DEMO_ISBN, "Lord of the Rings", "John Tolkien"))),
    )
    .await?;
    register_user(
        &deps,
        Some(Arc::new(LibraryUser::new(DEMO_USER_ID, "Noa", channel.clone()))),
    )
    .await?;

    // 貸出と返却
    let book = get_book_by_isbn(&deps, DEMO_ISBN, DEMO_USER_ID).await?;
    tracing::info!(title = book.title().unwrap_or_default(), "Book available");

    borrow_book(&deps, DEMO_ISBN, DEMO_USER_ID).await?;
    return_book(&deps, DEMO_ISBN).await?;

    // レビュー通知
    notify_user_with_book_reviews(&deps, DEMO_ISBN, DEMO_USER_ID).await?;

    tracing::info!(
        delivery_attempts = channel.attempts(),
        review_sessions_closed = review_service.close_count(),
        "Demo finished"
    );
    Ok(())
}
