mod errors;
mod library_service;
mod review_notification;

pub use errors::{LibraryError, Result};
pub use library_service::{
    ServiceDependencies, add_book, borrow_book, get_book_by_isbn, register_user, return_book,
};
pub use review_notification::{
    deliver_with_retry, format_review_notification, notify_user_with_book_reviews,
};
