use thiserror::Error;

/// 識別子のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// ISBNの形状が不正
    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),

    /// 会員IDの形式が不正
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
}
