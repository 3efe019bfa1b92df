use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::IdentifierError;

/// ISBNの形状：区切りなしの13桁、または `ddd-d-dd-dddddd-d` 型の5グループ
///
/// 5グループの場合、先頭は3桁、2番目は1〜5桁、末尾は1桁のチェックディジット。
static ISBN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{13}|[0-9]{3}-[0-9]{1,5}-[0-9]+-[0-9]+-[0-9])$")
        .expect("valid ISBN regex")
});

/// 会員ID：ちょうど12桁の数字
static USER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid user id regex"));

/// 著者名：英字の単語を空白・ハイフン・アポストロフィ1文字で連結したもの
static AUTHOR_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+(?:[ '-][A-Za-z]+)*$").expect("valid author name regex")
});

const ISBN_DIGITS: usize = 13;

/// ISBNの形状を検証する
///
/// チェックディジットの計算は行わない。グループ分けの形に加えて、
/// 数字がちょうど13個であること。
pub fn is_valid_isbn(isbn: &str) -> bool {
    ISBN_PATTERN.is_match(isbn) && isbn.bytes().filter(u8::is_ascii_digit).count() == ISBN_DIGITS
}

/// 会員IDの形式（12桁の数字）を検証する
pub fn is_valid_user_id(id: &str) -> bool {
    USER_ID_PATTERN.is_match(id)
}

/// 著者名の形式を検証する
///
/// 数字、先頭・末尾の区切り文字、連続した区切り文字は不可。
pub fn is_valid_author_name(name: &str) -> bool {
    AUTHOR_NAME_PATTERN.is_match(name)
}

/// ISBN - カタログ内で書籍を一意に識別する
///
/// 生成時に形状を検証するため、この型の値は常に有効なISBN。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if !is_valid_isbn(&value) {
            return Err(IdentifierError::InvalidIsbn(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会員ID - 会員登録簿で会員を一意に識別する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if !is_valid_user_id(&value) {
            return Err(IdentifierError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
