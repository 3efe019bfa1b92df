use std::sync::atomic::{AtomicBool, Ordering};

/// 書籍エンティティ
///
/// カタログは書籍を所有せず、共有参照（`Arc<dyn Book>`）を保存・取得する。
/// 貸出状態は共有参照越しに切り替えられるため、`&self` で変更する。
///
/// 外部で生成されたエンティティは欠損した項目を持ちうるため、
/// 識別子やタイトルは `Option` で返す。
pub trait Book: Send + Sync {
    fn isbn(&self) -> Option<&str>;

    fn title(&self) -> Option<&str>;

    fn author(&self) -> Option<&str>;

    fn is_borrowed(&self) -> bool;

    /// 貸出中にする
    fn borrow(&self);

    /// 返却済み（貸出可能）にする
    fn return_book(&self);
}

/// カタログに登録される標準の書籍
#[derive(Debug)]
pub struct CatalogBook {
    isbn: String,
    title: String,
    author: String,
    borrowed: AtomicBool,
}

impl CatalogBook {
    /// 貸出可能な状態で書籍を作成する
    ///
    /// 値の検証は登録時（`add_book`）に行う。
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            borrowed: AtomicBool::new(false),
        }
    }
}

impl Book for CatalogBook {
    fn isbn(&self) -> Option<&str> {
        Some(&self.isbn)
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn author(&self) -> Option<&str> {
        Some(&self.author)
    }

    fn is_borrowed(&self) -> bool {
        self.borrowed.load(Ordering::SeqCst)
    }

    fn borrow(&self) {
        self.borrowed.store(true, Ordering::SeqCst);
    }

    fn return_book(&self) {
        self.borrowed.store(false, Ordering::SeqCst);
    }
}
