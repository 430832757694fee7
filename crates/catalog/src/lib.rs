use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared::domain::{Author, AuthorId, Book, BookId, Category, CategoryId};
use thiserror::Error;
use tracing::{debug, info};

mod sample;

/// Raw catalog tables as they appear in a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub books: Vec<Book>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse JSON catalog '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse TOML catalog '{path}': {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("duplicate author id {0}")]
    DuplicateAuthor(AuthorId),
    #[error("duplicate category id {0}")]
    DuplicateCategory(CategoryId),
    #[error("duplicate book id {0}")]
    DuplicateBook(BookId),
    #[error("category {category} references unknown author {author}")]
    CategoryAuthorMissing {
        category: CategoryId,
        author: AuthorId,
    },
    #[error("book {book} references unknown author {author}")]
    BookAuthorMissing { book: BookId, author: AuthorId },
    #[error("book {book} references unknown category {category}")]
    BookCategoryMissing { book: BookId, category: CategoryId },
    #[error("book {book} has author {book_author} but its category {category} belongs to author {category_author}")]
    BookCategoryOwnerMismatch {
        book: BookId,
        book_author: AuthorId,
        category: CategoryId,
        category_author: AuthorId,
    },
}

/// Read-only, validated catalog of authors, categories and books.
///
/// All query results preserve the order in which records were loaded.
#[derive(Debug, Clone)]
pub struct Catalog {
    data: CatalogData,
    author_index: HashMap<AuthorId, usize>,
    category_index: HashMap<CategoryId, usize>,
}

impl Catalog {
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut author_index = HashMap::with_capacity(data.authors.len());
        for (idx, author) in data.authors.iter().enumerate() {
            if author_index.insert(author.id, idx).is_some() {
                return Err(CatalogError::DuplicateAuthor(author.id));
            }
        }

        let mut category_index = HashMap::with_capacity(data.categories.len());
        for (idx, category) in data.categories.iter().enumerate() {
            if !author_index.contains_key(&category.author_id) {
                return Err(CatalogError::CategoryAuthorMissing {
                    category: category.id,
                    author: category.author_id,
                });
            }
            if category_index.insert(category.id, idx).is_some() {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
        }

        let mut book_ids = HashSet::with_capacity(data.books.len());
        for book in &data.books {
            if !book_ids.insert(book.id) {
                return Err(CatalogError::DuplicateBook(book.id));
            }
            if !author_index.contains_key(&book.author_id) {
                return Err(CatalogError::BookAuthorMissing {
                    book: book.id,
                    author: book.author_id,
                });
            }
            let category = category_index
                .get(&book.category_id)
                .map(|idx| &data.categories[*idx])
                .ok_or(CatalogError::BookCategoryMissing {
                    book: book.id,
                    category: book.category_id,
                })?;
            if category.author_id != book.author_id {
                return Err(CatalogError::BookCategoryOwnerMismatch {
                    book: book.id,
                    book_author: book.author_id,
                    category: category.id,
                    category_author: category.author_id,
                });
            }
        }

        debug!(
            authors = data.authors.len(),
            categories = data.categories.len(),
            books = data.books.len(),
            "catalog validated"
        );

        Ok(Self {
            data,
            author_index,
            category_index,
        })
    }

    /// Loads a catalog file; `.toml` files are parsed as TOML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let data = if is_toml {
            toml::from_str::<CatalogData>(&raw).map_err(|source| CatalogError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_json::from_str::<CatalogData>(&raw).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?
        };

        let catalog = Self::from_data(data)?;
        info!(path = %path.display(), books = catalog.data.books.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Built-in demo catalog.
    pub fn sample() -> Self {
        Self::from_data(sample::sample_data()).expect("built-in sample catalog is consistent")
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn list_authors(&self) -> &[Author] {
        &self.data.authors
    }

    pub fn categories_for_author(&self, author_id: AuthorId) -> Vec<Category> {
        self.data
            .categories
            .iter()
            .filter(|category| category.author_id == author_id)
            .cloned()
            .collect()
    }

    pub fn books_matching(&self, author_id: AuthorId, category_id: CategoryId) -> Vec<Book> {
        self.data
            .books
            .iter()
            .filter(|book| book.author_id == author_id && book.category_id == category_id)
            .cloned()
            .collect()
    }

    pub fn author(&self, author_id: AuthorId) -> Option<&Author> {
        self.author_index
            .get(&author_id)
            .map(|idx| &self.data.authors[*idx])
    }

    pub fn author_name(&self, author_id: AuthorId) -> Option<&str> {
        self.author(author_id).map(|author| author.name.as_str())
    }

    pub fn category(&self, category_id: CategoryId) -> Option<&Category> {
        self.category_index
            .get(&category_id)
            .map(|idx| &self.data.categories[*idx])
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
