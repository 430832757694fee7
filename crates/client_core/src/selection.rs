//! Cascading author → category selection state machine.

use std::sync::Arc;

use catalog::Catalog;
use shared::domain::{AuthorId, Category, CategoryId};
use thiserror::Error;
use tracing::debug;

pub const AUTHOR_PLACEHOLDER: &str = "-- Select an author --";
pub const CATEGORY_PLACEHOLDER: &str = "-- Select a category --";
pub const NO_CATEGORIES_PLACEHOLDER: &str = "-- No categories available --";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoAuthor,
    AuthorChosen {
        author: AuthorId,
    },
    CategoryChosen {
        author: AuthorId,
        category: CategoryId,
    },
}

impl SelectionState {
    pub fn author(&self) -> Option<AuthorId> {
        match *self {
            Self::NoAuthor => None,
            Self::AuthorChosen { author } | Self::CategoryChosen { author, .. } => Some(author),
        }
    }

    pub fn category(&self) -> Option<CategoryId> {
        match *self {
            Self::CategoryChosen { category, .. } => Some(category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("author {0} is not in the catalog")]
    UnknownAuthor(AuthorId),
    #[error("an author must be chosen before a category")]
    NoAuthorSelected,
    #[error("category {category} is not offered for author {author}")]
    CategoryNotOffered {
        author: AuthorId,
        category: CategoryId,
    },
}

/// How the category input should present itself for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPrompt {
    /// No author chosen; the input is disabled.
    Disabled,
    Choose,
    NoneAvailable,
}

impl CategoryPrompt {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disabled | Self::Choose => CATEGORY_PLACEHOLDER,
            Self::NoneAvailable => NO_CATEGORIES_PLACEHOLDER,
        }
    }

    pub fn enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

pub struct SelectionController {
    catalog: Arc<Catalog>,
    state: SelectionState,
    offered: Vec<Category>,
}

impl SelectionController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SelectionState::NoAuthor,
            offered: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Categories the category input may offer for the chosen author.
    pub fn offered_categories(&self) -> &[Category] {
        &self.offered
    }

    pub fn can_search(&self) -> bool {
        matches!(self.state, SelectionState::CategoryChosen { .. })
    }

    pub fn search_params(&self) -> Option<(AuthorId, CategoryId)> {
        match self.state {
            SelectionState::CategoryChosen { author, category } => Some((author, category)),
            _ => None,
        }
    }

    pub fn category_prompt(&self) -> CategoryPrompt {
        match self.state {
            SelectionState::NoAuthor => CategoryPrompt::Disabled,
            _ if self.offered.is_empty() => CategoryPrompt::NoneAvailable,
            _ => CategoryPrompt::Choose,
        }
    }

    /// Valid from every state. Always drops the chosen category and
    /// recomputes the offered categories.
    pub fn choose_author(&mut self, author: AuthorId) -> Result<&[Category], SelectionError> {
        if self.catalog.author(author).is_none() {
            return Err(SelectionError::UnknownAuthor(author));
        }

        self.offered = self.catalog.categories_for_author(author);
        self.state = SelectionState::AuthorChosen { author };
        debug!(%author, offered = self.offered.len(), "author chosen");
        Ok(self.offered.as_slice())
    }

    pub fn choose_category(&mut self, category: CategoryId) -> Result<(), SelectionError> {
        let author = self.state.author().ok_or(SelectionError::NoAuthorSelected)?;
        if !self.offered.iter().any(|c| c.id == category) {
            return Err(SelectionError::CategoryNotOffered { author, category });
        }

        self.state = SelectionState::CategoryChosen { author, category };
        debug!(%author, %category, "category chosen");
        Ok(())
    }

    /// The author placeholder was re-selected.
    pub fn clear_author(&mut self) {
        self.state = SelectionState::NoAuthor;
        self.offered.clear();
    }

    /// The category placeholder was re-selected.
    pub fn clear_category(&mut self) {
        if let SelectionState::CategoryChosen { author, .. } = self.state {
            self.state = SelectionState::AuthorChosen { author };
        }
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
