use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(AuthorId);
id_newtype!(CategoryId);
id_newtype!(BookId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, alias = "cover", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_accepts_legacy_cover_field() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "id": 2,
            "title": "1984",
            "authorId": 2,
            "categoryId": 2,
            "year": 1949,
            "cover": "https://images.example.com/1984.jpg"
        }))
        .expect("decode");
        assert_eq!(book.author_id, AuthorId(2));
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://images.example.com/1984.jpg")
        );
    }

    #[test]
    fn book_without_optional_fields_serializes_compactly() {
        let book = Book {
            id: BookId(9),
            title: "Untitled".into(),
            author_id: AuthorId(1),
            category_id: CategoryId(1),
            year: None,
            cover_url: None,
        };
        let json = serde_json::to_value(&book).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({ "id": 9, "title": "Untitled", "authorId": 1, "categoryId": 1 })
        );
    }
}
