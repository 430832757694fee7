use super::*;

fn controller() -> SelectionController {
    SelectionController::new(Arc::new(Catalog::sample()))
}

#[test]
fn starts_with_nothing_selected() {
    let selection = controller();
    assert_eq!(selection.state(), SelectionState::NoAuthor);
    assert!(selection.offered_categories().is_empty());
    assert!(!selection.can_search());
    assert_eq!(selection.category_prompt(), CategoryPrompt::Disabled);
    assert!(!selection.category_prompt().enabled());
}

#[test]
fn choosing_author_offers_only_their_categories() {
    let mut selection = controller();
    let offered: Vec<_> = selection
        .choose_author(AuthorId(1))
        .expect("author")
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(offered, [CategoryId(1), CategoryId(4)]);
    assert_eq!(
        selection.state(),
        SelectionState::AuthorChosen { author: AuthorId(1) }
    );
    assert!(!selection.can_search());
    assert_eq!(selection.category_prompt().label(), CATEGORY_PLACEHOLDER);
}

#[test]
fn choosing_category_enables_search() {
    let mut selection = controller();
    selection.choose_author(AuthorId(2)).expect("author");
    selection.choose_category(CategoryId(2)).expect("category");
    assert!(selection.can_search());
    assert_eq!(
        selection.search_params(),
        Some((AuthorId(2), CategoryId(2)))
    );
}

#[test]
fn category_without_author_is_rejected() {
    let mut selection = controller();
    assert_eq!(
        selection.choose_category(CategoryId(1)),
        Err(SelectionError::NoAuthorSelected)
    );
    assert_eq!(selection.state(), SelectionState::NoAuthor);
}

#[test]
fn category_of_another_author_is_never_offered() {
    let mut selection = controller();
    selection.choose_author(AuthorId(1)).expect("author");
    assert!(selection
        .offered_categories()
        .iter()
        .all(|c| c.id != CategoryId(3)));
    assert_eq!(
        selection.choose_category(CategoryId(3)),
        Err(SelectionError::CategoryNotOffered {
            author: AuthorId(1),
            category: CategoryId(3)
        })
    );
    assert!(!selection.can_search());
}

#[test]
fn changing_author_resets_category_and_disables_search() {
    let mut selection = controller();
    selection.choose_author(AuthorId(1)).expect("author");
    selection.choose_category(CategoryId(4)).expect("category");
    assert!(selection.can_search());

    selection.choose_author(AuthorId(3)).expect("author");
    assert_eq!(
        selection.state(),
        SelectionState::AuthorChosen { author: AuthorId(3) }
    );
    assert_eq!(selection.state().category(), None);
    assert!(!selection.can_search());

    // Re-choosing the same author still drops the category.
    selection.choose_category(CategoryId(3)).expect("category");
    selection.choose_author(AuthorId(3)).expect("author");
    assert!(!selection.can_search());
}

#[test]
fn unknown_author_leaves_state_untouched() {
    let mut selection = controller();
    selection.choose_author(AuthorId(2)).expect("author");
    selection.choose_category(CategoryId(2)).expect("category");

    assert_eq!(
        selection.choose_author(AuthorId(99)).map(<[_]>::len),
        Err(SelectionError::UnknownAuthor(AuthorId(99)))
    );
    assert!(selection.can_search());
}

#[test]
fn clearing_author_returns_to_start() {
    let mut selection = controller();
    selection.choose_author(AuthorId(2)).expect("author");
    selection.choose_category(CategoryId(2)).expect("category");
    selection.clear_author();
    assert_eq!(selection.state(), SelectionState::NoAuthor);
    assert!(selection.offered_categories().is_empty());
    assert!(!selection.can_search());
}

#[test]
fn clearing_category_keeps_author() {
    let mut selection = controller();
    selection.choose_author(AuthorId(1)).expect("author");
    selection.choose_category(CategoryId(1)).expect("category");
    selection.clear_category();
    assert_eq!(
        selection.state(),
        SelectionState::AuthorChosen { author: AuthorId(1) }
    );
    assert!(!selection.can_search());
}

#[test]
fn author_without_categories_stays_unsearchable() {
    let mut data = Catalog::sample().data().clone();
    data.authors.push(shared::domain::Author {
        id: AuthorId(4),
        name: "Anonymous".into(),
    });
    let catalog = Catalog::from_data(data).expect("catalog");
    let mut selection = SelectionController::new(Arc::new(catalog));

    assert!(selection.choose_author(AuthorId(4)).expect("author").is_empty());
    assert_eq!(
        selection.state(),
        SelectionState::AuthorChosen { author: AuthorId(4) }
    );
    assert_eq!(selection.category_prompt(), CategoryPrompt::NoneAvailable);
    assert_eq!(
        selection.category_prompt().label(),
        NO_CATEGORIES_PLACEHOLDER
    );
    assert!(!selection.can_search());
}
