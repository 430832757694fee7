use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use catalog::Catalog;
use client_core::{
    render::{BookCard, Cover, EMPTY_RESULTS_MESSAGE},
    render_phase,
    selection::AUTHOR_PLACEHOLDER,
    ResultsView, SearchSession, SelectionController, DEFAULT_SEARCH_LATENCY,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{AuthorId, BookId, CategoryId};

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::covers::CoverImage;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub catalog_path: Option<PathBuf>,
    pub search_latency: Duration,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            search_latency: DEFAULT_SEARCH_LATENCY,
        }
    }
}

impl StartupConfig {
    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        Ok(match &self.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::sample(),
        })
    }
}

/// A change requested by a widget this frame, applied after drawing.
enum UiAction {
    SelectAuthor(Option<AuthorId>),
    SelectCategory(Option<CategoryId>),
    Search,
}

/// Per-book cover download state; decoded pixels become a texture on first draw.
enum CoverState {
    Requested,
    Decoded(CoverImage),
    Ready(egui::TextureHandle),
    Failed,
}

pub struct BookBrowserApp {
    selection: SelectionController,
    session: SearchSession,
    covers: HashMap<BookId, CoverState>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
}

impl BookBrowserApp {
    pub fn new(
        catalog: Arc<Catalog>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            selection: SelectionController::new(catalog),
            session: SearchSession::new(),
            covers: HashMap::new(),
            cmd_tx,
            ui_rx,
            status: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn results_view(&self) -> ResultsView {
        render_phase(self.selection.catalog(), self.session.phase())
    }

    pub fn select_author(&mut self, author: Option<AuthorId>) {
        self.status.clear();
        match author {
            Some(author) => {
                if let Err(err) = self.selection.choose_author(author) {
                    self.status = err.to_string();
                }
            }
            None => self.selection.clear_author(),
        }
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.status.clear();
        match category {
            Some(category) => {
                if let Err(err) = self.selection.choose_category(category) {
                    self.status = err.to_string();
                }
            }
            None => self.selection.clear_category(),
        }
    }

    /// No-op unless both an author and a category are selected.
    pub fn start_search(&mut self) -> bool {
        let Some(ticket) = self.session.begin_for(&self.selection) else {
            return false;
        };
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Search { ticket },
            &mut self.status,
        ) {
            true
        } else {
            self.session.reset();
            false
        }
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::SearchFinished(outcome) => {
                    if self.session.apply(outcome) {
                        self.request_covers();
                    }
                }
                UiEvent::CoverLoaded { book_id, image } => {
                    self.covers.insert(book_id, CoverState::Decoded(image));
                }
                UiEvent::CoverFailed { book_id, reason } => {
                    tracing::debug!(%book_id, %reason, "keeping cover placeholder");
                    self.covers.insert(book_id, CoverState::Failed);
                }
                UiEvent::BackendFailed(message) => {
                    tracing::error!(%message, "backend worker failed");
                    self.status = message;
                }
            }
        }
    }

    /// Queues one download per shown cover that has not been requested yet.
    fn request_covers(&mut self) {
        let ResultsView::Results(cards) = self.results_view() else {
            return;
        };
        for card in cards {
            if self.covers.contains_key(&card.book_id) {
                continue;
            }
            let Cover::Image { url, .. } = card.cover else {
                continue;
            };
            let cmd = BackendCommand::FetchCover {
                book_id: card.book_id,
                url,
            };
            if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
                self.covers.insert(card.book_id, CoverState::Requested);
            }
        }
    }

    /// Returns the cover texture once it has loaded, uploading decoded pixels on first use.
    fn cover_texture(
        &mut self,
        ctx: &egui::Context,
        book_id: BookId,
    ) -> Option<egui::TextureHandle> {
        let state = self.covers.get_mut(&book_id)?;
        if let CoverState::Decoded(image) = &*state {
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
            *state = CoverState::Ready(ctx.load_texture(
                format!("book_cover_{book_id}"),
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
        match state {
            CoverState::Ready(texture) => Some(texture.clone()),
            CoverState::Requested | CoverState::Decoded(_) | CoverState::Failed => None,
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SelectAuthor(author) => self.select_author(author),
            UiAction::SelectCategory(category) => self.select_category(category),
            UiAction::Search => {
                self.start_search();
            }
        }
    }

    fn show_selectors(&self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;
        let catalog = self.selection.catalog();
        let state = self.selection.state();

        ui.horizontal_wrapped(|ui| {
            ui.label("Author");
            let author_text = state
                .author()
                .and_then(|id| catalog.author_name(id))
                .unwrap_or(AUTHOR_PLACEHOLDER);
            egui::ComboBox::from_id_salt("author_select")
                .selected_text(author_text)
                .width(220.0)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(state.author().is_none(), AUTHOR_PLACEHOLDER)
                        .clicked()
                    {
                        action = Some(UiAction::SelectAuthor(None));
                    }
                    for author in catalog.list_authors() {
                        let selected = state.author() == Some(author.id);
                        if ui.selectable_label(selected, author.name.as_str()).clicked() {
                            action = Some(UiAction::SelectAuthor(Some(author.id)));
                        }
                    }
                });

            ui.add_space(12.0);
            ui.label("Category");
            let prompt = self.selection.category_prompt();
            let category_text = state
                .category()
                .and_then(|id| catalog.category(id))
                .map(|c| c.name.as_str())
                .unwrap_or(prompt.label());
            ui.add_enabled_ui(prompt.enabled(), |ui| {
                egui::ComboBox::from_id_salt("category_select")
                    .selected_text(category_text)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(state.category().is_none(), prompt.label())
                            .clicked()
                        {
                            action = Some(UiAction::SelectCategory(None));
                        }
                        for category in self.selection.offered_categories() {
                            let selected = state.category() == Some(category.id);
                            if ui.selectable_label(selected, category.name.as_str()).clicked() {
                                action = Some(UiAction::SelectCategory(Some(category.id)));
                            }
                        }
                    });
            });

            ui.add_space(12.0);
            if ui
                .add_enabled(self.selection.can_search(), egui::Button::new("Search"))
                .clicked()
            {
                action = Some(UiAction::Search);
            }
        });

        action
    }

    fn show_results(&mut self, ui: &mut egui::Ui) {
        match self.results_view() {
            ResultsView::Hidden => {}
            ResultsView::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Searching…");
                });
            }
            ResultsView::Empty => {
                ui.label(egui::RichText::new(EMPTY_RESULTS_MESSAGE).italics());
            }
            ResultsView::Failed(message) => {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("Search failed: {message}"));
            }
            ResultsView::Results(cards) => {
                let ctx = ui.ctx().clone();
                let textures: Vec<_> = cards
                    .iter()
                    .map(|card| self.cover_texture(&ctx, card.book_id))
                    .collect();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for (card, texture) in cards.iter().zip(&textures) {
                            show_book_card(ui, card, texture.as_ref());
                        }
                    });
                });
            }
        }
    }
}

const COVER_MAX_SIZE: egui::Vec2 = egui::vec2(200.0, 260.0);

fn show_book_card(ui: &mut egui::Ui, card: &BookCard, texture: Option<&egui::TextureHandle>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(220.0);
        ui.vertical(|ui| {
            match (&card.cover, texture) {
                (Cover::Image { alt, .. }, Some(texture)) => {
                    let mut size = texture.size_vec2();
                    let scale = (COVER_MAX_SIZE.x / size.x)
                        .min(COVER_MAX_SIZE.y / size.y)
                        .min(1.0);
                    size *= scale;
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size))
                        .on_hover_text(alt.as_str());
                }
                // Until a cover arrives (or when it cannot be fetched) the card keeps the placeholder.
                _ => {
                    ui.label(egui::RichText::new("📖").size(40.0).weak());
                }
            }
            ui.label(egui::RichText::new(card.title.as_str()).strong().size(17.0));
            ui.label(card.byline());
            ui.label(egui::RichText::new(card.year_label.as_str()).weak());
        });
    });
}

impl eframe::App for BookBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut action = None;
        egui::TopBottomPanel::top("selectors").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Book Browser");
            action = self.show_selectors(ui);
            if !self.status.is_empty() {
                ui.colored_label(egui::Color32::LIGHT_RED, self.status.as_str());
            }
            ui.add_space(6.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| self.show_results(ui));

        if let Some(action) = action {
            self.apply(action);
        }

        if self.session.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
