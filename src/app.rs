//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: [`App::update`]
//! applies events, [`App::handle_api_message`] applies backend outcomes and
//! [`App::view`] draws the current state.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace};

use crate::api::types::{Category, Entity, Product, Resource};
use crate::api::{ApiClient, EntityService};
use crate::config::Config;
use crate::error::AppError;
use crate::events::{map_list_key, Event, EventHandler, KeyAction, KeyContext};
use crate::tasks::{create_task_channel, ApiMessage, TaskSpawner};
use crate::ui::{self, TextInput};
use crate::views::{FormAction, ListMsg, ListState};

/// What a pane did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    /// The pane consumed the key.
    Handled,
    /// The key is for the application, not the pane.
    Global(KeyAction),
}

/// One resource screen: its list state, its backend and its filter box.
struct Pane<E: Entity> {
    state: ListState<E>,
    service: Arc<dyn EntityService<E>>,
    filter: TextInput,
    filtering: bool,
}

impl<E> Pane<E>
where
    E: Entity,
    ListMsg<E>: Into<ApiMessage>,
{
    fn new(state: ListState<E>, service: Arc<dyn EntityService<E>>) -> Self {
        Self {
            state,
            service,
            filter: TextInput::new(),
            filtering: false,
        }
    }

    /// Apply a message and start whatever backend call it asks for.
    fn send(&mut self, msg: ListMsg<E>, spawner: &TaskSpawner) {
        if let Some(command) = self.state.update(msg) {
            spawner.spawn_command(&self.service, command);
        }
    }

    fn key_context(&self) -> KeyContext {
        if self.state.alert().is_some() {
            KeyContext::Alert
        } else if self.state.form().is_some() {
            KeyContext::Form
        } else if self.filtering {
            KeyContext::Filter
        } else {
            KeyContext::List
        }
    }

    fn handle_key(&mut self, key: KeyEvent, spawner: &TaskSpawner) -> KeyOutcome {
        // The alert blocks all other input.
        if self.state.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.send(ListMsg::DismissAlert, spawner);
            }
            return KeyOutcome::Handled;
        }

        if let Some(form) = self.state.form_mut() {
            match form.handle_input(key) {
                Some(FormAction::Submit) => self.send(ListMsg::Submit, spawner),
                Some(FormAction::Cancel) => self.send(ListMsg::CloseModal, spawner),
                None => {}
            }
            return KeyOutcome::Handled;
        }

        if self.filtering {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.filtering = false,
                _ => {
                    if self.filter.handle_input(key) {
                        let text = self.filter.value().to_string();
                        self.send(ListMsg::FilterChanged(text), spawner);
                    }
                }
            }
            return KeyOutcome::Handled;
        }

        let Some(action) = map_list_key(key) else {
            return KeyOutcome::Handled;
        };
        let msg = match action {
            KeyAction::Quit | KeyAction::ToggleHelp | KeyAction::NextResource => {
                return KeyOutcome::Global(action);
            }
            KeyAction::Refresh => Some(ListMsg::Refresh),
            KeyAction::MoveDown => Some(ListMsg::MoveCursor(1)),
            KeyAction::MoveUp => Some(ListMsg::MoveCursor(-1)),
            KeyAction::PrevPage => self
                .state
                .page()
                .checked_sub(1)
                .map(ListMsg::PageChanged),
            KeyAction::NextPage => Some(ListMsg::PageChanged(self.state.page() + 1)),
            KeyAction::GrowPage => self.step_page_size(1).map(ListMsg::RowsPerPageChanged),
            KeyAction::ShrinkPage => self.step_page_size(-1).map(ListMsg::RowsPerPageChanged),
            KeyAction::ToggleSelected => self.highlighted_id().map(ListMsg::ToggleSelected),
            KeyAction::ToggleSelectAll => Some(ListMsg::SelectAll(!self.state.all_selected())),
            KeyAction::StartFilter => {
                self.filtering = true;
                None
            }
            KeyAction::ClearFilter => {
                if self.filter.value().is_empty() {
                    None
                } else {
                    self.filter.set_value("");
                    Some(ListMsg::FilterChanged(String::new()))
                }
            }
            KeyAction::CycleSort => Some(ListMsg::SortBy(self.next_sort_key())),
            KeyAction::OpenCreate => Some(ListMsg::OpenCreate),
            KeyAction::OpenEdit => self.highlighted_id().map(ListMsg::OpenEdit),
            KeyAction::DeleteRow => self.highlighted_id().map(ListMsg::DeleteOne),
            KeyAction::DeleteSelected => Some(ListMsg::DeleteSelected),
        };
        if let Some(msg) = msg {
            self.send(msg, spawner);
        }
        KeyOutcome::Handled
    }

    fn highlighted_id(&self) -> Option<crate::api::types::EntityId> {
        self.state.highlighted().map(|record| record.id().clone())
    }

    /// The neighbouring page size option, if there is one.
    fn step_page_size(&self, step: isize) -> Option<usize> {
        let options = self.state.rows_per_page_options();
        let current = options
            .iter()
            .position(|n| *n == self.state.rows_per_page())
            .unwrap_or(0);
        let next = current as isize + step;
        if next < 0 {
            return None;
        }
        options.get(next as usize).copied()
    }

    /// Ascending on a column flips it to descending; descending moves on to
    /// the next column, which starts ascending.
    fn next_sort_key(&self) -> String {
        let columns = E::columns();
        let current = self.state.order_by();
        if self.state.order() == crate::table::Order::Asc {
            return current.to_string();
        }
        let index = columns.iter().position(|c| c.key == current);
        let next = match index {
            Some(i) => (i + 1) % columns.len(),
            None => 0,
        };
        columns
            .get(next)
            .map(|c| c.key.to_string())
            .unwrap_or_else(|| current.to_string())
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        ui::render_list(frame, area, &self.state, &self.filter, self.filtering);
    }

    fn render_overlays(&self, frame: &mut Frame, area: Rect) {
        if let Some(form) = self.state.form() {
            ui::render_form(frame, area, form);
        }
        if let Some(alert) = self.state.alert() {
            ui::render_alert(frame, area, "Alert", alert);
        }
    }
}

/// The main application struct that holds all state.
pub struct App {
    config: Config,
    active: Resource,
    categories: Pane<Category>,
    products: Pane<Product>,
    spawner: TaskSpawner,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Create an application that talks to the given services.
    pub fn new(
        config: Config,
        categories: Arc<dyn EntityService<Category>>,
        products: Arc<dyn EntityService<Product>>,
        spawner: TaskSpawner,
    ) -> Self {
        debug!("Creating new application instance");
        let table = config.table.clone();
        Self {
            active: table.default_view,
            categories: Pane::new(ListState::new(table.clone()), categories),
            products: Pane::new(ListState::new(table), products),
            config,
            spawner,
            show_help: false,
            should_quit: false,
        }
    }

    /// Create an application backed by the REST endpoints in `config`.
    pub fn from_config(config: Config, spawner: TaskSpawner) -> Result<Self, AppError> {
        let client = ApiClient::new(&config.backend)?;
        let categories: Arc<dyn EntityService<Category>> = Arc::new(
            client.service::<Category>(config.backend.path_for(Resource::Categories)),
        );
        let products: Arc<dyn EntityService<Product>> =
            Arc::new(client.service::<Product>(config.backend.path_for(Resource::Products)));
        Ok(Self::new(config, categories, products, spawner))
    }

    /// Load the view that is shown first.
    pub fn start(&mut self) {
        info!(view = %self.active, "Starting");
        self.activate();
    }

    fn activate(&mut self) {
        match self.active {
            Resource::Categories => self.categories.send(ListMsg::Activate, &self.spawner),
            Resource::Products => self.products.send(ListMsg::Activate, &self.spawner),
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The resource on screen.
    pub fn active(&self) -> Resource {
        self.active
    }

    /// Whether the help panel is open.
    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// The categories list.
    pub fn categories(&self) -> &ListState<Category> {
        &self.categories.state
    }

    /// The products list.
    pub fn products(&self) -> &ListState<Product> {
        &self.products.state
    }

    /// The configuration the application was started with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Help panel blocks the table while open.
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        let outcome = match self.active {
            Resource::Categories => self.categories.handle_key(key, &self.spawner),
            Resource::Products => self.products.handle_key(key, &self.spawner),
        };

        if let KeyOutcome::Global(action) = outcome {
            match action {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::ToggleHelp => self.show_help = true,
                KeyAction::NextResource => {
                    self.active = self.active.next();
                    debug!(view = %self.active, "Switched view");
                    self.activate();
                }
                _ => {}
            }
        }
    }

    /// Apply the outcome of a background task.
    pub fn handle_api_message(&mut self, msg: ApiMessage) {
        match msg {
            ApiMessage::Categories(msg) => self.categories.send(msg, &self.spawner),
            ApiMessage::Products(msg) => self.products.send(msg, &self.spawner),
        }
    }

    fn key_context(&self) -> KeyContext {
        match self.active {
            Resource::Categories => self.categories.key_context(),
            Resource::Products => self.products.key_context(),
        }
    }

    /// Render the application UI.
    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        match self.active {
            Resource::Categories => self.categories.render(frame, chunks[1]),
            Resource::Products => self.products.render(frame, chunks[1]),
        }
        ui::render_context_help(frame, chunks[2], self.key_context());

        if self.show_help {
            ui::render_help(frame, chunks[1]);
        }
        match self.active {
            Resource::Categories => self.categories.render_overlays(frame, area),
            Resource::Products => self.products.render_overlays(frame, area),
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " Storedesk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        for resource in [Resource::Categories, Resource::Products] {
            let style = if resource == self.active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(resource.title(), style));
        }
        spans.push(Span::styled(
            format!("   {}", self.config.backend.base_url),
            Style::default().fg(Color::DarkGray),
        ));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, area);
    }
}

/// Run the terminal UI until the user quits.
pub async fn run(config: Config) -> Result<(), AppError> {
    let (mut rx, spawner) = create_task_channel();
    let mut app = App::from_config(config, spawner)?;
    let events = EventHandler::new();

    let mut terminal = ratatui::try_init()?;
    app.start();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.view(frame)) {
            break Err(AppError::from(e));
        }

        while let Ok(msg) = rx.try_recv() {
            app.handle_api_message(msg);
        }

        match tokio::task::block_in_place(|| events.next()) {
            Ok(event) => app.update(event),
            Err(e) => break Err(AppError::terminal(e.to_string())),
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    ratatui::try_restore()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::Result as ApiResult;
    use crate::api::types::EntityId;
    use crate::api::ApiError;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use std::sync::Mutex;
    use tokio::sync::mpsc::UnboundedReceiver;

    /// In-memory backend that mimics the REST service.
    struct MemoryService<E> {
        records: Mutex<Vec<E>>,
        next_id: Mutex<i64>,
    }

    impl<E: Entity> MemoryService<E> {
        fn new(records: Vec<E>) -> Self {
            let next_id = records.len() as i64 + 1;
            Self {
                records: Mutex::new(records),
                next_id: Mutex::new(next_id),
            }
        }
    }

    #[async_trait]
    impl<E: Entity> EntityService<E> for MemoryService<E> {
        async fn fetch_all(&self) -> ApiResult<Vec<E>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn add(&self, record: &E) -> ApiResult<E> {
            let mut next_id = self.next_id.lock().unwrap();
            let mut created = record.clone();
            created.set_id(EntityId::Number(*next_id));
            *next_id += 1;
            self.records.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn edit(&self, id: &EntityId, record: &E) -> ApiResult<E> {
            let mut records = self.records.lock().unwrap();
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
            *slot = record.clone();
            Ok(record.clone())
        }

        async fn delete(&self, id: &EntityId) -> ApiResult<bool> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id() != id);
            if records.len() == before {
                return Err(ApiError::NotFound(id.to_string()));
            }
            Ok(true)
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(key(KeyCode::Char(c)));
        }
    }

    fn create_test_app() -> (App, UnboundedReceiver<ApiMessage>) {
        let (rx_app, spawner) = create_task_channel();
        let categories = Arc::new(MemoryService::new(vec![
            Category::new(1, "Bags", "Carry things"),
            Category::new(2, "Hats", "Head wear"),
            Category::new(3, "bag clips", "Close bags"),
        ]));
        let products = Arc::new(MemoryService::new(vec![Product::new(1, "Tote", 4, 12.5)]));
        let app = App::new(Config::default(), categories, products, spawner);
        (app, rx_app)
    }

    /// Deliver the next background result to the app.
    async fn pump(app: &mut App, rx: &mut UnboundedReceiver<ApiMessage>) {
        let msg = rx.recv().await.expect("task channel closed");
        app.handle_api_message(msg);
    }

    #[tokio::test]
    async fn test_start_loads_default_view() {
        let (mut app, mut rx) = create_test_app();
        assert_eq!(app.active(), Resource::Categories);
        app.start();
        assert!(app.categories().is_loading());
        pump(&mut app, &mut rx).await;
        assert_eq!(app.categories().items().len(), 3);
        assert!(!app.products().is_loaded());
    }

    #[tokio::test]
    async fn test_tab_switches_and_loads_products() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Tab));
        assert_eq!(app.active(), Resource::Products);
        pump(&mut app, &mut rx).await;
        assert_eq!(app.products().items().len(), 1);

        // Switching back does not reload.
        app.update(key(KeyCode::Tab));
        assert_eq!(app.active(), Resource::Categories);
        assert!(!app.categories().is_loading());
    }

    #[tokio::test]
    async fn test_filter_mode_updates_results() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Char('/')));
        type_text(&mut app, "bag");
        assert_eq!(app.categories().filter_name(), "bag");
        assert_eq!(app.categories().visible_rows().len(), 2);

        // Keys typed while filtering never reach the table.
        assert!(!app.should_quit());
        app.update(key(KeyCode::Enter));
        app.update(key(KeyCode::Esc));
        assert_eq!(app.categories().filter_name(), "");
    }

    #[tokio::test]
    async fn test_add_record_through_form() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Char('n')));
        assert!(app.categories().form().is_some());
        // Focus starts on the ID field; move to the name.
        app.update(key(KeyCode::Tab));
        type_text(&mut app, "Scarves");
        app.update(key(KeyCode::Enter));
        pump(&mut app, &mut rx).await;

        assert!(app.categories().form().is_none());
        let added = app.categories().items().last().unwrap();
        assert_eq!(added.name, "Scarves");
        assert_eq!(added.id, EntityId::Number(4));
    }

    #[tokio::test]
    async fn test_empty_form_raises_alert_and_blocks_keys() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Char('n')));
        app.update(key(KeyCode::Enter));
        assert_eq!(app.categories().alert(), Some("Please fill in all fields"));

        app.update(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.update(key(KeyCode::Esc));
        assert!(app.categories().alert().is_none());
        assert!(app.categories().form().is_some());
    }

    #[tokio::test]
    async fn test_delete_highlighted_row() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        // Sorted ascending by name, the first row is "Bags".
        app.update(key(KeyCode::Char('d')));
        pump(&mut app, &mut rx).await;
        let names: Vec<&str> = app
            .categories()
            .items()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Hats", "bag clips"]);
    }

    #[tokio::test]
    async fn test_select_all_then_delete_selected() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Char('a')));
        assert!(app.categories().all_selected());
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('D'),
            KeyModifiers::SHIFT,
        )));
        pump(&mut app, &mut rx).await;
        assert!(app.categories().items().is_empty());
        assert!(app.categories().alert().is_none());
    }

    #[tokio::test]
    async fn test_sort_cycles_direction_then_column() {
        let (mut app, mut rx) = create_test_app();
        app.start();
        pump(&mut app, &mut rx).await;

        app.update(key(KeyCode::Char('s')));
        assert_eq!(app.categories().order_by(), "name");
        assert_eq!(app.categories().order(), crate::table::Order::Desc);

        app.update(key(KeyCode::Char('s')));
        assert_eq!(app.categories().order_by(), "description");
        assert_eq!(app.categories().order(), crate::table::Order::Asc);
    }

    #[tokio::test]
    async fn test_page_size_keys() {
        let (mut app, _rx) = create_test_app();
        app.update(key(KeyCode::Char('+')));
        assert_eq!(app.categories().rows_per_page(), 10);
        app.update(key(KeyCode::Char('-')));
        app.update(key(KeyCode::Char('-')));
        assert_eq!(app.categories().rows_per_page(), 5);
    }

    #[tokio::test]
    async fn test_help_toggle_and_quit() {
        let (mut app, _rx) = create_test_app();
        app.update(key(KeyCode::Char('?')));
        assert!(app.is_help_visible());
        app.update(key(KeyCode::Char('q')));
        assert!(!app.is_help_visible());
        assert!(!app.should_quit());

        app.update(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_quit_event() {
        let (mut app, _rx) = create_test_app();
        app.update(Event::Quit);
        assert!(app.should_quit());
    }
}
