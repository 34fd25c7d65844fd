//! List view state for one entity collection.
//!
//! All view state lives in [`ListState`] and changes only through
//! [`ListState::update`], which applies one [`ListMsg`] and may ask for a
//! backend call by returning a [`Command`]. The caller runs the command and
//! feeds the outcome back in as another message, so the whole state machine
//! can be exercised without a terminal or a network.

use tracing::{debug, error, info, warn};

use crate::api::types::{Entity, EntityId};
use crate::api::DeleteReport;
use crate::config::TableSettings;
use crate::table::{self, apply_filter, get_comparator, Order};
use crate::views::form::EntityForm;

/// Messages that drive a list view.
#[derive(Debug, Clone)]
pub enum ListMsg<E> {
    /// The view became active. Loads the collection the first time.
    Activate,
    /// Reload the collection.
    Refresh,
    /// The collection fetch finished.
    Loaded(Result<Vec<E>, String>),
    /// A column header was chosen.
    SortBy(String),
    /// The filter text changed.
    FilterChanged(String),
    /// Go to a page.
    PageChanged(usize),
    /// Change the page size.
    RowsPerPageChanged(usize),
    /// The select-all checkbox was checked or unchecked.
    SelectAll(bool),
    /// Toggle the selection of one record.
    ToggleSelected(EntityId),
    /// Move the row cursor by a number of rows.
    MoveCursor(isize),
    /// Open the dialog for a new record.
    OpenCreate,
    /// Open the dialog for an existing record.
    OpenEdit(EntityId),
    /// Close the dialog without saving.
    CloseModal,
    /// Confirm the dialog.
    Submit,
    /// The create call finished.
    Created(Result<E, String>),
    /// The update call for `id` finished.
    Updated {
        /// The record that was edited.
        id: EntityId,
        /// The updated record or the failure.
        result: Result<E, String>,
    },
    /// Delete one record.
    DeleteOne(EntityId),
    /// Delete every selected record.
    DeleteSelected,
    /// A delete batch settled.
    Deleted(DeleteReport),
    /// Close the alert dialog.
    DismissAlert,
}

/// Backend calls requested by the list view.
#[derive(Debug, Clone)]
pub enum Command<E> {
    /// Fetch the whole collection.
    FetchAll,
    /// Create a record.
    Create(E),
    /// Replace the record with the given ID.
    Update(EntityId, E),
    /// Delete records. Each ID is an independent call.
    Delete(Vec<EntityId>),
}

/// State of a list view.
#[derive(Debug, Clone)]
pub struct ListState<E> {
    /// The loaded collection, in backend order.
    items: Vec<E>,
    /// Whether a load has completed, successfully or not.
    loaded: bool,
    /// Whether a load is in flight.
    loading: bool,
    /// Zero-based page index.
    page: usize,
    /// Current page size.
    rows_per_page: usize,
    /// Page size settings.
    table: TableSettings,
    /// Sort direction.
    order: Order,
    /// Field being sorted on.
    order_by: String,
    /// Free-text name filter.
    filter_name: String,
    /// Selected IDs in the order they were picked.
    selected: Vec<EntityId>,
    /// The open add/edit dialog.
    form: Option<EntityForm<E>>,
    /// Blocking error message.
    alert: Option<String>,
    /// Non-blocking status line message.
    status: Option<String>,
    /// Highlighted row within the current page.
    cursor: usize,
}

impl<E: Entity> ListState<E> {
    /// Create an empty, unloaded view.
    pub fn new(table: TableSettings) -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            loading: false,
            page: 0,
            rows_per_page: table.default_rows_per_page,
            table,
            order: Order::Asc,
            order_by: E::default_sort().to_string(),
            filter_name: String::new(),
            selected: Vec::new(),
            form: None,
            alert: None,
            status: None,
            cursor: 0,
        }
    }

    /// Apply one message and return the backend call it needs, if any.
    pub fn update(&mut self, msg: ListMsg<E>) -> Option<Command<E>> {
        let resource = E::RESOURCE;
        match msg {
            ListMsg::Activate => {
                if self.loaded || self.loading {
                    return None;
                }
                debug!(%resource, "Loading collection");
                self.loading = true;
                Some(Command::FetchAll)
            }
            ListMsg::Refresh => {
                info!(%resource, "Refreshing collection");
                self.loading = true;
                Some(Command::FetchAll)
            }
            ListMsg::Loaded(Ok(items)) => {
                info!(%resource, count = items.len(), "Collection loaded");
                self.items = items;
                self.loaded = true;
                self.loading = false;
                self.status = None;
                let items = &self.items;
                self.selected.retain(|id| items.iter().any(|i| i.id() == id));
                self.clamp_view();
                None
            }
            ListMsg::Loaded(Err(e)) => {
                error!(%resource, error = %e, "Error fetching collection");
                self.loaded = true;
                self.loading = false;
                self.status = Some(format!("Failed to load {}: {}", resource, e));
                None
            }
            ListMsg::SortBy(property) => {
                let is_asc = self.order_by == property && self.order == Order::Asc;
                self.order = if is_asc { Order::Desc } else { Order::Asc };
                self.order_by = property;
                debug!(%resource, order = %self.order, order_by = %self.order_by, "Sort changed");
                None
            }
            ListMsg::FilterChanged(text) => {
                self.filter_name = text;
                self.page = 0;
                self.cursor = 0;
                None
            }
            ListMsg::PageChanged(page) => {
                self.page = page;
                self.cursor = 0;
                self.clamp_view();
                None
            }
            ListMsg::RowsPerPageChanged(rows) => {
                self.rows_per_page = if self.table.rows_per_page_options.contains(&rows) {
                    rows
                } else {
                    self.table.default_rows_per_page
                };
                self.page = 0;
                self.cursor = 0;
                None
            }
            ListMsg::SelectAll(checked) => {
                self.selected = if checked {
                    self.items.iter().map(|i| i.id().clone()).collect()
                } else {
                    Vec::new()
                };
                None
            }
            ListMsg::ToggleSelected(id) => {
                match self.selected.iter().position(|s| *s == id) {
                    Some(index) => {
                        self.selected.remove(index);
                    }
                    None => self.selected.push(id),
                }
                None
            }
            ListMsg::MoveCursor(delta) => {
                let rows = self.visible_len();
                if rows > 0 {
                    let next = self.cursor as isize + delta;
                    self.cursor = next.clamp(0, rows as isize - 1) as usize;
                }
                None
            }
            ListMsg::OpenCreate => {
                self.form = Some(EntityForm::blank());
                None
            }
            ListMsg::OpenEdit(id) => {
                match self.items.iter().find(|i| *i.id() == id) {
                    Some(record) => self.form = Some(EntityForm::for_edit(record)),
                    None => warn!(%resource, %id, "Cannot edit unknown record"),
                }
                None
            }
            ListMsg::CloseModal => {
                self.form = None;
                None
            }
            ListMsg::Submit => {
                let form = self.form.as_ref()?;
                match form.build() {
                    Ok(record) => match form.editing() {
                        Some(id) => Some(Command::Update(id.clone(), record)),
                        None => Some(Command::Create(record)),
                    },
                    Err(reason) => {
                        warn!(%resource, %reason, "Form rejected");
                        self.alert = Some(reason);
                        None
                    }
                }
            }
            ListMsg::Created(Ok(record)) => {
                info!(%resource, id = %record.id(), "Record added");
                self.items.push(record);
                self.form = None;
                None
            }
            ListMsg::Created(Err(e)) => {
                error!(%resource, error = %e, "Error adding record");
                self.alert = Some(format!("Failed to add {}: {}", resource.singular(), e));
                None
            }
            ListMsg::Updated { id, result: Ok(mut record) } => {
                info!(%resource, %id, "Record updated");
                record.set_id(id.clone());
                match self.items.iter_mut().find(|i| *i.id() == id) {
                    Some(slot) => *slot = record,
                    None => warn!(%resource, %id, "Updated record is no longer loaded"),
                }
                self.form = None;
                None
            }
            ListMsg::Updated { id, result: Err(e) } => {
                error!(%resource, %id, error = %e, "Error editing record");
                self.alert = Some(format!("Failed to save {}: {}", resource.singular(), e));
                None
            }
            ListMsg::DeleteOne(id) => Some(Command::Delete(vec![id])),
            ListMsg::DeleteSelected => {
                if self.selected.is_empty() {
                    return None;
                }
                Some(Command::Delete(std::mem::take(&mut self.selected)))
            }
            ListMsg::Deleted(report) => {
                self.apply_delete_report(report);
                None
            }
            ListMsg::DismissAlert => {
                self.alert = None;
                None
            }
        }
    }

    /// Remove confirmed deletions and report the failures.
    fn apply_delete_report(&mut self, report: DeleteReport) {
        let resource = E::RESOURCE;
        if !report.deleted.is_empty() {
            info!(%resource, count = report.deleted.len(), "Records deleted");
        }

        let deleted = &report.deleted;
        self.items.retain(|i| !deleted.contains(i.id()));
        self.selected.retain(|id| !deleted.contains(id));

        if !report.is_complete() {
            for (id, reason) in &report.failed {
                error!(%resource, %id, %reason, "Error deleting record");
            }
            let details: Vec<String> = report
                .failed
                .iter()
                .map(|(id, reason)| format!("{} ({})", id, reason))
                .collect();
            self.alert = Some(format!(
                "Failed to delete {} {}: {}",
                report.failed.len(),
                if report.failed.len() == 1 {
                    resource.singular()
                } else {
                    resource.title()
                },
                details.join(", ")
            ));
        }

        self.clamp_view();
    }

    /// Keep the page and cursor inside the filtered results.
    fn clamp_view(&mut self) {
        let last_page = self.page_count() - 1;
        if self.page > last_page {
            self.page = last_page;
        }
        self.cursor = self.cursor.min(self.visible_len().saturating_sub(1));
    }

    /// The collection sorted and filtered for display.
    pub fn filtered(&self) -> Vec<&E> {
        let comparator = get_comparator(self.order, &self.order_by);
        apply_filter(&self.items, &comparator, &self.filter_name)
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&E> {
        let filtered = self.filtered();
        let range = table::visible_range(self.page, self.rows_per_page, filtered.len());
        filtered[range].to_vec()
    }

    fn visible_len(&self) -> usize {
        table::visible_range(self.page, self.rows_per_page, self.filtered().len()).len()
    }

    /// Filler rows for the current page.
    ///
    /// Counted against the whole loaded collection, not the filtered rows.
    pub fn empty_rows(&self) -> usize {
        table::empty_rows(self.page, self.rows_per_page, self.items.len())
    }

    /// Pages in the filtered results.
    pub fn page_count(&self) -> usize {
        table::page_count(self.rows_per_page, self.filtered().len())
    }

    /// Whether an active filter matched nothing.
    pub fn not_found(&self) -> bool {
        !self.filter_name.is_empty() && self.filtered().is_empty()
    }

    /// The record under the cursor.
    pub fn highlighted(&self) -> Option<&E> {
        self.visible_rows().get(self.cursor).copied()
    }

    /// Whether every loaded record is selected.
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.selected.len() == self.items.len()
    }

    /// Whether a record is selected.
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }

    /// The loaded collection.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Selected IDs.
    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current page size.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Page sizes the user can pick from.
    pub fn rows_per_page_options(&self) -> &[usize] {
        &self.table.rows_per_page_options
    }

    /// Sort direction.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Sort field.
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    /// Filter text.
    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    /// Cursor row within the page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The open dialog.
    pub fn form(&self) -> Option<&EntityForm<E>> {
        self.form.as_ref()
    }

    /// The open dialog, for key handling.
    pub fn form_mut(&mut self) -> Option<&mut EntityForm<E>> {
        self.form.as_mut()
    }

    /// Blocking error message.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Status line message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
