use thiserror::Error;

use crate::{
    consts::consts::PersonId,
    gateway::{GatewayError, PersonApi},
    model::{
        person::{Person, PersonKindTag},
        validation::{validate_person, ValidationError, ValidationPolicy},
    },
    store::PersonStore,
    view::{
        columns::{Column, ColumnError, ColumnVisibility},
        filter::{filter, PersonFilter},
        sort::{sort_people, SortDirection},
        table::{render_table, Table},
    },
};

use super::{
    form::{FormError, FormField, FormMode, FormState},
    notify::{BusyIndicator, Notification, Notifier},
};

const CREATED_MESSAGE: &str = "Agregado correctamente.";
const UPDATED_MESSAGE: &str = "Datos actualizados correctamente.";
const DELETED_MESSAGE: &str = "Elemento eliminado correctamente.";
const LOAD_TRANSPORT_MESSAGE: &str = "No se pudo cargar la lista de personas. Intente nuevamente.";
const LOAD_DECODE_MESSAGE: &str = "No se pudieron cargar los datos.";
const CREATE_FAILED_MESSAGE: &str = "No se pudo realizar la operación. Por favor, intenta de nuevo.";
const DELETE_FAILED_MESSAGE: &str = "No se pudo realizar la operación";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Observable state. While a request is in flight the controller is mutably borrowed by the
/// submitting future, the busy indicator is what the surface sees of that phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    FormOpen(FormMode),
}

/// Keeps the store, the table view and the ABM form in sync
///
/// There is exactly one owner of the store: every mutation goes through `&mut self`, so two
/// submissions can never interleave.
pub struct Controller<G: PersonApi, N: Notifier> {
    gateway: G,
    notifier: N,
    policy: ValidationPolicy,
    store: PersonStore,
    filter: PersonFilter,
    columns: ColumnVisibility,
    /// Direction the next sort call uses
    sort_direction: SortDirection,
    /// Set by a sort call, cleared whenever the table is re-rendered from the store
    sorted_view: Option<Vec<Person>>,
    form: Option<FormState>,
}

impl<G: PersonApi, N: Notifier> Controller<G, N> {
    pub fn new(gateway: G, notifier: N, policy: ValidationPolicy) -> Self {
        Self {
            gateway,
            notifier,
            policy,
            store: PersonStore::new(),
            filter: PersonFilter::default(),
            columns: ColumnVisibility::default(),
            sort_direction: SortDirection::default(),
            sorted_view: None,
            form: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        match &self.form {
            Some(form) => ControllerState::FormOpen(form.mode()),
            None => ControllerState::Idle,
        }
    }

    pub fn store(&self) -> &PersonStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn active_filter(&self) -> PersonFilter {
        self.filter
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Replaces the store with the remote collection. Failures are notified and leave the
    /// store as it was.
    pub async fn load(&mut self) -> Result<usize, GatewayError> {
        log::info!("Loading people from the server");

        let result = {
            let _busy = BusyIndicator::show(&self.notifier);
            self.gateway.load().await
        };

        match result {
            Ok(people) => {
                self.store.replace_all(people);
                self.sorted_view = None;

                log::info!("Loaded {} people", self.store.len());

                Ok(self.store.len())
            }
            Err(e) => {
                log::error!("Unable to load people: {}", e);

                let message = if e.is_decode() {
                    LOAD_DECODE_MESSAGE
                } else {
                    LOAD_TRANSPORT_MESSAGE
                };
                self.notifier.notify(Notification::error(message));

                Err(e)
            }
        }
    }

    pub fn set_filter(&mut self, filter: PersonFilter) {
        log::debug!("Filter set to {}", filter);

        self.filter = filter;
        self.columns.apply_filter(filter);
        self.sorted_view = None;
    }

    /// Sorts the filtered records by one column. Every call flips the direction used by the
    /// next one. Returns the direction applied.
    pub fn sort(&mut self, column: Column) -> SortDirection {
        let direction = self.sort_direction;

        let mut view = filter(self.store.people(), self.filter);
        sort_people(&mut view, column, direction);

        self.sorted_view = Some(view);
        self.sort_direction = direction.flip();

        direction
    }

    pub fn toggle_column(&mut self, column: Column) -> Result<bool, ColumnError> {
        self.columns.toggle(column)
    }

    /// Records currently on screen: the sorted view if any, otherwise the filtered store
    pub fn visible_people(&self) -> Vec<Person> {
        match &self.sorted_view {
            Some(view) => view.clone(),
            None => filter(self.store.people(), self.filter),
        }
    }

    pub fn table(&self) -> Table {
        render_table(&self.visible_people(), &self.columns)
    }

    pub fn open_create(&mut self) {
        self.form = Some(FormState::create());
    }

    pub fn open_update(&mut self, id: PersonId) -> Result<(), FormError> {
        self.open_for_record(FormMode::Update, id)
    }

    pub fn open_delete(&mut self, id: PersonId) -> Result<(), FormError> {
        self.open_for_record(FormMode::Delete, id)
    }

    fn open_for_record(&mut self, mode: FormMode, id: PersonId) -> Result<(), FormError> {
        let person = self.store.get(id).ok_or(FormError::UnknownRecord(id))?;

        self.form = Some(FormState::for_record(mode, person));

        Ok(())
    }

    pub fn set_kind(&mut self, kind: PersonKindTag) -> Result<(), FormError> {
        self.form
            .as_mut()
            .ok_or(FormError::NoFormOpen)?
            .set_kind(kind)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), FormError> {
        self.form
            .as_mut()
            .ok_or(FormError::NoFormOpen)?
            .set_field(field, value)
    }

    /// Closes the form, nothing is sent
    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Commits the open form according to its mode. On success the form closes and the table
    /// is re-rendered from the store under the active filter; on failure the user is notified
    /// and the form stays open.
    pub async fn confirm(&mut self) -> Result<(), SubmitError> {
        let form = self.form.as_ref().ok_or(FormError::NoFormOpen)?;
        let mode = form.mode();

        let result = match mode {
            FormMode::Create | FormMode::Update => {
                let person = match validate_person(form.fields(), &self.policy) {
                    Ok(person) => person,
                    Err(e) => {
                        log::warn!("Rejected {} form: {}", mode, e);
                        self.notifier.notify(Notification::error(e.to_string()));

                        return Err(e.into());
                    }
                };

                if mode == FormMode::Create {
                    self.submit_create(person).await
                } else {
                    self.submit_update(person).await
                }
            }
            FormMode::Delete => {
                let id = form.fields().id.ok_or(FormError::MissingId)?;

                self.submit_delete(id).await
            }
        };

        if result.is_ok() {
            self.form = None;
            self.sorted_view = None;
        }

        result
    }

    async fn submit_create(&mut self, person: Person) -> Result<(), SubmitError> {
        let result = {
            let _busy = BusyIndicator::show(&self.notifier);
            self.gateway.create(&person).await
        };

        let id = match result {
            Ok(id) => id,
            Err(e) => {
                log::error!("Unable to create {}: {}", person, e);
                self.notifier
                    .notify(Notification::error(CREATE_FAILED_MESSAGE));

                return Err(e.into());
            }
        };

        let person = person.with_id(id);
        log::info!("Created {}", person);

        if let Err(e) = self.store.add(person) {
            // The server accepted it, the local copy is stale until the next load
            log::warn!("Created record not added locally: {}", e);
        }

        self.notifier.notify(Notification::info(CREATED_MESSAGE));

        Ok(())
    }

    async fn submit_update(&mut self, person: Person) -> Result<(), SubmitError> {
        let result = {
            let _busy = BusyIndicator::show(&self.notifier);
            self.gateway.update(&person).await
        };

        let message = match result {
            Ok(message) => message,
            Err(e) => {
                log::error!("Unable to update {}: {}", person, e);
                self.notifier.notify(Notification::error(format!(
                    "No se pudo realizar la modificación: {}",
                    e
                )));

                return Err(e.into());
            }
        };

        log::info!("Updated {}", person);

        if let Err(e) = self.store.update(person) {
            log::warn!("Updated record not found locally: {}", e);
        }

        let message = if message.trim().is_empty() {
            UPDATED_MESSAGE.to_string()
        } else {
            message
        };
        self.notifier.notify(Notification::info(message));

        Ok(())
    }

    async fn submit_delete(&mut self, id: PersonId) -> Result<(), SubmitError> {
        let result = {
            let _busy = BusyIndicator::show(&self.notifier);
            self.gateway.delete(id).await
        };

        if let Err(e) = result {
            log::error!("Unable to delete {}: {}", id, e);
            self.notifier
                .notify(Notification::error(DELETE_FAILED_MESSAGE));

            return Err(e.into());
        }

        log::info!("Deleted {}", id);

        if let Err(e) = self.store.remove(id) {
            log::warn!("Deleted record not found locally: {}", e);
        }

        self.notifier.notify(Notification::info(DELETED_MESSAGE));

        Ok(())
    }
}
