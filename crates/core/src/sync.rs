//! Event-driven synchronization of view state, visible list and URL
//!
//! [`SyncController`] is the single consumer of user intents, navigation
//! events and the catalog fetch result. After every change of the view state
//! or the dataset it synchronously:
//!
//! 1. recomputes the visible list with [`filter::apply`],
//! 2. replaces the current URL entry when it no longer represents the state,
//! 3. hands a [`ViewModel`] to the presenter.
//!
//! Events raised while a cycle is running (for example by a presenter holding
//! an [`EventSender`]) are queued and processed in arrival order once the
//! cycle completes.

use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::FetchError;
use crate::filter;
use crate::provider::ProviderRecord;
use crate::query;
use crate::state::{ConsultationMode, SortKey, ViewState, ViewStateStore};

/// Inbound events, processed strictly in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SearchChanged(String),
    ModeToggled(ConsultationMode),
    SpecialtyToggled { name: String, included: bool },
    SortToggled(SortKey),
    /// The URL changed outside of this controller (back/forward, typed URL)
    UrlChanged(String),
    /// One-shot completion of the catalog fetch
    DataArrived(Result<Vec<ProviderRecord>, FetchError>),
}

impl Event {
    fn kind(&self) -> &'static str {
        match self {
            Event::SearchChanged(_) => "search_changed",
            Event::ModeToggled(_) => "mode_toggled",
            Event::SpecialtyToggled { .. } => "specialty_toggled",
            Event::SortToggled(_) => "sort_toggled",
            Event::UrlChanged(_) => "url_changed",
            Event::DataArrived(_) => "data_arrived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recomputing,
}

/// Lifecycle of the catalog fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(FetchError),
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub visible: &'a [ProviderRecord],
    pub state: &'a ViewState,
    /// Distinct specialties in the catalog, sorted
    pub specialties: &'a [String],
    pub status: &'a LoadStatus,
    /// Canonical query string for `state`, without the leading `?`
    pub query: &'a str,
    /// Number of records in the catalog before filtering
    pub total: usize,
}

/// Access to the page URL's query string
pub trait Navigator {
    /// Current query string, without the leading `?`
    fn current_query(&self) -> String;

    /// Overwrite the current history entry; never creates a new one
    fn replace_query(&mut self, query: &str);
}

/// Consumer of derived view models
pub trait Presenter {
    fn render(&mut self, view: ViewModel<'_>);

    /// Called exactly once when the catalog fetch fails
    fn fetch_failed(&mut self, error: &FetchError);
}

#[derive(Debug)]
struct Inbox {
    queue: RefCell<VecDeque<Event>>,
    phase: Cell<Phase>,
}

/// Cloneable handle for raising events from inside presenter callbacks
#[derive(Debug, Clone)]
pub struct EventSender {
    inbox: Rc<Inbox>,
}

impl EventSender {
    /// Queue an event; it is processed by the next [`SyncController::dispatch`]
    /// or [`SyncController::process_pending`], or right after the running cycle
    pub fn send(&self, event: Event) {
        if self.inbox.phase.get() == Phase::Recomputing {
            debug!(
                "event=deferred module=sync kind={} reason=recomputing",
                event.kind()
            );
        }
        self.inbox.queue.borrow_mut().push_back(event);
    }
}

pub struct SyncController<N: Navigator, P: Presenter> {
    store: ViewStateStore,
    dataset: Vec<ProviderRecord>,
    specialties: Vec<String>,
    visible: Vec<ProviderRecord>,
    status: LoadStatus,
    inbox: Rc<Inbox>,
    navigator: N,
    presenter: P,
}

impl<N: Navigator, P: Presenter> SyncController<N, P> {
    /// Create a controller hydrated from the navigator's current URL
    ///
    /// The URL takes precedence over defaults. Nothing is rendered until the
    /// first event is processed.
    pub fn new(navigator: N, presenter: P) -> Self {
        let initial = query::decode(&navigator.current_query());
        info!(
            "event=hydrate module=sync source=initial_url query={}",
            query::encode(&initial)
        );

        Self {
            store: ViewStateStore::with_state(initial),
            dataset: Vec::new(),
            specialties: Vec::new(),
            visible: Vec::new(),
            status: LoadStatus::Loading,
            inbox: Rc::new(Inbox {
                queue: RefCell::new(VecDeque::new()),
                phase: Cell::new(Phase::Idle),
            }),
            navigator,
            presenter,
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            inbox: Rc::clone(&self.inbox),
        }
    }

    /// Queue `event` and process everything pending, in order
    pub fn dispatch(&mut self, event: Event) {
        self.inbox.queue.borrow_mut().push_back(event);
        self.process_pending();
    }

    /// Process events queued through an [`EventSender`]
    pub fn process_pending(&mut self) {
        if self.inbox.phase.get() == Phase::Recomputing {
            return;
        }
        loop {
            let next = self.inbox.queue.borrow_mut().pop_front();
            match next {
                Some(event) => self.handle(event),
                None => break,
            }
        }
    }

    /// Re-run a full cycle without any change, e.g. to redraw on request
    pub fn refresh(&mut self) {
        if self.inbox.phase.get() == Phase::Recomputing {
            return;
        }
        self.recompute();
        self.process_pending();
    }

    pub fn state(&self) -> &ViewState {
        self.store.state()
    }

    pub fn visible(&self) -> &[ProviderRecord] {
        &self.visible
    }

    pub fn dataset(&self) -> &[ProviderRecord] {
        &self.dataset
    }

    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn phase(&self) -> Phase {
        self.inbox.phase.get()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Mutable access for driving navigation (back/forward) from the shell
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn handle(&mut self, event: Event) {
        debug!("event=received module=sync kind={}", event.kind());

        let changed = match event {
            Event::SearchChanged(term) => self.store.set_search_term(term),
            Event::ModeToggled(mode) => self.store.toggle_consultation_mode(mode),
            Event::SpecialtyToggled { name, included } => {
                self.store.toggle_specialty(&name, included)
            }
            Event::SortToggled(key) => self.store.toggle_sort_key(key),
            Event::UrlChanged(raw) => {
                let changed = self.store.replace_all(query::decode(&raw));
                info!(
                    "event=hydrate module=sync source=navigation changed={}",
                    changed
                );
                changed
            }
            Event::DataArrived(result) => self.receive_dataset(result),
        };

        if changed {
            self.recompute();
        } else {
            debug!("event=skipped module=sync reason=unchanged");
        }
    }

    fn receive_dataset(&mut self, result: Result<Vec<ProviderRecord>, FetchError>) -> bool {
        if self.status != LoadStatus::Loading {
            warn!("event=dataset_ignored module=sync reason=already_settled");
            return false;
        }

        match result {
            Ok(records) => {
                info!(
                    "event=dataset_arrived module=sync status=ok records={}",
                    records.len()
                );
                self.specialties = filter::available_specialties(&records);
                self.dataset = records;
                self.status = LoadStatus::Ready;
                true
            }
            Err(error) => {
                warn!(
                    "event=dataset_arrived module=sync status=error error={}",
                    error
                );
                self.presenter.fetch_failed(&error);
                self.status = LoadStatus::Failed(error);
                true
            }
        }
    }

    fn recompute(&mut self) {
        self.inbox.phase.set(Phase::Recomputing);

        self.visible = match self.status {
            LoadStatus::Ready => filter::apply(&self.dataset, self.store.state()),
            LoadStatus::Loading | LoadStatus::Failed(_) => Vec::new(),
        };

        let encoded = query::encode(self.store.state());
        let current = self.navigator.current_query();
        if query::decode(&current) == *self.store.state() {
            debug!("event=url_unchanged module=sync query={}", current);
        } else {
            info!("event=url_replace module=sync query={}", encoded);
            self.navigator.replace_query(&encoded);
        }

        debug!(
            "event=recompute module=sync visible={} total={}",
            self.visible.len(),
            self.dataset.len()
        );

        self.presenter.render(ViewModel {
            visible: &self.visible,
            state: self.store.state(),
            specialties: &self.specialties,
            status: &self.status,
            query: &encoded,
            total: self.dataset.len(),
        });

        self.inbox.phase.set(Phase::Idle);
    }
}

/// In-memory browser history
///
/// Entries hold query strings without the leading `?`. Only external
/// navigation (`push`, `back`, `forward`) moves between entries; the
/// controller only ever replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![strip_question_mark(initial)],
            index: 0,
            replacements: 0,
        }
    }

    /// Navigate to a new URL, dropping any forward entries
    ///
    /// Returns the query to feed back as [`Event::UrlChanged`].
    pub fn push(&mut self, query: &str) -> String {
        self.entries.truncate(self.index + 1);
        self.entries.push(strip_question_mark(query));
        self.index = self.entries.len() - 1;
        self.entries[self.index].clone()
    }

    pub fn back(&mut self) -> Option<String> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    pub fn forward(&mut self) -> Option<String> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times the current entry was overwritten
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Navigator for MemoryHistory {
    fn current_query(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_default()
    }

    fn replace_query(&mut self, query: &str) {
        let query = strip_question_mark(query);
        match self.entries.get_mut(self.index) {
            Some(entry) => *entry = query,
            None => self.entries.push(query),
        }
        self.replacements += 1;
    }
}

fn strip_question_mark(query: &str) -> String {
    query.strip_prefix('?').unwrap_or(query).to_string()
}
