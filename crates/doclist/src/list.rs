use crate::catalog::fetch_catalog;
use crate::prelude::{println, *};
use crate::render::{OutputFormat, TerminalPresenter};
use doclist_core::sync::MemoryHistory;
use doclist_core::{
    ConsultationMode, Event, LoadStatus, Navigator, SortKey, SyncController, ViewModel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Video,
    InClinic,
}

impl From<ModeArg> for ConsultationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Video => ConsultationMode::Video,
            ModeArg::InClinic => ConsultationMode::InClinic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortArg {
    Fees,
    Experience,
}

impl From<SortArg> for SortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Fees => SortKey::Fee,
            SortArg::Experience => SortKey::Experience,
        }
    }
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Query string to start from, e.g. "?search=ali&sort=experience"
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Search doctors by name (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Toggle a consultation mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Include a specialty (repeatable)
    #[arg(long = "specialty", value_name = "NAME")]
    pub specialties: Vec<String>,

    /// Toggle a sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Output as JSON (alias for --output json)
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

/// Intents implied by the command line flags, applied after URL hydration
pub fn intents(options: &ListOptions) -> Vec<Event> {
    let mut events = Vec::new();

    if let Some(search) = &options.search {
        events.push(Event::SearchChanged(search.clone()));
    }
    if let Some(mode) = options.mode {
        events.push(Event::ModeToggled(mode.into()));
    }
    for name in &options.specialties {
        events.push(Event::SpecialtyToggled {
            name: name.clone(),
            included: true,
        });
    }
    if let Some(sort) = options.sort {
        events.push(Event::SortToggled(sort.into()));
    }

    events
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let format = options.format();
    let mut controller = SyncController::new(
        MemoryHistory::new(&options.query),
        TerminalPresenter::deferred(format),
    );

    for event in intents(&options) {
        controller.dispatch(event);
    }

    if global.verbose {
        println!("Fetching doctors from {}", global.api_url);
    }

    let result = fetch_catalog(global.api_url.clone(), global.timeout).await;
    controller.dispatch(Event::DataArrived(result));

    if let LoadStatus::Failed(error) = controller.status() {
        return Err(Error::CatalogUnavailable(error.to_string()).into());
    }

    let query = controller.navigator().current_query();
    controller.presenter().print(ViewModel {
        visible: controller.visible(),
        state: controller.state(),
        specialties: controller.specialties(),
        status: controller.status(),
        query: &query,
        total: controller.dataset().len(),
    })
}
