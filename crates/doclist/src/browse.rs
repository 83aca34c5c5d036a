use crate::catalog::fetch_catalog;
use crate::list::{ModeArg, SortArg};
use crate::prelude::{eprintln, println, *};
use crate::render::{self, OutputFormat, TerminalPresenter};
use colored::Colorize;
use doclist_core::filter::{suggestions, DEFAULT_SUGGESTION_LIMIT};
use doclist_core::sync::MemoryHistory;
use doclist_core::{Event, FetchError, Navigator, ProviderRecord, SyncController};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, clap::Args, Clone)]
pub struct BrowseOptions {
    /// Query string to start from, e.g. "?search=ali&sort=experience"
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Output format for each frame
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// One line typed in a browse session
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// User intent forwarded to the controller as is
    Intent(Event),
    /// Navigate to a new URL, pushing a history entry
    Goto(String),
    Back,
    Forward,
    Suggest(String),
    Specialties,
    Show,
    Url,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> std::result::Result<Option<BrowseCommand>, Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let parsed = match command {
        "search" => BrowseCommand::Intent(Event::SearchChanged(rest.to_string())),
        "mode" => {
            let mode = parse_value::<ModeArg>("mode", rest, "video|in-clinic")?;
            BrowseCommand::Intent(Event::ModeToggled(mode.into()))
        }
        "sort" => {
            let sort = parse_value::<SortArg>("sort", rest, "fees|experience")?;
            BrowseCommand::Intent(Event::SortToggled(sort.into()))
        }
        "specialty" => parse_specialty(rest)?,
        "goto" => BrowseCommand::Goto(rest.to_string()),
        "back" => BrowseCommand::Back,
        "forward" => BrowseCommand::Forward,
        "suggest" => BrowseCommand::Suggest(rest.to_string()),
        "specialties" => BrowseCommand::Specialties,
        "show" => BrowseCommand::Show,
        "url" => BrowseCommand::Url,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => return Err(Error::UnknownCommand(other.to_string())),
    };

    Ok(Some(parsed))
}

fn parse_value<T: clap::ValueEnum>(
    command: &'static str,
    value: &str,
    expected: &'static str,
) -> std::result::Result<T, Error> {
    if value.is_empty() {
        return Err(Error::MissingArgument { command, expected });
    }
    T::from_str(value, true).map_err(|_| Error::InvalidValue {
        command,
        value: value.to_string(),
        expected,
    })
}

/// `specialty <name...> on|off`; the name may contain spaces
fn parse_specialty(rest: &str) -> std::result::Result<BrowseCommand, Error> {
    const EXPECTED: &str = "<name> on|off";

    let Some((name, switch)) = rest.rsplit_once(char::is_whitespace) else {
        return Err(Error::MissingArgument {
            command: "specialty",
            expected: EXPECTED,
        });
    };

    let included = match switch {
        "on" => true,
        "off" => false,
        other => {
            return Err(Error::InvalidValue {
                command: "specialty",
                value: other.to_string(),
                expected: EXPECTED,
            })
        }
    };

    Ok(BrowseCommand::Intent(Event::SpecialtyToggled {
        name: name.trim().to_string(),
        included,
    }))
}

pub fn help_text() -> String {
    let commands = [
        ("search <text>", "Filter by doctor name (empty clears)"),
        ("mode video|in-clinic", "Toggle consultation mode"),
        ("specialty <name> on|off", "Check or uncheck a specialty"),
        ("sort fees|experience", "Toggle sort order"),
        ("goto <query>", "Navigate to a query string"),
        ("back / forward", "Move through history"),
        ("suggest <text>", "Suggest doctor names"),
        ("specialties", "List specialties in the catalog"),
        ("show", "Redraw the current list"),
        ("url", "Print the current query string"),
        ("quit", "Leave the session"),
    ];

    let mut result = format!("\n{}\n", "COMMANDS".bright_yellow().bold());
    for (usage, description) in commands {
        result.push_str(&format!("  {:<26} {}\n", usage.cyan(), description));
    }
    result
}

type Controller = SyncController<MemoryHistory, TerminalPresenter>;

pub async fn run(options: BrowseOptions, global: crate::Global) -> Result<()> {
    let mut controller = SyncController::new(
        MemoryHistory::new(&options.query),
        TerminalPresenter::live(options.output),
    );

    if global.verbose {
        println!("Fetching doctors from {}", global.api_url);
    }
    println!("{}", "Loading doctors...".yellow());
    print!("{}", help_text());

    let handle = tokio::spawn(fetch_catalog(global.api_url.clone(), global.timeout));
    let fetch = async move {
        handle
            .await
            .unwrap_or_else(|e| Err(FetchError::Request(e.to_string())))
    };

    session(&mut controller, fetch, BufReader::new(tokio::io::stdin())).await
}

/// Drive the controller from input lines while the catalog loads
///
/// The fetch result is dispatched exactly once. When the input ends before
/// the fetch does, the session waits for it so the catalog is still shown.
async fn session<F, R>(controller: &mut Controller, fetch: F, input: R) -> Result<()>
where
    F: Future<Output = std::result::Result<Vec<ProviderRecord>, FetchError>>,
    R: AsyncBufRead + Unpin,
{
    tokio::pin!(fetch);
    let mut fetched = false;
    let mut lines = input.lines();

    loop {
        tokio::select! {
            result = &mut fetch, if !fetched => {
                fetched = true;
                controller.dispatch(Event::DataArrived(result));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if !fetched {
                        let result = fetch.as_mut().await;
                        controller.dispatch(Event::DataArrived(result));
                    }
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(BrowseCommand::Quit)) => break,
                    Ok(Some(command)) => execute(controller, command),
                    Ok(None) => {}
                    Err(err) => eprintln!("{}", err.to_string().red()),
                }
            }
        }
    }

    Ok(())
}

fn execute(controller: &mut Controller, command: BrowseCommand) {
    match command {
        BrowseCommand::Intent(event) => controller.dispatch(event),
        BrowseCommand::Goto(query) => {
            let query = controller.navigator_mut().push(&query);
            controller.dispatch(Event::UrlChanged(query));
        }
        BrowseCommand::Back => match controller.navigator_mut().back() {
            Some(query) => controller.dispatch(Event::UrlChanged(query)),
            None => println!("{}", "Already at the oldest entry.".yellow()),
        },
        BrowseCommand::Forward => match controller.navigator_mut().forward() {
            Some(query) => controller.dispatch(Event::UrlChanged(query)),
            None => println!("{}", "Already at the newest entry.".yellow()),
        },
        BrowseCommand::Suggest(term) => {
            let names = suggestions(controller.dataset(), &term, DEFAULT_SUGGESTION_LIMIT);
            print!("{}", render::format_suggestions(&names));
        }
        BrowseCommand::Specialties => {
            print!(
                "{}",
                render::format_specialties(controller.specialties(), controller.state())
            );
        }
        BrowseCommand::Show => controller.refresh(),
        BrowseCommand::Url => println!("?{}", controller.navigator().current_query()),
        BrowseCommand::Help => print!("{}", help_text()),
        BrowseCommand::Quit => {}
    }
}
