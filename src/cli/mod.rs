use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

pub mod commands;
pub mod display;
pub mod session;
pub mod ui;

use crate::book::query::Window;
use crate::book::{AddressBook, Response};
use crate::db::SnapshotStore;
use crate::models::Name;
use display::{Renderer, ViewFormat};
use session::{Clock, Session};
use ui::InquirePrompter;

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(about = "Personal contact book for the command line")]
#[command(version)]
pub struct Cli {
    /// Address book file (defaults to the one in the data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// How results are shown
    #[arg(long, global = true, value_enum)]
    pub view: Option<ViewFormat>,
    /// Treat this day as today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn clock(&self) -> Clock {
        self.today.map(Clock::Fixed).unwrap_or(Clock::System)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all contacts
    List(ListArgs),
    /// Show one contact
    Show(ShowArgs),
    /// Find contacts whose details contain the query
    Search(SearchArgs),
    /// Contacts with a birthday in the given period
    Birthdays(BirthdaysArgs),
    /// Days left until a contact's birthday
    DaysTo(ShowArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Order by name or by age (oldest first)
    #[arg(short, long, value_enum)]
    pub sort: Option<SortKey>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Name,
    Age,
}

#[derive(Args)]
pub struct ShowArgs {
    pub name: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// At least two characters, matched case-sensitively
    pub query: String,
}

#[derive(Args)]
pub struct BirthdaysArgs {
    pub period: Period,
    /// Horizon in days for `within`
    #[arg(short, long, default_value_t = 7)]
    pub days: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
    Within,
}

impl BirthdaysArgs {
    pub fn window(&self) -> Result<Window> {
        Ok(match self.period {
            Period::ThisWeek => Window::ThisWeek,
            Period::NextWeek => Window::NextWeek,
            Period::ThisMonth => Window::ThisMonth,
            Period::NextMonth => Window::NextMonth,
            Period::Within if self.days > 365 => {
                return Err(anyhow!("--days must be between 0 and 365"))
            }
            Period::Within => Window::Upcoming(self.days),
        })
    }
}

/// Answer one subcommand against a loaded book.
pub fn run_command(book: &AddressBook, command: &Commands, today: NaiveDate) -> Result<Response> {
    Ok(match command {
        Commands::List(args) => match args.sort {
            None => book.show_all(),
            Some(SortKey::Name) => book.sort_by_name(),
            Some(SortKey::Age) => book.sort_by_age(today),
        },
        Commands::Show(args) => book.show_contact(&Name::parse(&args.name)?),
        Commands::Search(args) => {
            if args.query.chars().count() < 2 {
                return Err(anyhow!("Search is too short. Enter at least 2 symbols."));
            }
            book.search(&args.query)
        }
        Commands::Birthdays(args) => book.birthdays(args.window()?, today),
        Commands::DaysTo(args) => book.days_to_birthday(&Name::parse(&args.name)?, today),
    })
}

/// Run the interactive session, saving the book when it ends.
pub fn run_session(
    store: &SnapshotStore,
    renderer: Renderer,
    clock: Clock,
    greet: bool,
) -> Result<()> {
    // TTY check: interactive session requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive session requires a terminal. Use subcommands for non-interactive use:\n  \
            contactbook list\n  \
            contactbook search <query>\n  \
            contactbook birthdays next-week\n  \
            Run 'contactbook --help' for all options."
        ));
    }

    let book = store.load();
    let mut session = Session::new(book, renderer, InquirePrompter, clock);
    if greet {
        let _ = ui::clear_screen();
        session.greet();
    }
    session.run(store)
}
