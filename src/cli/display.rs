//! Turns a [`Response`] into terminal text, as plain lines or tables.

use chrono::{Local, NaiveDateTime};
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color as CellColor,
    ContentArrangement, Table,
};
use crossterm::style::{style, Color, Stylize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, IsTerminal};

use crate::book::{ContactSummary, Level, Message, Response};

pub const EMPTY_BOOK: &str = "Address book is now empty. Please add some users";

const COLUMNS: [&str; 5] = ["Name", "Phones", "Birthday", "Email", "Address"];

const TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    /// One colored summary line per contact
    #[default]
    Text,
    /// Bordered tables
    Table,
}

impl ViewFormat {
    pub fn toggled(self) -> Self {
        match self {
            ViewFormat::Text => ViewFormat::Table,
            ViewFormat::Table => ViewFormat::Text,
        }
    }
}

impl fmt::Display for ViewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewFormat::Text => f.write_str("text"),
            ViewFormat::Table => f.write_str("table"),
        }
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Success => Color::Green,
        Level::Info => Color::Cyan,
        Level::Advisory => Color::Yellow,
        Level::Failure => Color::Red,
    }
}

fn cell_color(level: Level) -> CellColor {
    match level {
        Level::Success => CellColor::Green,
        Level::Info => CellColor::Cyan,
        Level::Advisory => CellColor::Yellow,
        Level::Failure => CellColor::Red,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    view: ViewFormat,
    color: bool,
}

impl Renderer {
    pub fn new(view: ViewFormat, color: bool) -> Self {
        Self { view, color }
    }

    /// Colors only when stdout is a terminal.
    pub fn for_stdout(view: ViewFormat) -> Self {
        Self::new(view, io::stdout().is_terminal())
    }

    pub fn view(&self) -> ViewFormat {
        self.view
    }

    pub fn set_view(&mut self, view: ViewFormat) {
        self.view = view;
    }

    pub fn render(&self, response: &Response) -> String {
        self.render_at(response, Local::now().naive_local())
    }

    /// `now` is shown in the Time column of message tables.
    pub fn render_at(&self, response: &Response, now: NaiveDateTime) -> String {
        match (self.view, response) {
            (_, Response::NoMatches(text)) => self.paint(text, Color::Yellow),
            (_, Response::BookEmpty) => self.paint(EMPTY_BOOK, Color::Red),
            (ViewFormat::Text, Response::Message(m)) => self.paint(&m.text, level_color(m.level)),
            (ViewFormat::Text, Response::Single(contact)) => {
                self.paint(&contact.line, Color::Cyan)
            }
            (ViewFormat::Text, Response::Listing { heading, contacts }) => {
                let mut out = self.paint(heading, Color::Yellow);
                for contact in contacts {
                    out.push('\n');
                    out.push_str(&self.paint(&contact.line, Color::Cyan));
                }
                out
            }
            (ViewFormat::Table, Response::Message(m)) => self.message_table(m, now),
            (ViewFormat::Table, Response::Single(contact)) => {
                self.contact_table("Contact's info", std::slice::from_ref(contact))
            }
            (ViewFormat::Table, Response::Listing { heading, contacts }) => format!(
                "{}\n{}",
                self.paint(heading, Color::Yellow),
                self.contact_table("Contacts' info", contacts)
            ),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn new_table(&self, columns: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                columns
                    .iter()
                    .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
            );
        if self.color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn contact_table(&self, title: &str, contacts: &[ContactSummary]) -> String {
        let mut table = self.new_table(&COLUMNS);
        for contact in contacts {
            let address: Vec<&str> = contact
                .address_parts()
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect();
            table.add_row(vec![
                Cell::new(&contact.name).fg(CellColor::Magenta),
                Cell::new(contact.phones.join(", ")),
                Cell::new(&contact.birthday),
                Cell::new(&contact.email),
                Cell::new(address.join(" / ")),
            ]);
        }
        format!("{}\n{table}", title)
    }

    fn message_table(&self, message: &Message, now: NaiveDateTime) -> String {
        let mut table = self.new_table(&["Message", "Time"]);
        table.add_row(vec![
            Cell::new(&message.text).fg(cell_color(message.level)),
            Cell::new(now.format(TIME_FORMAT)).fg(CellColor::Cyan),
        ]);
        format!("Result Messages\n{table}")
    }
}
