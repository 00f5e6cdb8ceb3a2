//! The interactive command loop.
//!
//! A [`Session`] owns the book for the lifetime of the loop. Each command
//! prompts for its fields through a [`Prompter`], runs one book operation
//! with the day captured at the start of the command, and prints the
//! rendered [`Response`].

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{debug, info};
use std::fmt::Display;

use super::commands::{help_text, suggest, Command};
use super::display::Renderer;
use super::ui::CANCEL_HINT;
use crate::book::query::Window;
use crate::book::{AddressBook, Response};
use crate::db::SnapshotStore;
use crate::models::{
    AddressPart, Birthday, City, Country, Email, House, Name, Phone, Street, ValidationError,
};

pub use super::ui::{Answer, Prompter};

pub const FAREWELL: &str = "You've finished work with Contact book.";

const COMMAND_PROMPT: &str = "Enter your command (type 'help' or '00' for the list):";

const GREETING: [&str; 3] = [
    "I will help you organize your contact book.",
    "Using the command 'help', you can find out the list of available operations.",
    "Let's start and enjoy!!!",
];

/// Where "today" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

enum Part<T> {
    Given(T),
    Skipped,
    Cancelled,
}

/// A prompted value, or the response that ends the command early.
enum Reply<T> {
    Value(T),
    Done(Response),
}

/// Unwrap a [`Reply`], returning its response from the command otherwise.
macro_rules! take {
    ($reply:expr) => {
        match $reply? {
            Reply::Value(value) => value,
            Reply::Done(response) => return Ok(response),
        }
    };
}

fn cancelled() -> Response {
    Response::failure("Command cancelled")
}

mod ask {
    pub const NEW_CONTACT: &str = "Enter the name of the new contact";
    pub const RENAME: &str = "Enter the name of the contact you want to rename";
    pub const NEW_NAME: &str = "Enter a new name of the contact";
    pub const DELETE: &str = "Enter the name of the contact you want to delete";
    pub const CONTACT: &str = "Enter the name of the contact";
    pub const ADD_PHONE_TO: &str = "Enter the name of the contact whose phone you want to add";
    pub const PHONE_TO_ADD: &str = "Enter a phone which you want to add";
    pub const CHANGE_PHONE_OF: &str =
        "Enter the name of the contact whose phone you want to change";
    pub const OLD_PHONE: &str = "Enter the phone you want to change";
    pub const NEW_PHONE: &str = "Enter a new phone you want to add";
    pub const DELETE_PHONE_OF: &str =
        "Enter the name of the contact whose phone you want to delete";
    pub const PHONE_TO_DELETE: &str = "Enter the phone you want to delete";
    pub const ADD_BIRTHDAY_TO: &str =
        "Enter the name of the contact to whom you want to add birthday";
    pub const BIRTHDAY: &str = "Enter the date of birth (dd.mm.YYYY)";
    pub const CHANGE_BIRTHDAY_OF: &str =
        "Enter the name of the contact whose birthday you want to change";
    pub const NEW_BIRTHDAY: &str = "Enter a new date of birth (dd.mm.YYYY)";
    pub const DELETE_BIRTHDAY_OF: &str =
        "Enter the name of the contact whose birthday you want to delete";
    pub const DAYS_TO_BIRTHDAY_OF: &str =
        "Enter the name of the contact to know how many days are left until their birthday";
    pub const USER: &str = "Enter name of the user";
    pub const ADD_EMAIL_TO: &str = "Enter the name of the contact to whom you want to add email";
    pub const EMAIL: &str = "Enter the email you want to add";
    pub const CHANGE_EMAIL_OF: &str =
        "Enter the name of the contact whose email you want to change";
    pub const NEW_EMAIL: &str = "Enter a new email you want to add";
    pub const DELETE_EMAIL_OF: &str =
        "Enter the name of the contact whose email you want to delete";
    pub const COUNTRY: &str = "Enter a country";
    pub const DAYS: &str = "Enter the number of days (0 to 365)";
    pub const SEARCH: &str = "Enter what you want to find. Two characters minimum";
}

pub struct Session<P> {
    book: AddressBook,
    renderer: Renderer,
    prompter: P,
    clock: Clock,
}

impl<P: Prompter> Session<P> {
    pub fn new(book: AddressBook, renderer: Renderer, prompter: P, clock: Clock) -> Self {
        Self {
            book,
            renderer,
            prompter,
            clock,
        }
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn greet(&mut self) {
        for line in GREETING {
            self.prompter.say(line);
        }
    }

    /// Read commands until exit, then save. Esc or Ctrl+C at the command
    /// prompt also exits. The book is saved even when the prompt fails.
    pub fn run(&mut self, store: &SnapshotStore) -> Result<()> {
        let outcome = self.read_commands();
        store.save(&self.book)?;
        info!("session ended with {} contacts", self.book.len());
        outcome
    }

    fn read_commands(&mut self) -> Result<()> {
        loop {
            let Answer::Text(line) = self.prompter.ask(COMMAND_PROMPT)? else {
                self.show(&Response::info(FAREWELL));
                return Ok(());
            };
            if self.handle_line(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        let Some(command) = Command::parse(line) else {
            let response = match suggest(line) {
                Some(keyword) => Response::advisory(format!("Did you mean {}?", keyword)),
                None => Response::failure("Unknown command. Try again"),
            };
            self.show(&response);
            return Ok(Flow::Continue);
        };

        debug!("running {:?}", command);
        let response = self.execute(command)?;
        self.show(&response);
        Ok(match command {
            Command::Exit => Flow::Exit,
            _ => Flow::Continue,
        })
    }

    pub fn execute(&mut self, command: Command) -> Result<Response> {
        let today = self.clock.today();
        if prompts_for_fields(command) {
            self.prompter.say(CANCEL_HINT);
        }
        let birthday = |s: &str| Birthday::parse(s, today);

        let response = match command {
            // ==================== CONTACTS ====================
            Command::AddContact => {
                let name = take!(self.field(ask::NEW_CONTACT, Name::parse));
                self.book.add_contact(name)
            }
            Command::RenameContact => {
                let old = take!(self.contact(ask::RENAME));
                let new = take!(self.field(ask::NEW_NAME, Name::parse));
                self.book.rename_contact(&old, new)
            }
            Command::DeleteContact => {
                let name = take!(self.contact(ask::DELETE));
                let question = format!("Are you sure you want to delete contact {}?", name);
                if !self.prompter.confirm(&question)? {
                    return Ok(cancelled());
                }
                self.book.delete_contact(&name)
            }
            Command::ShowContact => {
                let name = take!(self.field(ask::CONTACT, Name::parse));
                self.book.show_contact(&name)
            }
            Command::ShowAll => self.book.show_all(),

            // ==================== PHONES ====================
            Command::AddPhone => {
                let name = take!(self.contact(ask::ADD_PHONE_TO));
                let phone = take!(self.field(ask::PHONE_TO_ADD, Phone::parse));
                self.book.add_phone(&name, phone)
            }
            Command::ChangePhone => {
                let name = take!(self.contact(ask::CHANGE_PHONE_OF));
                let old = take!(self.field(ask::OLD_PHONE, Phone::parse));
                let new = take!(self.field(ask::NEW_PHONE, Phone::parse));
                self.book.change_phone(&name, &old, new)
            }
            Command::DeletePhone => {
                let name = take!(self.contact(ask::DELETE_PHONE_OF));
                let phone = take!(self.field(ask::PHONE_TO_DELETE, Phone::parse));
                self.book.delete_phone(&name, &phone)
            }

            // ==================== BIRTHDAY ====================
            Command::AddBirthday => {
                let name = take!(self.contact(ask::ADD_BIRTHDAY_TO));
                let date = take!(self.field(ask::BIRTHDAY, birthday));
                self.book.add_birthday(&name, date)
            }
            Command::ChangeBirthday => {
                let name = take!(self.contact(ask::CHANGE_BIRTHDAY_OF));
                let date = take!(self.field(ask::NEW_BIRTHDAY, birthday));
                self.book.change_birthday(&name, date)
            }
            Command::DeleteBirthday => {
                let name = take!(self.field(ask::DELETE_BIRTHDAY_OF, Name::parse));
                self.book.delete_birthday(&name)
            }
            Command::DaysToBirthday => {
                let name = take!(self.field(ask::DAYS_TO_BIRTHDAY_OF, Name::parse));
                self.book.days_to_birthday(&name, today)
            }
            Command::DaysAlive => {
                let name = take!(self.field(ask::USER, Name::parse));
                self.book.days_alive(&name, today)
            }

            // ==================== EMAIL ====================
            Command::AddEmail => {
                let name = take!(self.contact(ask::ADD_EMAIL_TO));
                let email = take!(self.field(ask::EMAIL, Email::parse));
                self.book.add_email(&name, email)
            }
            Command::ChangeEmail => {
                let name = take!(self.contact(ask::CHANGE_EMAIL_OF));
                let email = take!(self.field(ask::NEW_EMAIL, Email::parse));
                self.book.change_email(&name, email)
            }
            Command::DeleteEmail => {
                let name = take!(self.field(ask::DELETE_EMAIL_OF, Name::parse));
                self.book.delete_email(&name)
            }

            // ==================== ADDRESS ====================
            Command::AddAddress => return self.add_address(),
            Command::ChangeCountry => {
                let name = take!(self.contact(ask::CONTACT));
                let country = take!(self.field(ask::COUNTRY, Country::parse));
                self.book.change_country(&name, country)
            }
            Command::ChangeCity => {
                let name = take!(self.contact(ask::CONTACT));
                let city = take!(self.field("Enter a city", City::parse));
                self.book.change_city(&name, city)
            }
            Command::ChangeStreet => {
                let name = take!(self.contact(ask::CONTACT));
                let street = take!(self.field("Enter a street", Street::parse));
                self.book.change_street(&name, street)
            }
            Command::ChangeHouse => {
                let name = take!(self.contact(ask::CONTACT));
                let house = take!(self.field("Enter a house", House::parse));
                self.book.change_house(&name, house)
            }
            Command::DeleteCountry => return self.delete_part(AddressPart::Country),
            Command::DeleteCity => return self.delete_part(AddressPart::City),
            Command::DeleteStreet => return self.delete_part(AddressPart::Street),
            Command::DeleteHouse => return self.delete_part(AddressPart::House),

            // ==================== QUERIES ====================
            Command::UpcomingBirthdays => {
                if self.book.is_empty() {
                    return Ok(Response::BookEmpty);
                }
                let count = format!("There are {} users in address book", self.book.len());
                self.prompter.say(&count);
                let days = take!(self.field(ask::DAYS, parse_days));
                self.book.birthdays(Window::Upcoming(days), today)
            }
            Command::NextWeek => self.book.birthdays(Window::NextWeek, today),
            Command::CurrentWeek => self.book.birthdays(Window::ThisWeek, today),
            Command::NextMonth => self.book.birthdays(Window::NextMonth, today),
            Command::CurrentMonth => self.book.birthdays(Window::ThisMonth, today),
            Command::SortByName => self.book.sort_by_name(),
            Command::SortByAge => self.book.sort_by_age(today),
            Command::Search => {
                if self.book.is_empty() {
                    return Ok(Response::BookEmpty);
                }
                let Answer::Text(needle) = self.prompter.ask(ask::SEARCH)? else {
                    return Ok(cancelled());
                };
                if needle.chars().count() < 2 {
                    return Ok(Response::failure(
                        "Search is too short. Enter at least 2 symbols.",
                    ));
                }
                self.book.search(&needle)
            }

            // ==================== SESSION ====================
            Command::SwitchView => {
                let view = self.renderer.view().toggled();
                self.renderer.set_view(view);
                Response::success(format!("Results are now shown as {}", view))
            }
            Command::Help => Response::info(help_text()),
            Command::Exit => Response::info(FAREWELL),
        };
        Ok(response)
    }

    /// Country is required, the other parts are offered one by one. If the
    /// user cancels partway, the parts entered so far are kept.
    fn add_address(&mut self) -> Result<Response> {
        let name = take!(self.contact(ask::CONTACT));
        let country = take!(self.field(ask::COUNTRY, Country::parse));

        let mut stopped_at = None;
        let city = match self.optional_part(AddressPart::City, City::parse)? {
            Part::Given(city) => Some(city),
            Part::Skipped => None,
            Part::Cancelled => {
                stopped_at = Some(AddressPart::City);
                None
            }
        };
        let mut street = None;
        if stopped_at.is_none() {
            match self.optional_part(AddressPart::Street, Street::parse)? {
                Part::Given(s) => street = Some(s),
                Part::Skipped => {}
                Part::Cancelled => stopped_at = Some(AddressPart::Street),
            }
        }
        let mut house = None;
        if stopped_at.is_none() {
            match self.optional_part(AddressPart::House, House::parse)? {
                Part::Given(h) => house = Some(h),
                Part::Skipped => {}
                Part::Cancelled => stopped_at = Some(AddressPart::House),
            }
        }

        let saved = self.book.set_address(&name, country, city, street, house);
        Ok(match stopped_at {
            None => saved,
            Some(part) => Response::failure(format!(
                "Command cancelled at the {}. The address entered before it was kept",
                part
            )),
        })
    }

    fn optional_part<T, E, F>(&mut self, part: AddressPart, parse: F) -> Result<Part<T>>
    where
        E: Display,
        F: Fn(&str) -> Result<T, E>,
    {
        if !self.prompter.confirm(&format!("Do you want to include {}?", part))? {
            return Ok(Part::Skipped);
        }
        Ok(match self.field(&format!("Enter a {}", part), parse)? {
            Reply::Value(value) => Part::Given(value),
            Reply::Done(_) => Part::Cancelled,
        })
    }

    fn delete_part(&mut self, part: AddressPart) -> Result<Response> {
        let prompt = format!(
            "Enter the name of the contact whose {} address you want to delete",
            part
        );
        let name = take!(self.field(&prompt, Name::parse));
        Ok(self.book.delete_address_part(&name, part))
    }

    /// Ask until `parse` accepts the input or the user cancels.
    fn field<T, E, F>(&mut self, prompt: &str, parse: F) -> Result<Reply<T>>
    where
        E: Display,
        F: Fn(&str) -> Result<T, E>,
    {
        loop {
            let Answer::Text(input) = self.prompter.ask(prompt)? else {
                return Ok(Reply::Done(cancelled()));
            };
            match parse(&input) {
                Ok(value) => return Ok(Reply::Value(value)),
                Err(e) => self.show(&Response::failure(e.to_string())),
            }
        }
    }

    /// A name that must already be in the book. An unknown name ends the
    /// command with a not-found failure before any other field is asked.
    fn contact(&mut self, prompt: &str) -> Result<Reply<Name>> {
        Ok(match self.field(prompt, Name::parse)? {
            Reply::Value(name) if !self.book.contains(&name) => {
                let missing = format!("There is no contact with name {}", name);
                Reply::Done(Response::failure(missing))
            }
            reply => reply,
        })
    }

    fn show(&mut self, response: &Response) {
        let text = self.renderer.render(response);
        self.prompter.say(&text);
    }
}

fn parse_days(input: &str) -> Result<u32, ValidationError> {
    input
        .parse::<u32>()
        .ok()
        .filter(|d| *d <= 365)
        .ok_or(ValidationError::Days)
}

fn prompts_for_fields(command: Command) -> bool {
    !matches!(
        command,
        Command::ShowAll
            | Command::UpcomingBirthdays
            | Command::NextWeek
            | Command::CurrentWeek
            | Command::NextMonth
            | Command::CurrentMonth
            | Command::SortByName
            | Command::SortByAge
            | Command::Search
            | Command::SwitchView
            | Command::Help
            | Command::Exit
    )
}
