//! The interactive command table.
//!
//! Each command has a numeric code and a few aliases. Input is matched by
//! lowercase prefix against every keyword, in table order, so `show all`
//! wins over `show` because it comes first.

/// Edit similarity an alias needs to be offered as "Did you mean ...?".
pub const SUGGEST_CUTOFF: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddContact,
    AddPhone,
    AddBirthday,
    AddEmail,
    AddAddress,
    RenameContact,
    ChangePhone,
    ChangeBirthday,
    ChangeEmail,
    ChangeCountry,
    ChangeCity,
    ChangeStreet,
    ChangeHouse,
    DeleteContact,
    DeletePhone,
    DeleteBirthday,
    DeleteEmail,
    DeleteCountry,
    DeleteCity,
    DeleteStreet,
    DeleteHouse,
    DaysToBirthday,
    UpcomingBirthdays,
    NextWeek,
    CurrentWeek,
    NextMonth,
    CurrentMonth,
    DaysAlive,
    SortByName,
    SortByAge,
    ShowAll,
    ShowContact,
    Search,
    SwitchView,
    Exit,
    Help,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::AddContact,
        Command::AddPhone,
        Command::AddBirthday,
        Command::AddEmail,
        Command::AddAddress,
        Command::RenameContact,
        Command::ChangePhone,
        Command::ChangeBirthday,
        Command::ChangeEmail,
        Command::ChangeCountry,
        Command::ChangeCity,
        Command::ChangeStreet,
        Command::ChangeHouse,
        Command::DeleteContact,
        Command::DeletePhone,
        Command::DeleteBirthday,
        Command::DeleteEmail,
        Command::DeleteCountry,
        Command::DeleteCity,
        Command::DeleteStreet,
        Command::DeleteHouse,
        Command::DaysToBirthday,
        Command::UpcomingBirthdays,
        Command::NextWeek,
        Command::CurrentWeek,
        Command::NextMonth,
        Command::CurrentMonth,
        Command::DaysAlive,
        Command::SortByName,
        Command::SortByAge,
        Command::ShowAll,
        Command::ShowContact,
        Command::Search,
        Command::SwitchView,
        Command::Exit,
        Command::Help,
    ];

    /// Code first, then the label shown in help, then the other aliases.
    /// Some aliases are the same word typed on a Ukrainian keyboard layout.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Command::AddContact => &["11", "add user", "new user", "create user", "+"],
            Command::AddPhone => &["12", "add phone"],
            Command::AddBirthday => &["13", "add birthday", "birthday"],
            Command::AddEmail => &["14", "add email", "email"],
            Command::AddAddress => &["15", "add address", "new address"],
            Command::RenameContact => &["21", "change user", "change name"],
            Command::ChangePhone => &["22", "change phone"],
            Command::ChangeBirthday => &["23", "change birthday"],
            Command::ChangeEmail => &["24", "change email"],
            Command::ChangeCountry => &["25", "change country"],
            Command::ChangeCity => &["26", "change city", "change town", "change village"],
            Command::ChangeStreet => &["27", "change street"],
            Command::ChangeHouse => &["28", "change house"],
            Command::DeleteContact => &["31", "delete user", "delete contact"],
            Command::DeletePhone => &["32", "delete phone", "remove phone"],
            Command::DeleteBirthday => &["33", "delete birthday", "remove birthday"],
            Command::DeleteEmail => &["34", "delete email", "remove email"],
            Command::DeleteCountry => &["35", "delete country", "remove country"],
            Command::DeleteCity => &[
                "36",
                "delete city",
                "remove city",
                "delete town",
                "remove town",
                "delete village",
                "remove village",
            ],
            Command::DeleteStreet => &["37", "delete street", "remove street"],
            Command::DeleteHouse => &["38", "delete house", "remove house"],
            Command::DaysToBirthday => &["41", "days to birthday", "days to bd"],
            Command::UpcomingBirthdays => &["42", "upcoming birthdays", "closest birthdays"],
            Command::NextWeek => &["43", "next week birthdays", "next week"],
            Command::CurrentWeek => &["44", "current week birthdays", "current week"],
            Command::NextMonth => &["45", "next month birthdays", "next month"],
            Command::CurrentMonth => &["46", "current month birthdays", "current month"],
            Command::DaysAlive => &["47", "how long user live"],
            Command::SortByName => &["51", "sort by name"],
            Command::SortByAge => &["53", "sort by age"],
            Command::ShowAll => &[
                "55",
                "show all",
                "all phones",
                "addressbook",
                "contactbook",
                "ірщц фдд",
            ],
            Command::ShowContact => &["66", "show user", "phone", "number", "show"],
            Command::Search => &["77", "search", "find", "match", "іуфкср", "аштв", "ьфеср"],
            Command::SwitchView => &["88", "switch view", "view"],
            Command::Exit => &["99", "exit", "bye", "end", "close", "goodbye", "учше"],
            Command::Help => &["00", "help", "рудз"],
        }
    }

    pub fn code(self) -> &'static str {
        self.keywords()[0]
    }

    pub fn label(self) -> &'static str {
        self.keywords()[1]
    }

    /// First command with a keyword that `input` starts with.
    pub fn parse(input: &str) -> Option<Command> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }
        Command::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.keywords().iter().any(|kw| input.starts_with(kw)))
    }
}

/// Closest keyword to an unrecognized input, if any is close enough.
pub fn suggest(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    Command::ALL
        .iter()
        .flat_map(|cmd| cmd.keywords().iter().copied())
        .map(|kw| (kw, similarity(&input, kw)))
        .filter(|(_, score)| *score >= SUGGEST_CUTOFF)
        .fold(None, |best: Option<(&'static str, f64)>, (kw, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((kw, score)),
        })
        .map(|(kw, _)| kw)
}

/// Every command with its code, one per line.
pub fn help_text() -> String {
    let mut out = String::from("Type one of the available commands from the list below:\n");
    for cmd in Command::ALL {
        out.push_str(&format!("\n{} : {}", cmd.code(), cmd.label()));
    }
    out
}

/// `1 - distance / longer length`, over chars.
fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
