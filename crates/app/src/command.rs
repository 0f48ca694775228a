//! Parsing of shell input lines into commands.
use chrono::NaiveDate;
use engine::{ExpenseDraft, ExpenseId, MoneyCents};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Text,
    Category,
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(ExpenseDraft),
    Edit(ExpenseId, ExpenseDraft),
    Remove(ExpenseId),
    List,
    Summary,
    Distribution,
    Categories,
    Json,
    Filter(FilterField, String),
    Clear,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <amount> <YYYY-MM-DD> <category> <description...>
  edit <id> <amount> <YYYY-MM-DD> <category> <description...>
  rm <id>
  list | summary | dist | categories | json
  filter text|category|start|end [value]
  clear
  help | quit";

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let Some((verb, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match verb {
        "add" => Command::Add(parse_draft(rest)?),
        "edit" => {
            let (id, rest) = split_word(rest).ok_or("missing id")?;
            Command::Edit(parse_id(id)?, parse_draft(rest)?)
        }
        "rm" | "delete" => {
            let (id, _) = split_word(rest).ok_or("missing id")?;
            Command::Remove(parse_id(id)?)
        }
        "list" => Command::List,
        "summary" => Command::Summary,
        "dist" => Command::Distribution,
        "categories" => Command::Categories,
        "json" => Command::Json,
        "filter" => {
            let (field, value) = split_word(rest).ok_or("missing filter field")?;
            let field = match field {
                "text" => FilterField::Text,
                "category" => FilterField::Category,
                "start" => FilterField::Start,
                "end" => FilterField::End,
                other => return Err(format!("unknown filter field: {other}")),
            };
            Command::Filter(field, value.to_string())
        }
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    })
}

fn parse_id(raw: &str) -> Result<ExpenseId, String> {
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(ExpenseId::new)
        .map_err(|_| format!("invalid id: {raw}"))
}

fn parse_draft(input: &str) -> Result<ExpenseDraft, String> {
    let (amount, rest) = split_word(input).ok_or("missing amount")?;
    let (date, rest) = split_word(rest).ok_or("missing date")?;
    let (category, description) = split_word(rest).ok_or("missing category")?;

    let amount = amount
        .parse::<MoneyCents>()
        .map_err(|err| err.to_string())?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {date} (expected YYYY-MM-DD)"))?;

    Ok(ExpenseDraft::new(description, amount, date, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_multi_word_description() {
        let command = parse("add 85.43 2025-04-05 Utilities Electricity Bill")
            .unwrap()
            .unwrap();
        let Command::Add(draft) = command else {
            panic!("expected add, got {command:?}");
        };
        assert_eq!(draft.amount, MoneyCents::new(8543));
        assert_eq!(draft.category, "Utilities");
        assert_eq!(draft.description, "Electricity Bill");
    }

    #[test]
    fn parses_edit_and_remove_ids() {
        assert!(matches!(
            parse("edit #3 10 2025-04-01 Food Lunch"),
            Ok(Some(Command::Edit(id, _))) if id == ExpenseId::new(3)
        ));
        assert_eq!(
            parse("rm 7"),
            Ok(Some(Command::Remove(ExpenseId::new(7))))
        );
        assert!(parse("rm seven").is_err());
    }

    #[test]
    fn filter_value_may_be_empty() {
        assert_eq!(
            parse("filter text"),
            Ok(Some(Command::Filter(FilterField::Text, String::new())))
        );
        assert_eq!(
            parse("filter category Food"),
            Ok(Some(Command::Filter(FilterField::Category, "Food".to_string())))
        );
        assert!(parse("filter colour red").is_err());
    }

    #[test]
    fn blank_lines_are_ignored_and_bad_input_reported() {
        assert_eq!(parse("   "), Ok(None));
        assert!(parse("add 10 yesterday Food Lunch").is_err());
        assert!(parse("add 12.345 2025-04-01 Food Lunch").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
