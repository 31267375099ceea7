// File: ./src/cli.rs
//! Command-line argument handling and help text.

use crate::model::agenda::TaskFilter;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::PathBuf;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Parse a quick-entry phrase.
    Parse {
        text: String,
        date: Option<NaiveDate>,
        as_event: bool,
    },
    /// Check one date against a repeat rule.
    Occurs {
        anchor: NaiveDate,
        rule: String,
        date: NaiveDate,
    },
    /// List every occurrence in a date range.
    Schedule {
        anchor: NaiveDate,
        rule: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// Show the events of a JSON file that fall on a day.
    Agenda {
        file: PathBuf,
        date: Option<NaiveDate>,
        upcoming: bool,
    },
    /// Show the task list around a day.
    Tasks {
        file: PathBuf,
        date: Option<NaiveDate>,
        filter: TaskFilter,
    },
    /// Find events and tasks by title or notes.
    Search {
        query: String,
        events: Option<PathBuf>,
        tasks: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

fn parse_date(flag: &str, value: Option<&String>) -> Result<NaiveDate> {
    let raw = value.with_context(|| format!("{} requires a value", flag))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date for {}: '{}' (expected YYYY-MM-DD)", flag, raw))
}

/// Parses everything after the binary name.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut root = None;
    let mut verbose = false;
    let mut date = None;
    let mut anchor = None;
    let mut rule = None;
    let mut from = None;
    let mut to = None;
    let mut as_event = false;
    let mut upcoming = false;
    let mut filter = TaskFilter::default();
    let mut events_file = None;
    let mut tasks_file = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let value = args.get(i + 1);
        match arg {
            "-h" | "--help" | "help" if positional.is_empty() => {
                return Ok(Invocation {
                    command: Command::Help,
                    root,
                    verbose,
                });
            }
            "-r" | "--root" => {
                root = Some(PathBuf::from(value.context("--root requires a path")?));
                i += 1;
            }
            "-v" | "--verbose" => verbose = true,
            "--event" => as_event = true,
            "--upcoming" => upcoming = true,
            "--filter" => {
                let raw = value.context("--filter requires a value")?;
                filter = raw
                    .parse()
                    .with_context(|| format!("Unknown task filter '{}'", raw))?;
                i += 1;
            }
            "--events" => {
                events_file = Some(PathBuf::from(value.context("--events requires a path")?));
                i += 1;
            }
            "--tasks" => {
                tasks_file = Some(PathBuf::from(value.context("--tasks requires a path")?));
                i += 1;
            }
            "--date" => {
                date = Some(parse_date(arg, value)?);
                i += 1;
            }
            "--anchor" => {
                anchor = Some(parse_date(arg, value)?);
                i += 1;
            }
            "--from" => {
                from = Some(parse_date(arg, value)?);
                i += 1;
            }
            "--to" => {
                to = Some(parse_date(arg, value)?);
                i += 1;
            }
            "--rule" => {
                rule = Some(value.context("--rule requires a value")?.clone());
                i += 1;
            }
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    let Some((name, rest)) = positional.split_first() else {
        return Ok(Invocation {
            command: Command::Help,
            root,
            verbose,
        });
    };

    let command = match name.as_str() {
        "parse" => {
            if rest.is_empty() {
                bail!("parse requires some text");
            }
            Command::Parse {
                text: rest.join(" "),
                date,
                as_event,
            }
        }
        "occurs" => Command::Occurs {
            anchor: anchor.context("occurs requires --anchor")?,
            rule: rule.unwrap_or_else(|| "none".to_string()),
            date: date.context("occurs requires --date")?,
        },
        "schedule" => Command::Schedule {
            anchor: anchor.context("schedule requires --anchor")?,
            rule: rule.unwrap_or_else(|| "none".to_string()),
            from: from.context("schedule requires --from")?,
            to: to.context("schedule requires --to")?,
        },
        "agenda" => {
            if upcoming && date.is_some() {
                bail!("--upcoming always looks at today; drop --date");
            }
            Command::Agenda {
                file: PathBuf::from(rest.first().context("agenda requires a JSON file")?),
                date,
                upcoming,
            }
        }
        "tasks" => Command::Tasks {
            file: PathBuf::from(rest.first().context("tasks requires a JSON file")?),
            date,
            filter,
        },
        "search" => {
            if rest.is_empty() {
                bail!("search requires a query");
            }
            if events_file.is_none() && tasks_file.is_none() {
                bail!("search requires --events and/or --tasks");
            }
            Command::Search {
                query: rest.join(" "),
                events: events_file,
                tasks: tasks_file,
            }
        }
        other => bail!("Unknown command '{}'. Try --help.", other),
    };

    Ok(Invocation {
        command,
        root,
        verbose,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Quickplan v{} - quick entry parsing and recurrence checks for a personal planner",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} parse <text...> [--date <day>] [--event]", binary_name);
    println!(
        "    {} occurs --anchor <day> --rule <rule> --date <day>",
        binary_name
    );
    println!(
        "    {} schedule --anchor <day> --rule <rule> --from <day> --to <day>",
        binary_name
    );
    println!(
        "    {} agenda <events.json> [--date <day> | --upcoming]",
        binary_name
    );
    println!(
        "    {} tasks <tasks.json> [--date <day>] [--filter <filter>]",
        binary_name
    );
    println!(
        "    {} search <query...> [--events <events.json>] [--tasks <tasks.json>]",
        binary_name
    );
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug logging.");
    println!("    --event               Print the parsed entry as a full event record.");
    println!("    --upcoming            Only today's events that have not ended.");
    let filters: Vec<String> = TaskFilter::iter().map(|f| f.to_string()).collect();
    println!("    --filter <filter>     One of: {}.", filters.join(", "));
    println!("    -h, --help            Show this help message.");
    println!();
    println!("Days are written YYYY-MM-DD and default to today.");
    println!();
    println!("QUICK ENTRY:");
    println!("    high priority, urgent, important   Priority high");
    println!("    low priority                       Priority low");
    println!("    today, tomorrow                    Date relative to today");
    println!("    at 5, at 5:30pm, at 7 p.m.         Start time (bare 1-8 mean pm)");
    println!();
    println!("REPEAT RULES:");
    println!("    none, daily, weekly, monthly, yearly");
    println!("    Every 3 days");
    println!("    Every 2 weeks on Mon, Wed");
    println!("    Every 6 months");
    println!();
    println!("EXAMPLES:");
    println!("    {} parse Physics test tomorrow at 5pm", binary_name);
    println!(
        "    {} occurs --anchor 2025-01-06 --rule \"Every 2 weeks on Mon, Wed\" --date 2025-01-22",
        binary_name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parse_joins_words() {
        let inv = parse_args(&args(&["parse", "Call", "mom", "--date", "2025-06-10"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Parse {
                text: "Call mom".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 10),
                as_event: false,
            }
        );
    }

    #[test]
    fn occurs_requires_anchor() {
        let err = parse_args(&args(&["occurs", "--date", "2025-01-01"])).unwrap_err();
        assert!(err.to_string().contains("--anchor"));
    }

    #[test]
    fn bad_date_is_reported() {
        let err = parse_args(&args(&["parse", "x", "--date", "tomorrow"])).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn tasks_takes_a_filter() {
        let inv = parse_args(&args(&["tasks", "t.json", "--filter", "low-priority"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Tasks {
                file: PathBuf::from("t.json"),
                date: None,
                filter: TaskFilter::LowPriority,
            }
        );
        let err = parse_args(&args(&["tasks", "t.json", "--filter", "someday"])).unwrap_err();
        assert!(err.to_string().contains("Unknown task filter"));
    }

    #[test]
    fn search_needs_a_source() {
        let inv = parse_args(&args(&["search", "physics", "lab", "--tasks", "t.json"]))
            .unwrap();
        assert_eq!(
            inv.command,
            Command::Search {
                query: "physics lab".to_string(),
                events: None,
                tasks: Some(PathBuf::from("t.json")),
            }
        );
        assert!(parse_args(&args(&["search", "physics"])).is_err());
    }

    #[test]
    fn upcoming_excludes_date() {
        let inv = parse_args(&args(&["agenda", "e.json", "--upcoming"])).unwrap();
        assert!(matches!(inv.command, Command::Agenda { upcoming: true, .. }));
        let both = args(&["agenda", "e.json", "--upcoming", "--date", "2025-01-01"]);
        assert!(parse_args(&both).is_err());
    }

    #[test]
    fn no_arguments_means_help() {
        let inv = parse_args(&[]).unwrap();
        assert_eq!(inv.command, Command::Help);
        assert!(!inv.verbose);
    }

    #[test]
    fn root_and_verbose_are_global() {
        let inv = parse_args(&args(&["-v", "--root", "/tmp/qp", "agenda", "events.json"])).unwrap();
        assert!(inv.verbose);
        assert_eq!(inv.root, Some(PathBuf::from("/tmp/qp")));
        assert!(matches!(inv.command, Command::Agenda { date: None, .. }));
    }
}
