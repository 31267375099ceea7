use anyhow::{Context, Result};
use chrono::Local;
use quickplan::cli::{self, Command};
use quickplan::config::Config;
use quickplan::context::{AppContext, StandardContext};
use quickplan::logging;
use quickplan::model::agenda;
use quickplan::model::{
    Event, RecurrenceDescriptor, RecurrenceEngine, RepeatRule, Task, parse_quick_entry,
};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::Path;

fn read_records<T: DeserializeOwned>(file: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse records in '{}'", file.display()))
}

fn print_event(event: &Event) {
    println!(
        "{}  {:>4}m  {}",
        event.start_time.format("%H:%M"),
        event.duration,
        event.title
    );
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    println!(
        "[{}] {} {}  {:<6}  {}",
        mark,
        task.date.format("%Y-%m-%d"),
        task.time.format("%H:%M"),
        task.priority,
        task.title
    );
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = cli::parse_args(&args)?;

    if invocation.command == Command::Help {
        cli::print_help("quickplan");
        return Ok(());
    }

    let ctx = StandardContext::new(invocation.root.clone());
    let (config, location_problem) = Config::load_or_fallback(&ctx)?;

    let level = if invocation.verbose {
        log::LevelFilter::Debug
    } else {
        config.level_filter()
    };
    let log_file = if config.log_to_file && location_problem.is_none() {
        Some(ctx.log_file_path()?)
    } else {
        None
    };
    logging::init(level, log_file.as_deref())?;
    if let Some(e) = location_problem {
        log::warn!("{}; using default settings", e);
    }

    let today = Local::now().date_naive();

    match invocation.command {
        Command::Help => {}
        Command::Parse {
            text,
            date,
            as_event,
        } => {
            let entry = parse_quick_entry(&text, date.unwrap_or(today));
            log::debug!("Parsed '{}' into {:?}", text, entry);
            let json = if as_event {
                serde_json::to_string_pretty(&entry.into_event(&config))?
            } else {
                serde_json::to_string_pretty(&entry)?
            };
            println!("{}", json);
        }
        Command::Occurs { anchor, rule, date } => {
            let desc = RecurrenceDescriptor::new(anchor, RepeatRule::parse(&rule));
            println!("{}", RecurrenceEngine::occurs_on(&desc, date));
        }
        Command::Schedule {
            anchor,
            rule,
            from,
            to,
        } => {
            let desc = RecurrenceDescriptor::new(anchor, RepeatRule::parse(&rule));
            for day in RecurrenceEngine::occurrences_between(&desc, from, to) {
                println!("{}", day.format("%Y-%m-%d %a"));
            }
        }
        Command::Agenda {
            file,
            date,
            upcoming,
        } => {
            let events: Vec<Event> = read_records(&file)?;
            let shown = if upcoming {
                agenda::upcoming_events(&events, Local::now().naive_local())
            } else {
                agenda::events_on(&events, date.unwrap_or(today))
            };
            for event in shown {
                print_event(event);
            }
        }
        Command::Tasks { file, date, filter } => {
            let tasks: Vec<Task> = read_records(&file)?;
            let listed = agenda::task_list(
                &tasks,
                date.unwrap_or(today),
                filter,
                config.agenda_window_days,
            );
            for task in &listed {
                print_task(task);
            }
            let counts = agenda::count_tasks(&tasks);
            println!(
                "{} completed, {} unfinished",
                counts.completed, counts.unfinished
            );
        }
        Command::Search {
            query,
            events,
            tasks,
        } => {
            let events: Vec<Event> = match events {
                Some(file) => read_records(&file)?,
                None => Vec::new(),
            };
            let tasks: Vec<Task> = match tasks {
                Some(file) => read_records(&file)?,
                None => Vec::new(),
            };
            let hits = agenda::search(&events, &tasks, &query);
            if hits.is_empty() {
                log::info!("Nothing matches '{}'", query);
            }
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
    }

    Ok(())
}
