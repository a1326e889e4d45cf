use std::io::{self, Write};
use timetable_tool::exchange::INVALID_FILE_MESSAGE;
use timetable_tool::{
    StateRepository, StorageConfig, TimeSlot, Timetable, TimetableConfig, TimetableError,
    format_time_label, load_document_from_json, logging, save_document_to_json, save_table_to_csv,
};
use tracing::error;

/// Everything after the first `n` whitespace-separated tokens, trimmed.
fn rest_after(input: &str, n: usize) -> &str {
    let mut rest = input.trim_start();
    for _ in 0..n {
        match rest.find(char::is_whitespace) {
            Some(idx) => rest = rest[idx..].trim_start(),
            None => return "",
        }
    }
    rest.trim_end()
}

/// Splits `cell <day...> <HH:MM> <text...>` at the first slot token after the
/// first word, so day labels may contain spaces.
fn split_cell_args(input: &str) -> Option<(&str, TimeSlot, &str)> {
    let args = rest_after(input, 1);
    let mut offset = 0;
    let mut first = true;
    while offset < args.len() {
        let token_start = offset + (args[offset..].len() - args[offset..].trim_start().len());
        let token_end = args[token_start..]
            .find(char::is_whitespace)
            .map_or(args.len(), |idx| token_start + idx);
        if token_start == token_end {
            break;
        }
        if !first {
            if let Ok(time) = TimeSlot::parse(&args[token_start..token_end]) {
                let day = args[..token_start].trim_end();
                return Some((day, time, args[token_end..].trim()));
            }
        }
        first = false;
        offset = token_end;
    }
    None
}

fn render_timetable_as_text_table(timetable: &Timetable) -> String {
    let use_12h = timetable.config().use_12h;
    let mut header = vec!["Day / Time".to_string()];
    header.extend(
        timetable
            .times()
            .iter()
            .map(|t| format_time_label(t, use_12h)),
    );

    let rows: Vec<Vec<String>> = timetable
        .days()
        .iter()
        .map(|day| {
            let mut row = vec![day.clone()];
            row.extend(timetable.times().iter().map(|t| {
                timetable
                    .grid()
                    .get(day, t)
                    .map(|content| content.replace('\n', " "))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&header));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show configuration and timetable\n  print                              Printable timetable view\n  cell <day...> <HH:MM> <text...>    Set a cell (empty text clears it)\n  day add <name...>                  Prepend a day row\n  day remove <name...>               Remove a day row\n  time add <HH:MM>                   Add a custom time slot\n  config show                        Show time range and display settings\n  config start <HH:MM>               Set range start\n  config end <HH:MM>                 Set range end\n  config step <minutes>              Set slot size\n  toggle 12h|rtl                     Toggle 12-hour labels or text direction\n  week new                           Archive this week and clear all cells\n  archive list                       List archived weeks (newest first)\n  archive restore <index>            Restore an archived week\n  archive delete <index>             Delete an archived week\n  export <json|csv> <path>           Export timetable to a file\n  import <path>                      Import a JSON timetable\n  quit|exit                          Exit"
    );
}

fn print_config(timetable: &Timetable) {
    let config = timetable.config();
    println!("Start              : {}", config.start);
    println!("End                : {}", config.end);
    println!("Step (minutes)     : {}", config.step_minutes);
    println!(
        "Time labels        : {}",
        if config.use_12h { "12h" } else { "24h" }
    );
    println!("Direction          : {}", config.direction.as_str());
    let custom = timetable
        .custom_times()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Custom slots       : {}", custom);
}

fn print_archive(timetable: &Timetable) {
    let archive = timetable.archive();
    if archive.is_empty() {
        println!("Archive is empty.");
        return;
    }
    for (idx, entry) in archive.entries().iter().enumerate() {
        println!(
            "  [{}] {}  days: {}  slots: {}",
            idx,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.days.join("، "),
            entry.times.len()
        );
    }
}

fn update_config<F>(timetable: &mut Timetable, mutator: F) -> Result<(), TimetableError>
where
    F: FnOnce(&mut TimetableConfig),
{
    let mut config = timetable.config().clone();
    mutator(&mut config);
    timetable.set_config(config)
}

fn main() {
    logging::init_tracing("warn");

    let storage = StorageConfig::from_env();
    let repository = StateRepository::from_config(&storage);
    let mut timetable = repository
        .load()
        .map(Timetable::from_state)
        .unwrap_or_default();

    println!("Timetable Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_timetable_as_text_table(&timetable));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let mut changed = false;

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => {
                print_config(&timetable);
                println!("{}", render_timetable_as_text_table(&timetable));
            }
            "print" => {
                println!("جدول المدرّس الأسبوعي");
                println!("{}", render_timetable_as_text_table(&timetable));
            }
            "cell" => match split_cell_args(input) {
                Some((day, time, content)) => {
                    match timetable.set_cell(day, &time, content) {
                        Ok(_) => {
                            println!("Cell updated.");
                            changed = true;
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: cell <day...> <HH:MM> <text...>"),
            },
            "day" => {
                let sub = parts.next();
                let name = rest_after(input, 2);
                match sub {
                    Some("add") => {
                        if timetable.add_day(name) {
                            println!("Added day '{}'.", name);
                            changed = true;
                        } else {
                            println!("Day not added (blank or already present).");
                        }
                    }
                    Some("remove") => {
                        if timetable.remove_day(name) {
                            println!("Removed day '{}'.", name);
                            changed = true;
                        } else {
                            println!("Day '{}' not found.", name);
                        }
                    }
                    _ => println!("Usage: day add|remove <name...>"),
                }
            }
            "time" => match (parts.next(), parts.next()) {
                (Some("add"), Some(time_s)) => match timetable.add_time_slot(time_s) {
                    Ok(true) => {
                        println!("Added time slot {}.", time_s);
                        changed = true;
                    }
                    Ok(false) => println!("Time slot {} already exists.", time_s),
                    Err(e) => println!("Invalid time format: {}", e),
                },
                _ => println!("Usage: time add <HH:MM>"),
            },
            "config" => match parts.next() {
                Some("show") | None => print_config(&timetable),
                Some(field @ ("start" | "end")) => match parts.next().map(TimeSlot::parse) {
                    Some(Ok(slot)) => {
                        let res = update_config(&mut timetable, |config| {
                            if field == "start" {
                                config.start = slot;
                            } else {
                                config.end = slot;
                            }
                        });
                        match res {
                            Ok(_) => {
                                println!("Time range updated.");
                                changed = true;
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    Some(Err(e)) => println!("{}", e),
                    None => println!("Usage: config {} <HH:MM>", field),
                },
                Some("step") => match parts.next().map(str::parse::<u32>) {
                    Some(Ok(step)) => {
                        match update_config(&mut timetable, |config| config.step_minutes = step) {
                            Ok(_) => {
                                println!("Step updated.");
                                changed = true;
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: config step <minutes>"),
                },
                Some(other) => {
                    println!("Unknown config command '{}'.", other);
                    println!("Usage: config show|start <HH:MM>|end <HH:MM>|step <minutes>");
                }
            },
            "toggle" => match parts.next() {
                Some("12h") => {
                    let use_12h = !timetable.config().use_12h;
                    timetable.set_use_12h(use_12h);
                    println!("Time labels: {}.", if use_12h { "12h" } else { "24h" });
                    changed = true;
                }
                Some("rtl") => {
                    let direction = timetable.toggle_direction();
                    println!("Direction: {}.", direction.as_str());
                    changed = true;
                }
                _ => println!("Usage: toggle 12h|rtl"),
            },
            "week" => match parts.next() {
                Some("new") => {
                    timetable.new_week();
                    println!("Week archived; cells cleared.");
                    changed = true;
                }
                _ => println!("Usage: week new"),
            },
            "archive" => {
                let sub = parts.next();
                let index = parts.next().map(str::parse::<usize>);
                match (sub, index) {
                    (Some("list") | None, _) => print_archive(&timetable),
                    (Some("restore"), Some(Ok(index))) => match timetable.restore_archive(index) {
                        Ok(_) => {
                            println!("Restored archived week {}.", index);
                            println!("{}", render_timetable_as_text_table(&timetable));
                            changed = true;
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    (Some("delete"), Some(Ok(index))) => match timetable.delete_archive(index) {
                        Ok(_) => {
                            println!("Deleted archived week {}.", index);
                            changed = true;
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: archive list|restore <index>|delete <index>"),
                }
            }
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                let res = match (fmt, path) {
                    (Some("json"), Some(path)) => Some(
                        save_document_to_json(
                            timetable.days(),
                            timetable.times(),
                            timetable.grid(),
                            path,
                        )
                        .map(|_| path),
                    ),
                    (Some("csv"), Some(path)) => Some(
                        save_table_to_csv(
                            timetable.days(),
                            timetable.times(),
                            timetable.grid(),
                            timetable.config().use_12h,
                            path,
                        )
                        .map(|_| path),
                    ),
                    _ => None,
                };
                match res {
                    Some(Ok(path)) => println!("Timetable exported to {}.", path),
                    Some(Err(e)) => println!("Error exporting timetable: {}", e),
                    None => println!("Usage: export <json|csv> <path>"),
                }
            }
            "import" => match parts.next() {
                Some(path) => match load_document_from_json(path) {
                    Ok(document) => match timetable.apply_document(document) {
                        Ok(_) => {
                            println!("Timetable imported from {}.", path);
                            println!("{}", render_timetable_as_text_table(&timetable));
                            changed = true;
                        }
                        Err(e) => println!("{} ({})", INVALID_FILE_MESSAGE, e),
                    },
                    Err(e) => println!("{} ({})", INVALID_FILE_MESSAGE, e),
                },
                None => println!("Usage: import <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }

        if changed {
            if let Err(e) = repository.save(&timetable.to_state()) {
                error!(error = %e, "failed to persist timetable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{rest_after, split_cell_args};

    #[test]
    fn rest_after_keeps_inner_spacing() {
        assert_eq!(rest_after("cell Sat 12:00 Math  and  Art ", 3), "Math  and  Art");
        assert_eq!(rest_after("day add", 2), "");
        assert_eq!(rest_after("day add Evening Sat", 2), "Evening Sat");
    }

    #[test]
    fn cell_arguments_allow_multi_word_days() {
        let (day, time, content) = split_cell_args("cell Evening Class 12:00 Math  and  Art").unwrap();
        assert_eq!(day, "Evening Class");
        assert_eq!(time.as_str(), "12:00");
        assert_eq!(content, "Math  and  Art");

        let (day, time, content) = split_cell_args("cell Sat 09:30").unwrap();
        assert_eq!(day, "Sat");
        assert_eq!(time.as_str(), "09:30");
        assert_eq!(content, "");

        let (day, _, content) = split_cell_args("cell 12:00 12:30 Lab").unwrap();
        assert_eq!(day, "12:00");
        assert_eq!(content, "Lab");

        assert!(split_cell_args("cell Sat 9:30 Math").is_none());
        assert!(split_cell_args("cell 12:00").is_none());
    }
}
