use buildplan::calendar::{ProjectCalendar, ProjectCalendarConfig};
use buildplan::gantt::generate_gantt_data;
use buildplan::persistence::{load_project_from_json, save_project_to_json, save_schedule_to_json};
use buildplan::plan::{DefaultsPolicy, parse_model_reply};
use buildplan::project::Project;
use buildplan::schedule::Schedule;
use buildplan::task::Task;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Write};

fn parse_dependency_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn fmt_opt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => "-".to_string(),
    }
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            if column < widths.len() && cell.len() > widths[column] {
                widths[column] = cell.len();
            }
        }
    }

    let mut separator = String::from("+");
    for width in &widths {
        separator.push_str(&"-".repeat(width + 2));
        separator.push('+');
    }

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push('|');
    for (column, header) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(header);
        out.push_str(&" ".repeat(widths[column] - header.len()));
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        out.push('|');
        for (column, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(widths[column].saturating_sub(cell.len())));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out.push_str(&separator);
    out.push('\n');
    out
}

fn print_tasks(project: &Project) {
    let rows: Vec<Vec<String>> = project
        .tasks()
        .iter()
        .map(|task| {
            vec![
                task.id.clone(),
                task.name.clone(),
                task.stage.clone(),
                format!("{}", task.duration_days),
                task.dependencies.join(","),
            ]
        })
        .collect();
    print!(
        "{}",
        render_text_table(&["id", "name", "stage", "days", "deps"], &rows)
    );
}

fn print_schedule(schedule: &Schedule) {
    let rows: Vec<Vec<String>> = schedule
        .entries
        .iter()
        .map(|entry| {
            vec![
                entry.task_id.clone(),
                format!("{}", entry.earliest_start),
                format!("{}", entry.earliest_finish),
                format!("{}", entry.latest_start),
                format!("{}", entry.latest_finish),
                format!("{}", entry.slack),
                if entry.is_critical { "yes" } else { "no" }.to_string(),
                fmt_opt_date(entry.start_date),
                fmt_opt_date(entry.end_date),
            ]
        })
        .collect();
    print!(
        "{}",
        render_text_table(
            &["id", "es", "ef", "ls", "lf", "slack", "critical", "start", "end"],
            &rows,
        )
    );
    println!("{}", schedule.to_cli_summary());
}

fn print_help() {
    println!(
        "Commands:\n  show                                   list tasks\n  add <id> <name> <days> [deps] [stage]  add or replace a task (deps comma-separated)\n  delete <id>                            remove a task and references to it\n  deps <id> <deps>                       replace a task's dependencies\n  stage <id> <label...>                  set a task's stage label\n  compute                                compute and print the schedule\n  gantt                                  print gantt rows for the schedule\n  plan <path> [strict|lenient]           import a staged plan from a model reply file\n  meta show                              print project metadata\n  meta name <text...>                    set project name\n  meta desc <text...>                    set project description\n  meta start <YYYY-MM-DD>                set project start date\n  calendar show                          print the calendar config\n  calendar default                       every day counts as working\n  calendar workweek                      Monday-Friday working, weekends off\n  calendar holiday <YYYY-MM-DD>          add a holiday\n  calendar set <json>                    replace the calendar from a JSON config\n  save <path>                            save the project as JSON\n  load <path>                            load a project from JSON\n  export <path>                          compute and save the schedule as JSON\n  quit | exit                            leave"
    );
}

fn main() {
    let mut project = Project::new();

    println!("BuildPlan (CLI) - type 'help' for commands\n");
    print_tasks(&project);

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = input.trim();
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "" => {}
            "help" => print_help(),
            "show" => print_tasks(&project),
            "add" => {
                let id = parts.next();
                let name = parts.next();
                let duration = parts.next();
                match (id, name, duration) {
                    (Some(id), Some(name), Some(duration)) => match duration.parse::<f64>() {
                        Ok(duration_days) => {
                            let mut task = Task::new(id, name, duration_days);
                            if let Some(deps) = parts.next() {
                                task.dependencies = parse_dependency_list(deps);
                            }
                            if let Some(stage) = parts.next() {
                                task.stage = stage.to_string();
                            }
                            match project.upsert_task(task) {
                                Ok(()) => println!("Task upserted."),
                                Err(err) => println!("Error: {err}"),
                            }
                        }
                        Err(_) => println!("Invalid duration (days)"),
                    },
                    _ => println!("Usage: add <id> <name> <days> [deps] [stage]"),
                }
            }
            "delete" => match parts.next() {
                Some(id) => {
                    if project.remove_task(id) {
                        println!("Deleted task {id}.");
                    } else {
                        println!("No task with id {id}.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "deps" => {
                let id = parts.next();
                let deps = parts.next();
                match (id, deps) {
                    (Some(id), Some(deps)) => match project.find_task(id).cloned() {
                        Some(mut updated) => {
                            updated.dependencies = parse_dependency_list(deps);
                            match project.upsert_task(updated) {
                                Ok(()) => println!("Dependencies updated."),
                                Err(err) => println!("Error: {err}"),
                            }
                        }
                        None => println!("No task with id {id}."),
                    },
                    _ => println!("Usage: deps <id> <deps>"),
                }
            }
            "stage" => {
                let id = parts.next();
                let label = parts.collect::<Vec<_>>().join(" ");
                match id {
                    Some(id) if !label.is_empty() => match project.find_task(id).cloned() {
                        Some(mut updated) => {
                            updated.stage = label;
                            match project.upsert_task(updated) {
                                Ok(()) => println!("Stage updated."),
                                Err(err) => println!("Error: {err}"),
                            }
                        }
                        None => println!("No task with id {id}."),
                    },
                    _ => println!("Usage: stage <id> <label...>"),
                }
            }
            "compute" => match project.schedule() {
                Ok(schedule) => print_schedule(&schedule),
                Err(err) => println!("Schedule error: {err}"),
            },
            "gantt" => match project.schedule() {
                Ok(schedule) => {
                    let rows: Vec<Vec<String>> = generate_gantt_data(project.tasks(), &schedule)
                        .into_iter()
                        .map(|row| {
                            vec![
                                row.id,
                                row.name,
                                row.stage,
                                format!("{}", row.start_day),
                                format!("{}", row.end_day),
                                fmt_opt_date(row.start_date),
                                fmt_opt_date(row.end_date),
                                if row.is_critical { "yes" } else { "no" }.to_string(),
                            ]
                        })
                        .collect();
                    print!(
                        "{}",
                        render_text_table(
                            &["id", "name", "stage", "start_day", "end_day", "start", "end", "critical"],
                            &rows,
                        )
                    );
                }
                Err(err) => println!("Schedule error: {err}"),
            },
            "plan" => match parts.next() {
                Some(path) => {
                    let policy = match parts.next() {
                        Some("lenient") => DefaultsPolicy::lenient(),
                        Some("strict") | None => DefaultsPolicy::strict(),
                        Some(other) => {
                            println!("Unknown policy '{other}' (strict|lenient)");
                            continue;
                        }
                    };
                    match fs::read_to_string(path) {
                        Ok(raw) => match parse_model_reply(&raw)
                            .and_then(|plan| Project::from_plan(&plan, &policy))
                        {
                            Ok(imported) => {
                                project = imported;
                                println!(
                                    "Plan imported from {path} ({} tasks).",
                                    project.tasks().len()
                                );
                            }
                            Err(err) => println!("Plan error: {err}"),
                        },
                        Err(err) => println!("Read error: {err}"),
                    }
                }
                None => println!("Usage: plan <path> [strict|lenient]"),
            },
            "meta" => match parts.next() {
                Some("show") => {
                    let metadata = project.metadata();
                    println!("name: {}", metadata.project_name);
                    println!("desc: {}", metadata.project_description);
                    println!("start: {}", metadata.start_date);
                }
                Some("name") => {
                    let text = parts.collect::<Vec<_>>().join(" ");
                    if text.is_empty() {
                        println!("Usage: meta name <text...>");
                    } else {
                        project.set_project_name(text);
                        println!("Metadata updated.");
                    }
                }
                Some("desc") => {
                    let text = parts.collect::<Vec<_>>().join(" ");
                    if text.is_empty() {
                        println!("Usage: meta desc <text...>");
                    } else {
                        project.set_project_description(text);
                        println!("Metadata updated.");
                    }
                }
                Some("start") => match parts.next().and_then(parse_date) {
                    Some(date) => {
                        project.set_start_date(date);
                        println!("Metadata updated.");
                    }
                    None => println!("Invalid date (YYYY-MM-DD)"),
                },
                _ => println!("Usage: meta show|name|desc|start"),
            },
            "calendar" => match parts.next() {
                Some("show") => match serde_json::to_string(&project.calendar().to_config()) {
                    Ok(json) => println!("{json}"),
                    Err(err) => println!("Error: {err}"),
                },
                Some("default") => {
                    project.set_calendar(ProjectCalendar::every_day());
                    println!("Calendar reset: every day is a working day.");
                }
                Some("workweek") => {
                    project.set_calendar(ProjectCalendar::standard_workweek());
                    println!("Calendar set to Monday-Friday.");
                }
                Some("holiday") => match parts.next().and_then(parse_date) {
                    Some(date) => {
                        let mut calendar = project.calendar().clone();
                        calendar.add_holiday(date);
                        project.set_calendar(calendar);
                        println!("Holiday added.");
                    }
                    None => println!("Invalid date (YYYY-MM-DD)"),
                },
                Some("set") => {
                    let json = parts.collect::<Vec<_>>().join(" ");
                    match serde_json::from_str::<ProjectCalendarConfig>(&json) {
                        Ok(config) => {
                            project.set_calendar(ProjectCalendar::from_config(&config));
                            println!("Calendar updated.");
                        }
                        Err(err) => println!("Invalid calendar config: {err}"),
                    }
                }
                _ => println!("Usage: calendar show|default|workweek|holiday|set"),
            },
            "save" => match parts.next() {
                Some(path) => match save_project_to_json(&project, path) {
                    Ok(()) => println!("Project saved to {path}."),
                    Err(err) => println!("Save error: {err}"),
                },
                None => println!("Usage: save <path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_project_from_json(path) {
                    Ok(loaded) => {
                        project = loaded;
                        println!("Project loaded from {path}.");
                    }
                    Err(err) => println!("Load error: {err}"),
                },
                None => println!("Usage: load <path>"),
            },
            "export" => match parts.next() {
                Some(path) => match project.schedule() {
                    Ok(schedule) => match save_schedule_to_json(&schedule, path) {
                        Ok(()) => println!("Schedule exported to {path}."),
                        Err(err) => println!("Export error: {err}"),
                    },
                    Err(err) => println!("Schedule error: {err}"),
                },
                None => println!("Usage: export <path>"),
            },
            "quit" | "exit" => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
