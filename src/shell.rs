//! Interactive shell: a thin caller of the command-dispatch protocol.
//!
//! Lines are tokenized with shlex and arguments are given as `key:value`
//! pairs (`key:'quoted value'` for values with spaces). The shell builds a
//! JSON payload per line, dispatches it, and renders the envelope.

use crate::commands::CommandHandler;
use crate::format::format_task;
use crate::types::Task;
use anyhow::Result;
use serde_json::{json, Map, Value};
use std::io::{self, BufRead, Write};

const BANNER: &str = "taskbook interactive shell\n\
Commands: add, list, show, update, delete, help, exit\n\
Example: add title:'New task' description:'Details' priority:3 due_at:'2024-12-31'";

const HELP: &str = "Examples:\n\
  add title:'Buy groceries' description:'Milk, bread' priority:3\n\
  list\n\
  list parent_id:1\n\
  show id:1\n\
  update id:1 status:done\n\
  delete id:1";

/// Parse `key:value` tokens into payload fields. Integers and booleans are
/// detected, everything else stays a string with surrounding quotes dropped.
fn parse_args(tokens: &[String]) -> Map<String, Value> {
    let mut args = Map::new();
    for token in tokens {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };
        let parsed = if let Ok(n) = value.parse::<i64>() {
            json!(n)
        } else if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            json!(value.eq_ignore_ascii_case("true"))
        } else {
            json!(value.trim_matches(|c| c == '\'' || c == '"'))
        };
        args.insert(key.to_string(), parsed);
    }
    args
}

/// Build a dispatch payload from one input line, or `None` for lines that
/// don't form a command.
fn payload_for_line(line: &str) -> Option<Value> {
    let tokens = shlex::split(line)?;
    let (command, rest) = tokens.split_first()?;
    let mut args = parse_args(rest);

    let mut payload = Map::new();
    payload.insert("command".to_string(), json!(command));

    // `update` carries its field set nested under `fields`; the id stays at
    // the top level.
    if command == "update" {
        if let Some(id) = args.remove("id") {
            payload.insert("id".to_string(), id);
        }
        payload.insert("fields".to_string(), Value::Object(args));
    } else {
        payload.extend(args);
    }

    Some(Value::Object(payload))
}

fn print_tasks(handler: &CommandHandler, tasks: &[Value]) {
    for task_json in tasks {
        if let Ok(task) = serde_json::from_value::<Task>(task_json.clone()) {
            println!("{}", format_task(&task, ""));

            // One level of children, the dispatcher's list is non-recursive
            let sub = handler.dispatch(&json!({ "command": "list", "parent_id": task.id }));
            if let Some(children) = sub.get("tasks").and_then(Value::as_array) {
                for child_json in children {
                    if let Ok(child) = serde_json::from_value::<Task>(child_json.clone()) {
                        println!("{}", format_task(&child, "  -> "));
                    }
                }
            }
        }
    }
}

fn print_result(handler: &CommandHandler, command: &str, result: &Value) {
    if result.get("status").and_then(Value::as_str) == Some("error") {
        let message = result
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        println!("Error: {}", message);
        return;
    }

    println!("OK");
    match command {
        "add" => {
            if let Some(id) = result.get("id").and_then(Value::as_i64) {
                println!("Added task with ID: {}", id);
            }
        }
        "show" => {
            if let Some(task) = result
                .get("task")
                .and_then(|t| serde_json::from_value::<Task>(t.clone()).ok())
            {
                println!("{}", format_task(&task, ""));
            }
        }
        "list" => {
            let tasks = result
                .get("tasks")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if tasks.is_empty() {
                println!("No tasks to show.");
            } else {
                print_tasks(handler, &tasks);
            }
        }
        _ => {}
    }
}

/// Run the read-dispatch-print loop until EOF or `exit`.
pub fn run(handler: &CommandHandler) -> Result<()> {
    println!("{}", BANNER);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        if line == "help" {
            println!("{}", HELP);
            continue;
        }

        let Some(payload) = payload_for_line(line) else {
            println!("Error: could not parse input");
            continue;
        };
        let command = payload
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let result = handler.dispatch(&payload);
        print_result(handler, &command, &result);
    }

    println!("Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ints_bools_and_quoted_strings() {
        let tokens = vec![
            "id:12".to_string(),
            "done:true".to_string(),
            "title:'Big plan'".to_string(),
        ];
        let args = parse_args(&tokens);
        assert_eq!(args.get("id"), Some(&json!(12)));
        assert_eq!(args.get("done"), Some(&json!(true)));
        assert_eq!(args.get("title"), Some(&json!("Big plan")));
    }

    #[test]
    fn tokens_without_colon_are_skipped() {
        let args = parse_args(&["noise".to_string()]);
        assert!(args.is_empty());
    }

    #[test]
    fn update_line_nests_fields_under_id() {
        let payload = payload_for_line("update id:3 status:done priority:1").unwrap();
        assert_eq!(payload["command"], json!("update"));
        assert_eq!(payload["id"], json!(3));
        assert_eq!(payload["fields"]["status"], json!("done"));
        assert_eq!(payload["fields"]["priority"], json!(1));
    }

    #[test]
    fn add_line_keeps_fields_at_top_level() {
        let payload = payload_for_line("add title:'Shop' due_at:'2024-12-31'").unwrap();
        assert_eq!(payload["command"], json!("add"));
        assert_eq!(payload["title"], json!("Shop"));
        assert_eq!(payload["due_at"], json!("2024-12-31"));
    }

    #[test]
    fn empty_line_yields_no_payload() {
        assert!(payload_for_line("").is_none());
    }
}
