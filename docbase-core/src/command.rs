//! The one-line command language: `<collection>.<method>(<args>[, <args2>])`.
//!
//! Parsing happens in two stages kept deliberately separate so grammar and
//! dispatch can evolve independently: [`parse`] turns a line into a
//! [`Command`] (shape check, identifier validation, unquoted-key
//! normalization, JSON parsing), and [`dispatch`] maps the command onto the
//! [`DocumentStore`] operation set. A trailing `;` is tolerated. Argument
//! objects may use bare keys (`{name: "Ann"}`); the normalizer rewrites them
//! to quoted form without touching the inside of string literals, so
//! timestamps and other `key:`-shaped text in values survive.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::engine::KvEngine;
use crate::error::{DocBaseError, DocBaseResult};
use crate::query::FindOptions;
use crate::store::DocumentStore;

static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\w+)\.(\w+)\((.*)\)$").expect("command pattern is valid")
});

/// A parsed command line: target collection, method, and up to two JSON
/// object payloads (the second is the update data for `updateOne`).
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub collection: String,
    pub method: String,
    pub args: Option<Value>,
    pub update: Option<Value>,
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rewrites bare object keys (`\w+` immediately before `:`) to quoted form,
/// leaving everything inside string literals untouched.
fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                i += 1;
                out.push(chars[i]);
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let mut lookahead = i;
            while lookahead < chars.len() && chars[lookahead].is_whitespace() {
                lookahead += 1;
            }
            if lookahead < chars.len() && chars[lookahead] == ':' {
                out.push('"');
                out.push_str(&word);
                out.push('"');
            } else {
                out.push_str(&word);
            }
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Splits the argument text at top-level commas only, so commas nested in
/// brackets or string literals stay inside their object literal.
fn split_top_level(body: &str) -> DocBaseResult<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for c in body.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    DocBaseError::Parse("Unbalanced brackets in arguments.".to_string())
                })?;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if in_string || depth != 0 {
        return Err(DocBaseError::Parse(
            "Unbalanced brackets or string literal in arguments.".to_string(),
        ));
    }
    let tail = current.trim().to_string();
    if !tail.is_empty() || !parts.is_empty() {
        parts.push(tail);
    }
    Ok(parts)
}

fn parse_payload(payload: &str) -> DocBaseResult<Value> {
    let normalized = quote_bare_keys(payload);
    let value: Value = serde_json::from_str(&normalized)
        .map_err(|err| DocBaseError::Parse(format!("Invalid JSON format in arguments: {err}")))?;
    if !value.is_object() {
        return Err(DocBaseError::Parse(
            "Arguments must be a JSON object literal.".to_string(),
        ));
    }
    Ok(value)
}

/// Parses one command line into a [`Command`].
///
/// # Errors
///
/// Returns [`DocBaseError::Parse`] when the overall shape does not match the
/// grammar, the collection or method is not a valid identifier, or an
/// argument payload is not a well-formed object literal after key quoting.
pub fn parse(line: &str) -> DocBaseResult<Command> {
    let trimmed = line.trim();
    let trimmed = trimmed
        .strip_suffix(';')
        .map(str::trim_end)
        .unwrap_or(trimmed);

    let captures = COMMAND_PATTERN.captures(trimmed).ok_or_else(|| {
        DocBaseError::Parse(
            "Invalid command format. Expected collection.method({...}) or collection.method()."
                .to_string(),
        )
    })?;
    let collection = captures[1].to_string();
    let method = captures[2].to_string();
    if !is_identifier(&collection) || !is_identifier(&method) {
        return Err(DocBaseError::Parse(
            "Invalid collection or method name.".to_string(),
        ));
    }

    let payloads = split_top_level(captures[3].trim())?;
    if payloads.len() > 2 {
        return Err(DocBaseError::Parse(
            "Expected at most two argument objects.".to_string(),
        ));
    }
    let mut payloads = payloads.into_iter();
    let args = payloads.next().map(|p| parse_payload(&p)).transpose()?;
    let update = payloads.next().map(|p| parse_payload(&p)).transpose()?;

    Ok(Command {
        collection,
        method,
        args,
        update,
    })
}

fn collection_name_arg(args: Option<&Value>) -> String {
    args.and_then(|a| a.get("collectionName"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Routes a parsed command to the matching store operation and returns its
/// result as a JSON value (document, list, boolean, or null), one result per
/// command.
///
/// The literal first segment `collection` selects collection-level
/// operations; any other first segment names the target collection for
/// document-level operations. Anything else is
/// [`DocBaseError::UnknownCommand`].
pub async fn dispatch<E: KvEngine>(
    store: &DocumentStore<E>,
    command: Command,
) -> DocBaseResult<Value> {
    let Command {
        collection,
        method,
        args,
        update,
    } = command;

    if collection == "collection" {
        match method.as_str() {
            "create" => {
                store
                    .create_collection(&collection_name_arg(args.as_ref()))
                    .await?;
                return Ok(Value::Null);
            }
            "delete" => {
                store
                    .delete_collection(&collection_name_arg(args.as_ref()))
                    .await?;
                return Ok(Value::Null);
            }
            "listCollection" => {
                let names = store.list_collections().await?;
                return Ok(Value::Array(names.into_iter().map(Value::String).collect()));
            }
            "truncate" => {
                store
                    .truncate_collection(&collection_name_arg(args.as_ref()))
                    .await?;
                return Ok(Value::Null);
            }
            _ => {}
        }
    }

    let args = args.unwrap_or_else(empty_object);
    match method.as_str() {
        "createOne" => {
            let stored = store.create_one(&collection, &args).await?;
            Ok(Value::Object(stored))
        }
        "deleteOne" => Ok(Value::Bool(store.delete_one(&collection, &args).await?)),
        "findOne" => Ok(match store.find_one(&collection, &args, &[]).await? {
            Some(found) => Value::Object(found),
            None => Value::Null,
        }),
        "find" => {
            let query = args.get("query").cloned().unwrap_or_else(empty_object);
            let options = FindOptions::from_value(args.get("options"))?;
            let found = store.find(&collection, &query, &options).await?;
            Ok(Value::Array(found.into_iter().map(Value::Object).collect()))
        }
        "updateOne" => {
            let patch = update.ok_or_else(|| {
                DocBaseError::Parse("updateOne requires an update object.".to_string())
            })?;
            Ok(Value::Bool(
                store.update_one(&collection, &args, &patch).await?,
            ))
        }
        _ => Err(DocBaseError::UnknownCommand(format!(
            "{collection}.{method}"
        ))),
    }
}

/// Parses and dispatches one command line.
pub async fn execute<E: KvEngine>(store: &DocumentStore<E>, line: &str) -> DocBaseResult<Value> {
    let command = parse(line)?;
    dispatch(store, command).await
}
