//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - Status lines for finished steps and warnings
//! - JSON syntax highlighting

use std::fmt::Display;

use colored::Colorize;

/// Prints a success line: `✓ <label> <value>`.
pub fn success(label: &str, value: impl Display) {
    println!("{} {label} {value}", "✓".green().bold());
}

/// Prints a warning line to stderr: `⚠ <message>`.
pub fn warning(message: impl Display) {
    eprintln!("{} {message}", "⚠".yellow().bold());
}

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json_str));
}

/// Colors a pretty-printed JSON string.
fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut current_token = String::new();
    let mut after_colon = false;

    for ch in json.chars() {
        if escape_next {
            current_token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current_token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' => {
                if in_string {
                    current_token.push(ch);
                    let colored = if is_key { current_token.cyan() } else { current_token.green() };
                    out.push_str(&colored.to_string());
                    current_token.clear();
                    in_string = false;
                    is_key = false;
                } else {
                    flush_token(&mut out, &mut current_token, after_colon);
                    current_token.push(ch);
                    in_string = true;
                    // A string is a key unless it follows a colon.
                    is_key = !after_colon;
                    after_colon = false;
                }
            }
            ':' if !in_string => {
                flush_token(&mut out, &mut current_token, false);
                out.push_str(&":".white().to_string());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&",".white().to_string());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&ch.to_string().white().bold().to_string());
                after_colon = false;
            }
            _ => current_token.push(ch),
        }
    }

    flush_token(&mut out, &mut current_token, after_colon);
    out
}

/// Appends the pending token, coloring bare values.
fn flush_token(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    if is_value && !token.trim().is_empty() {
        let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(0);
        let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);

        let prefix = &token[..start];
        let value = &token[start..end];
        let suffix = &token[end..];

        if value == "true" || value == "false" || value == "null" {
            out.push_str(&format!("{prefix}{}{suffix}", value.magenta()));
        } else if value.parse::<f64>().is_ok() {
            out.push_str(&format!("{prefix}{}{suffix}", value.yellow()));
        } else {
            out.push_str(token);
        }
    } else {
        out.push_str(token);
    }

    token.clear();
}
