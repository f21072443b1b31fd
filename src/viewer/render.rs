// src/viewer/render.rs
use std::fmt::Write;

use serde_json::Value;

const INDENT: &str = "  ";

/// Renders a JSON value as an indented HTML fragment with one span class
/// per value kind: `json-key`, `json-string`, `json-number`,
/// `json-boolean`, `json-null`.
pub fn render_json(value: &Value) -> String {
    let mut out = String::new();
    render_into(&mut out, value, 0);
    out
}

fn render_into(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                pad(out, depth + 1);
                let _ = write!(out, "<span class=\"json-key\">\"{}\"</span>: ", escape(key));
                render_into(out, item, depth + 1);
                close_item(out, i + 1 < map.len());
            }
            pad(out, depth);
            out.push('}');
        }
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                pad(out, depth + 1);
                render_into(out, item, depth + 1);
                close_item(out, i + 1 < items.len());
            }
            pad(out, depth);
            out.push(']');
        }
        Value::String(s) => {
            let _ = write!(out, "<span class=\"json-string\">\"{}\"</span>", escape(s));
        }
        Value::Number(n) => {
            let _ = write!(out, "<span class=\"json-number\">{}</span>", n);
        }
        Value::Bool(b) => {
            let _ = write!(out, "<span class=\"json-boolean\">{}</span>", b);
        }
        Value::Null => out.push_str("<span class=\"json-null\">null</span>"),
    }
}

fn pad(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn close_item(out: &mut String, more: bool) {
    if more {
        out.push(',');
    }
    out.push('\n');
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
