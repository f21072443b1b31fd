// src/status/normalize.rs
use serde_json::Value;

use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::status::error::CheckError;

/// Maps a raw status API body onto a `ServerStatus`.
///
/// The API omits whole sub-objects depending on what the server answered,
/// so every field is read leniently. Only a body that is not a JSON object
/// at all is rejected.
pub fn normalize(raw: &Value, endpoint: &Endpoint) -> Result<ServerStatus, CheckError> {
    let body = match raw.as_object() {
        Some(body) => body,
        None => {
            return Err(CheckError::MalformedResponse(
                format!("expected a JSON object, got {}", kind_of(raw))
            ));
        }
    };

    let online = body.get("online").and_then(Value::as_bool).unwrap_or(false);
    if !online {
        return Ok(ServerStatus::offline(endpoint.default_max_players));
    }

    let players = raw
        .pointer("/players/online")
        .and_then(Value::as_u64)
        .map(saturate)
        .unwrap_or(0);
    let max_players = raw
        .pointer("/players/max")
        .and_then(Value::as_u64)
        .map(saturate)
        .unwrap_or(endpoint.default_max_players);
    let version = body
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);
    // debug.ping is a boolean on some API revisions; only numbers count.
    let ping_ms = raw.pointer("/debug/ping").and_then(Value::as_u64).map(saturate);
    let motd = raw
        .pointer("/motd/clean")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n")
        });

    Ok(ServerStatus::online(players, max_players, version, ping_ms, motd))
}

fn saturate(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
