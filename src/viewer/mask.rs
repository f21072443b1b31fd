// src/viewer/mask.rs
use serde_json::{ Map, Value };

pub const MASK: char = '*';

pub fn mask_ip(ip: &str) -> String {
    ip.chars().map(|c| if c.is_ascii_digit() { MASK } else { c }).collect()
}

/// Keeps the dots so the label structure stays visible.
pub fn mask_domain(domain: &str) -> String {
    domain.chars().map(|c| if c == '.' { c } else { MASK }).collect()
}

pub fn mask_error(message: &str) -> String {
    message.chars().map(|_| MASK).collect()
}

/// Ports arrive as numbers from the API but as strings once masked.
pub fn mask_port(port: &Value) -> Option<Value> {
    match port {
        Value::Number(n) => Some(Value::String(mask_ip(&n.to_string()))),
        Value::String(s) => Some(Value::String(mask_ip(s))),
        _ => None,
    }
}

/// Returns a redacted deep copy of a status payload. Only leaf contents of
/// the address, port, DNS and error fields change; keys, nesting and array
/// lengths are preserved, and masking twice is the same as masking once.
pub fn mask_payload(raw: &Value) -> Value {
    let mut data = raw.clone();
    if let Some(body) = data.as_object_mut() {
        redact_fields(body);
    }
    data
}

fn redact_fields(body: &mut Map<String, Value>) {
    if let Some(ip) = body.get_mut("ip") {
        map_str(ip, mask_ip);
    }

    if let Some(port) = body.get_mut("port") {
        if let Some(masked) = mask_port(port) {
            *port = masked;
        }
    }

    if let Some(records) = body
        .get_mut("dns")
        .and_then(|dns| dns.get_mut("a"))
        .and_then(Value::as_array_mut)
    {
        for record in records.iter_mut() {
            if let Some(address) = record.get_mut("address") {
                map_str(address, mask_ip);
            }
            for key in ["name", "cname"] {
                if let Some(host) = record.get_mut(key) {
                    map_str(host, mask_domain);
                }
            }
        }
    }

    if let Some(errors) = body.get_mut("error").and_then(Value::as_object_mut) {
        for message in errors.values_mut() {
            map_str(message, mask_error);
        }
    }
}

fn map_str(value: &mut Value, f: fn(&str) -> String) {
    if let Value::String(s) = value {
        *s = f(s);
    }
}
