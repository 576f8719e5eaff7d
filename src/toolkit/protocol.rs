//! Line-oriented JSON messages exchanged with the RDKit bridge.
//!
//! Every request is a single JSON object carrying an `id` and an `op` tag; the
//! bridge answers with exactly one line holding the same `id` and either
//! `"ok": true` plus a `value`, or `"ok": false` plus an `error` message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command<'a> {
    Hello,
    Load {
        format: &'static str,
        data: &'a str,
    },
    Property {
        handle: u64,
        name: &'static str,
        non_hydrogen_bonds_only: bool,
    },
    Smiles {
        handle: u64,
    },
    Molfile {
        handle: u64,
        version: &'static str,
    },
    Svg {
        handle: u64,
        width: u32,
        height: u32,
    },
    Summary {
        handle: u64,
    },
    Release {
        handle: u64,
    },
}

impl Command<'_> {
    pub fn operation(&self) -> &'static str {
        match self {
            Command::Hello => "hello",
            Command::Load { .. } => "load",
            Command::Property { .. } => "property",
            Command::Smiles { .. } => "smiles",
            Command::Molfile { .. } => "molfile",
            Command::Svg { .. } => "svg",
            Command::Summary { .. } => "summary",
            Command::Release { .. } => "release",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Reply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Serializes a request as one line of JSON (without the trailing newline).
pub fn encode(id: u64, command: &Command<'_>) -> Result<String, Error> {
    let mut value = serde_json::to_value(command)?;
    match &mut value {
        Value::Object(map) => {
            map.insert("id".to_string(), Value::from(id));
        }
        other => {
            return Err(Error::Protocol(format!(
                "request did not serialize to an object: {other}"
            )));
        }
    }
    Ok(serde_json::to_string(&value)?)
}

/// Decodes a reply line.
///
/// The outer `Result` reports protocol violations; the inner one carries the
/// toolkit's own verdict on the request.
pub fn decode(line: &str, expected_id: u64) -> Result<Result<Value, String>, Error> {
    let reply: Reply = serde_json::from_str(line.trim())?;
    if reply.id != expected_id {
        return Err(Error::Protocol(format!(
            "reply id {} does not match request id {}",
            reply.id, expected_id
        )));
    }
    if reply.ok {
        Ok(Ok(reply.value))
    } else {
        Ok(Err(reply
            .error
            .unwrap_or_else(|| "no error message given".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_tagged_requests_with_id() {
        let line = encode(
            7,
            &Command::Property {
                handle: 3,
                name: "logp",
                non_hydrogen_bonds_only: false,
            },
        )
        .unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["op"], "property");
        assert_eq!(parsed["handle"], 3);
        assert_eq!(parsed["name"], "logp");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn encodes_unit_command() {
        let parsed: Value = serde_json::from_str(&encode(0, &Command::Hello).unwrap()).unwrap();
        assert_eq!(parsed, serde_json::json!({"id": 0, "op": "hello"}));
    }

    #[test]
    fn multi_line_payloads_stay_on_one_line() {
        let molblock = "\n  RDKit          2D\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\nM  END\n";
        let line = encode(
            1,
            &Command::Load {
                format: "molfile",
                data: molblock,
            },
        )
        .unwrap();
        assert!(!line.contains('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["data"], molblock);
    }

    #[test]
    fn decodes_success_and_failure() {
        let ok = decode(r#"{"id": 4, "ok": true, "value": 46.07}"#, 4).unwrap();
        assert_eq!(ok, Ok(serde_json::json!(46.07)));

        let rejected = decode(r#"{"id": 4, "ok": false, "error": "bad handle"}"#, 4).unwrap();
        assert_eq!(rejected, Err("bad handle".to_string()));
    }

    #[test]
    fn rejects_mismatched_ids() {
        let err = decode(r#"{"id": 5, "ok": true, "value": null}"#, 4).unwrap_err();
        assert!(matches!(err, Error::Protocol(msg) if msg.contains("does not match")));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode("Traceback (most recent call last):", 1),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn operation_names_match_tags() {
        let command = Command::Svg {
            handle: 1,
            width: 400,
            height: 300,
        };
        let parsed: Value = serde_json::to_value(&command).unwrap();
        assert_eq!(parsed["op"], command.operation());
    }
}
