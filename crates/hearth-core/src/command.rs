//! Device commands and the strict schema for model-generated command JSON.
//!
//! The reasoning provider is instructed to return either a single command
//! object or an array of command objects. Anything else is rejected as a
//! [`ParseError`] rather than guessed at; both accepted shapes normalize
//! to a `Vec<Command>`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ParseError;

/// A single device command: a `domain.action` service call plus parameters.
///
/// Never mutated after creation — the synthesizer produces it, the session
/// stores it, the executor consumes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Service identifier in `domain.action` form, e.g. `light.turn_on`.
    pub service: String,
    /// Call parameters, including the target `entity_id`(s).
    pub data: Map<String, Value>,
}

impl Command {
    /// The domain portion of the service, if the service is well-formed.
    pub fn domain(&self) -> Option<&str> {
        self.service.split_once('.').map(|(domain, _)| domain)
    }

    /// The primary target entity for display purposes.
    ///
    /// `entity_id` may be a string or an array of strings; arrays report
    /// their first element. Returns `"unknown"` when no target is present,
    /// matching how failures and history entries label commands.
    pub fn target_label(&self) -> String {
        match self.data.get("entity_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .first()
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            _ => "unknown".to_string(),
        }
    }
}

/// Parse raw reasoning-provider output into a normalized command list.
///
/// Accepts a single command object or an array of command objects; a code
/// fence around otherwise-valid JSON is stripped first. Everything else is
/// a [`ParseError`].
pub fn parse_commands(raw: &str) -> Result<Vec<Command>, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    match value {
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                if item.is_object() {
                    Ok(serde_json::from_value(item)?)
                } else {
                    Err(ParseError::UnexpectedShape)
                }
            })
            .collect(),
        _ => Err(ParseError::UnexpectedShape),
    }
}

/// Strip a surrounding Markdown code fence, if present.
///
/// Models occasionally wrap output in ```` ```json ... ``` ```` despite
/// being told not to; the payload inside is still worth parsing.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmd(service: &str, data: Value) -> Command {
        Command {
            service: service.to_string(),
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn parse_single_object() {
        let raw = r#"{"service": "light.turn_on", "data": {"entity_id": "light.office_lamp"}}"#;
        let commands = parse_commands(raw).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].service, "light.turn_on");
        assert_eq!(commands[0].target_label(), "light.office_lamp");
    }

    #[test]
    fn parse_array() {
        let raw = json!([
            {"service": "light.turn_on", "data": {"entity_id": "light.a", "brightness": 200}},
            {"service": "media_player.play_media", "data": {"entity_id": "media_player.b"}}
        ])
        .to_string();
        let commands = parse_commands(&raw).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].domain(), Some("media_player"));
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_commands("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_scalar() {
        assert!(matches!(
            parse_commands("\"turn on the lights\""),
            Err(ParseError::UnexpectedShape)
        ));
    }

    #[test]
    fn parse_rejects_array_of_scalars() {
        assert!(matches!(
            parse_commands("[1, 2, 3]"),
            Err(ParseError::UnexpectedShape)
        ));
    }

    #[test]
    fn parse_rejects_prose() {
        assert!(matches!(
            parse_commands("Sure! Here are the commands you asked for."),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        // An object without `data` does not satisfy the schema.
        assert!(parse_commands(r#"{"service": "light.turn_on"}"#).is_err());
    }

    #[test]
    fn parse_strips_code_fence() {
        let raw = "```json\n{\"service\": \"fan.turn_off\", \"data\": {\"entity_id\": \"fan.attic\"}}\n```";
        let commands = parse_commands(raw).unwrap();
        assert_eq!(commands[0].service, "fan.turn_off");
    }

    #[test]
    fn parse_strips_bare_code_fence() {
        let raw = "```\n[]\n```";
        assert!(parse_commands(raw).unwrap().is_empty());
    }

    #[test]
    fn target_label_string() {
        let c = cmd("light.turn_on", json!({"entity_id": "light.kitchen"}));
        assert_eq!(c.target_label(), "light.kitchen");
    }

    #[test]
    fn target_label_array_uses_first() {
        let c = cmd(
            "light.turn_on",
            json!({"entity_id": ["light.left", "light.right"]}),
        );
        assert_eq!(c.target_label(), "light.left");
    }

    #[test]
    fn target_label_missing() {
        let c = cmd("scene.apply", json!({"transition": 2}));
        assert_eq!(c.target_label(), "unknown");
    }

    #[test]
    fn domain_of_malformed_service() {
        let c = cmd("reload", json!({}));
        assert_eq!(c.domain(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let c = cmd(
            "climate.set_temperature",
            json!({"entity_id": "climate.den", "temperature": 21}),
        );
        let encoded = serde_json::to_string(&c).unwrap();
        let decoded: Command = serde_json::from_str(&encoded).unwrap();
        assert_eq!(c, decoded);
    }
}
