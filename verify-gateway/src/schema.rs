//! The verdict contract shared by every text verification entry point.

use serde_json::{json, Value};

pub const CONTRACT_NAME: &str = "disinfo_check";

pub const FIELD_DECISION: &str = "decision";
pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_EXPLANATION: &str = "explanation";
pub const FIELD_SOURCES: &str = "sources";

/// Required fields, in the order the validator checks them.
pub const REQUIRED_FIELDS: [&str; 4] = [FIELD_DECISION, FIELD_SUMMARY, FIELD_EXPLANATION, FIELD_SOURCES];

pub const DECISION_TOKENS: [&str; 2] = ["yes", "no"];

pub const MAX_SOURCES: usize = 10;

/// JSON schema of a verdict. Closed object, every field required.
pub fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            FIELD_DECISION: {
                "type": "string",
                "description": "yes/no: is the text disinformation or propaganda",
                "enum": DECISION_TOKENS,
            },
            FIELD_SUMMARY: {
                "type": "string",
                "description": "short summary, 1-2 sentences",
            },
            FIELD_EXPLANATION: {
                "type": "string",
                "description": "about 5 sentences explaining the decision",
            },
            FIELD_SOURCES: {
                "type": "array",
                "description": "up to 10 most relevant sources or URLs",
                "items": { "type": "string" },
                "maxItems": MAX_SOURCES,
            },
        },
        "required": REQUIRED_FIELDS,
        "additionalProperties": false,
    })
}

/// `response_format` value that attaches the schema as a strict contract.
pub fn response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": CONTRACT_NAME,
            "schema": verdict_schema(),
            "strict": true,
        },
    })
}
