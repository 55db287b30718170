use crate::schema::{FIELD_DECISION, FIELD_EXPLANATION, FIELD_SOURCES, FIELD_SUMMARY, MAX_SOURCES, REQUIRED_FIELDS};
use crate::types::{Decision, ValidationError, Verdict};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Hard-validate model output against the verdict contract.
///
/// Checks run in a fixed order and the first failure is returned: JSON
/// syntax, presence of every required field, the decision token, then the
/// shape and length of `sources`. Nothing partial is ever returned.
pub fn validate(raw_content: &str) -> Result<Verdict, ValidationError> {
    let result = check(raw_content);
    match &result {
        Ok(verdict) => debug!(
            "Verdict accepted: decision={} sources={}",
            verdict.decision.as_str(),
            verdict.sources.len()
        ),
        Err(e) => warn!("Verdict rejected: {}", e),
    }
    result
}

fn check(raw_content: &str) -> Result<Verdict, ValidationError> {
    let parsed: Value = serde_json::from_str(raw_content).map_err(|_| ValidationError::MalformedJson)?;
    let object = parsed.as_object().ok_or(ValidationError::MalformedJson)?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
        return Err(ValidationError::MissingField(*missing));
    }

    let decision = object
        .get(FIELD_DECISION)
        .and_then(Value::as_str)
        .and_then(Decision::from_token)
        .ok_or(ValidationError::InvalidDecision)?;

    let sources = match object.get(FIELD_SOURCES) {
        Some(Value::Array(items)) => items,
        _ => return Err(ValidationError::SourcesNotList),
    };
    if sources.len() > MAX_SOURCES {
        return Err(ValidationError::TooManySources(sources.len()));
    }
    let sources = sources
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(ValidationError::SourcesNotList)?;

    Ok(Verdict {
        decision,
        summary: string_field(object, FIELD_SUMMARY)?,
        explanation: string_field(object, FIELD_EXPLANATION)?,
        sources,
    })
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ValidationError::InvalidFieldType(field))
}
