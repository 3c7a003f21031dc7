//! Batch encoding and response correlation.
//!
//! One `authorize` call maps to one exchange: the batch is sent as a JSON
//! array of identified requests and the answer is matched back by id. The
//! response is decoded element by element so that one bad entry cannot hide
//! the others; whether the batch as a whole is usable is decided only by
//! [`correlate`].

use std::collections::HashMap;
use std::fmt;

use permission_sdk::{AuthorizeRequest, AuthorizeResponse, Identified, PermissionError};
use serde_json::Value;

/// Produces correlation ids for one batch.
///
/// Ids must be unique within a batch and should not repeat across batches.
/// They carry no meaning beyond matching responses to requests.
pub trait CorrelationIdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Ids;

impl CorrelationIdGenerator for UuidV4Ids {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Tag every request with a fresh id, preserving order.
pub(crate) fn identify<'a>(
    requests: &'a [AuthorizeRequest],
    ids: &dyn CorrelationIdGenerator,
) -> Vec<Identified<&'a AuthorizeRequest>> {
    requests
        .iter()
        .map(|request| Identified::new(ids.next_id(), request))
        .collect()
}

/// Decode the accepted response elements keyed by id.
///
/// A body that is not a JSON array yields an empty map. Elements that fail to
/// decode, or conditional answers with an empty criteria tree, are skipped.
/// When an id occurs more than once the last accepted element wins.
pub(crate) fn decode_responses(body: &[u8]) -> HashMap<String, AuthorizeResponse> {
    let elements = response_elements(body);
    let mut accepted = HashMap::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        if let Some((id, response)) = accept_element(index, element) {
            accepted.insert(id, response);
        }
    }
    accepted
}

fn response_elements(body: &[u8]) -> Vec<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(elements)) => elements,
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "response body is not an array");
            Vec::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "response body is not valid JSON");
            Vec::new()
        }
    }
}

/// Decode one element, or `None` if it is not a usable answer.
fn accept_element(index: usize, element: Value) -> Option<(String, AuthorizeResponse)> {
    let item = match serde_json::from_value::<Identified<AuthorizeResponse>>(element) {
        Ok(item) => item,
        Err(e) => {
            tracing::debug!(index, error = %e, "dropping undecodable response element");
            return None;
        }
    };
    if item.inner.conditions().is_some_and(|c| c.criteria.is_empty()) {
        tracing::debug!(index, id = %item.id, "dropping conditional response without conditions");
        return None;
    }
    Some((item.id, item.inner))
}

/// Order `accepted` by the submitted ids.
///
/// # Errors
///
/// Returns [`PermissionError::MalformedResponse`] if any submitted id has no
/// accepted response.
pub(crate) fn correlate<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    mut accepted: HashMap<String, AuthorizeResponse>,
) -> Result<Vec<AuthorizeResponse>, PermissionError> {
    let ordered = ids
        .into_iter()
        .map(|id| {
            accepted.remove(id).ok_or_else(|| {
                tracing::debug!(id, "no response for submitted request");
                PermissionError::MalformedResponse
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !accepted.is_empty() {
        tracing::debug!(count = accepted.len(), "ignoring responses with unknown ids");
    }
    Ok(ordered)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
