//! Draft document payloads.
//!
//! The store treats a draft's document as opaque JSON. Callers choose the concrete shape and
//! supply a deserializer; the only thing the resolver needs from a document is whether it is
//! tagged with an external identifier, exposed through [`DraftDocument`].

use crate::{DraftError, DraftResult};
use draft_uuid::ExternalId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a document carries an external identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalIdState<'a> {
    /// Legacy or freshly synthesized document, never tagged.
    Absent,
    /// Document tagged with the given identifier.
    Present(&'a str),
}

impl ExternalIdState<'_> {
    pub fn is_present(&self) -> bool {
        matches!(self, ExternalIdState::Present(_))
    }

    /// True when the document is tagged with exactly `external_id`.
    pub fn matches(&self, external_id: &ExternalId) -> bool {
        matches!(self, ExternalIdState::Present(id) if *id == external_id.as_str())
    }
}

/// A document shape the resolver can filter and backfill.
pub trait DraftDocument {
    fn external_id(&self) -> ExternalIdState<'_>;

    /// Tags the document. Only called while [`DraftDocument::external_id`] is `Absent`.
    fn assign_external_id(&mut self, external_id: &ExternalId);
}

/// Untyped draft document: an optional `externalId` plus whatever else the form stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDraftDocument {
    /// `null` and a missing key both read as untagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DraftDocument for JsonDraftDocument {
    fn external_id(&self) -> ExternalIdState<'_> {
        match &self.external_id {
            Some(id) => ExternalIdState::Present(id),
            None => ExternalIdState::Absent,
        }
    }

    fn assign_external_id(&mut self, external_id: &ExternalId) {
        self.external_id = Some(external_id.to_string());
    }
}

/// Deserializes a raw payload, mapping an absent or `null` payload to an absent document.
pub fn deserialize_json<D: DeserializeOwned>(raw: Option<Value>) -> DraftResult<Option<D>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(DraftError::Deserialization),
    }
}

/// Deserializes a raw payload, mapping an absent or `null` payload to `D::default()`.
///
/// Use this when downstream handlers expect every draft, including a synthesized one, to carry
/// a document.
pub fn deserialize_or_default<D: DeserializeOwned + Default>(
    raw: Option<Value>,
) -> DraftResult<Option<D>> {
    deserialize_json(raw).map(|document| Some(document.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "cec85062-8df0-4bcb-a1c5-b8b91e78a1d5";

    #[test]
    fn external_id_state_matches_only_same_identifier() {
        let id = ExternalId::parse(ID).unwrap();
        let other = ExternalId::parse("27aed150-1948-4130-83ff-147c0b62f53c").unwrap();

        assert!(ExternalIdState::Present(ID).matches(&id));
        assert!(!ExternalIdState::Present(ID).matches(&other));
        assert!(!ExternalIdState::Absent.matches(&id));
    }

    #[test]
    fn json_document_reads_camel_case_external_id() {
        let document: JsonDraftDocument =
            serde_json::from_value(json!({ "externalId": ID, "amount": 10 })).unwrap();

        assert_eq!(document.external_id(), ExternalIdState::Present(ID));
        assert_eq!(document.fields.get("amount"), Some(&json!(10)));
    }

    #[test]
    fn json_document_without_external_id_is_absent() {
        let document: JsonDraftDocument = serde_json::from_value(json!({ "amount": 10 })).unwrap();

        assert_eq!(document.external_id(), ExternalIdState::Absent);
        assert!(!serde_json::to_value(&document)
            .unwrap()
            .as_object()
            .unwrap()
            .contains_key("externalId"));
    }

    #[test]
    fn deserialize_json_absent_payload() {
        let none: Option<JsonDraftDocument> = deserialize_json(None).unwrap();
        let null: Option<JsonDraftDocument> = deserialize_json(Some(Value::Null)).unwrap();

        assert!(none.is_none());
        assert!(null.is_none());
    }

    #[test]
    fn deserialize_json_rejects_wrong_shape() {
        let result: DraftResult<Option<JsonDraftDocument>> = deserialize_json(Some(json!([1, 2])));

        assert!(matches!(result, Err(DraftError::Deserialization(_))));
    }

    #[test]
    fn deserialize_or_default_builds_empty_document() {
        let document: Option<JsonDraftDocument> = deserialize_or_default(None).unwrap();

        assert_eq!(document, Some(JsonDraftDocument::default()));
    }
}
