// Tag mutation payloads.
//
// A tag is a label/value pair bound to a device-type element, staged
// inside a workspace via POST /api/resources/tag/v2/TagConfig. Pure
// data construction; no network activity here.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Element type a tag assignment binds to.
///
/// Serialized in the controller's `ELEMENT_TYPE_*` wire form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    #[default]
    #[serde(rename = "ELEMENT_TYPE_DEVICE")]
    Device,
    #[serde(rename = "ELEMENT_TYPE_INTERFACE")]
    Interface,
}

/// A single tag assignment to stage through a workspace transaction.
///
/// Durable only after the owning workspace reaches `Submitted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMutation {
    pub label: String,
    pub value: String,
    pub element_type: ElementType,
}

impl TagMutation {
    /// A device-scoped tag, the common case.
    pub fn device(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            element_type: ElementType::Device,
        }
    }

    /// Build the TagConfig wire payload scoped to a workspace.
    ///
    /// The tag key uses snake_case field names, unlike the camelCase
    /// workspace body; both shapes are what the controller expects.
    pub fn payload(&self, workspace_id: &str) -> Value {
        json!({
            "key": {
                "workspace_id": workspace_id,
                "element_type": self.element_type,
                "label": self.label,
                "value": self.value,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn device_tag_payload_wire_shape() {
        let tag = TagMutation::device("env", "prod");
        let payload = tag.payload("ws-1234");
        assert_eq!(
            payload,
            json!({
                "key": {
                    "workspace_id": "ws-1234",
                    "element_type": "ELEMENT_TYPE_DEVICE",
                    "label": "env",
                    "value": "prod",
                }
            })
        );
    }

    #[test]
    fn interface_element_type_serializes_to_wire_form() {
        let tag = TagMutation {
            label: "role".into(),
            value: "uplink".into(),
            element_type: ElementType::Interface,
        };
        let payload = tag.payload("ws-5678");
        assert_eq!(
            payload["key"]["element_type"],
            json!("ELEMENT_TYPE_INTERFACE")
        );
    }

    #[test]
    fn payload_is_pure_and_repeatable() {
        let tag = TagMutation::device("site", "dc1");
        assert_eq!(tag.payload("w"), tag.payload("w"));
    }
}
