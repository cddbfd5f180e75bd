use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured NetLogo simulation session embedded in a `Student Work` cell.
///
/// `description` and `runs` are both optional in the wire format; a session
/// missing either is valid, data-sparse input rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub runs: Vec<Run>,
}

/// Session metadata: model information plus one ordered descriptor list per
/// variable category. Descriptor index i pairs with value index i in every
/// run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default, deserialize_with = "model_info_normalized")]
    pub model_information: Option<ModelInformation>,
    #[serde(default)]
    pub computational_inputs: Vec<VariableDescriptor>,
    #[serde(default)]
    pub computational_outputs: Vec<VariableDescriptor>,
    #[serde(default)]
    pub representational_inputs: Vec<VariableDescriptor>,
    #[serde(default)]
    pub student_inputs: Vec<VariableDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInformation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
}

/// `{label, min, max, units}`-shaped variable descriptor. Representational
/// and student variables usually carry only a label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariableDescriptor {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub units: Option<String>,
}

/// One simulation run: per-category value lists positionally aligned with
/// the description's descriptors, plus the raw inquiry summary string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default)]
    pub computational_inputs: Vec<Value>,
    #[serde(default)]
    pub computational_outputs: Vec<Value>,
    #[serde(default)]
    pub representational_inputs: Vec<Value>,
    #[serde(default)]
    pub student_inputs: Vec<Value>,
    #[serde(default)]
    pub inquiry_summary: String,
}

/// The exporter emits `modelInformation` either as a single object or as a
/// one-element list. Accept both, always producing one canonical record.
fn model_info_normalized<'de, D>(deserializer: D) -> Result<Option<ModelInformation>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ModelInformation),
        Many(Vec<ModelInformation>),
    }
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(info)) => Some(info),
        Some(OneOrMany::Many(list)) => list.into_iter().next(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Run>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Run>>::deserialize(deserializer)?.unwrap_or_default())
}
