use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result};

/// Default feed endpoint for checkpoint paths.
pub const DEFAULT_SAVE_CONST: &str = "save/Const:0";
/// Default fetch endpoint that triggers a checkpoint write.
pub const DEFAULT_SAVE_CONTROL_DEPENDENCY: &str = "save/control_dependency:0";
/// Default fetch endpoint that restores every variable from a checkpoint.
pub const DEFAULT_RESTORE_ALL: &str = "save/restore_all";

/// Names of the graph endpoints the driver feeds, fetches, and runs.
///
/// Stored next to each graph as JSON. `init` may be written as a single
/// string or a list; the checkpoint endpoints fall back to the conventional
/// `save/...` names when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMetadata {
    /// Feed endpoint for the `[batch, frame_size]` input buffer.
    pub inputs: String,
    /// Feed endpoint for the `[batch, label_width]` label buffer.
    pub labels: String,
    /// Targets run once when a session is opened.
    #[serde(deserialize_with = "one_or_many")]
    pub init: Vec<String>,
    pub train_op: String,
    pub predict_op: String,
    pub accuracy: String,
    pub total_loss: String,
    #[serde(default = "default_save_const")]
    pub save_const: String,
    #[serde(default = "default_save_control_dependency")]
    pub save_control_dependency: String,
    #[serde(default = "default_restore_all")]
    pub restore_all: String,
}

fn default_save_const() -> String {
    DEFAULT_SAVE_CONST.to_string()
}

fn default_save_control_dependency() -> String {
    DEFAULT_SAVE_CONTROL_DEPENDENCY.to_string()
}

fn default_restore_all() -> String {
    DEFAULT_RESTORE_ALL.to_string()
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

impl EndpointMetadata {
    /// Parse and validate metadata from a JSON document.
    pub fn from_json(json: &str) -> Result<EndpointMetadata> {
        let meta: EndpointMetadata = serde_json::from_str(json)?;
        meta.validate()?;
        Ok(meta)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every endpoint name is present and that there is at least
    /// one init target.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("inputs", &self.inputs),
            ("labels", &self.labels),
            ("train_op", &self.train_op),
            ("predict_op", &self.predict_op),
            ("accuracy", &self.accuracy),
            ("total_loss", &self.total_loss),
            ("save_const", &self.save_const),
            ("save_control_dependency", &self.save_control_dependency),
            ("restore_all", &self.restore_all),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ModelError::MissingEndpoint(field.to_string()));
            }
        }
        if self.init.is_empty() || self.init.iter().any(|t| t.trim().is_empty()) {
            return Err(ModelError::MissingEndpoint("init".to_string()));
        }
        Ok(())
    }
}
