use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AgentResponse;
use crate::workflow::{render_slots, Slot};

/// Reply of the interviewer for one question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionTurn {
    /// Everything the owner said about the question, rewritten
    pub user_description: String,
    pub bot_response: String,
    /// The owner confirmed the description
    pub finished: bool,
}

impl AgentResponse for QuestionTurn {
    const SCHEMA_NAME: &'static str = "question_response";

    fn schema() -> Value {
        object_schema(json!({
            "user_description": {
                "type": "string",
                "description": "Everything the user said about the question, well written, without mentioning the user."
            },
            "bot_response": {"type": "string", "description": "Bot response."},
            "finished": {"type": "boolean", "description": "The user says the saved information is correct."}
        }))
    }

    fn message(&self) -> &str {
        &self.bot_response
    }
}

/// Category of the described business
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    #[serde(rename = "e-commerce")]
    ECommerce,
    #[serde(rename = "informative")]
    Informative,
    #[default]
    #[serde(rename = "other", other)]
    Other,
}

impl BusinessType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ECommerce => "e-commerce",
            Self::Informative => "informative",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply of the classifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessClassification {
    pub business_type: BusinessType,
    pub reasoning: String,
}

impl AgentResponse for BusinessClassification {
    const SCHEMA_NAME: &'static str = "business_info";

    fn schema() -> Value {
        object_schema(json!({
            "business_type": {
                "type": "string",
                "enum": ["e-commerce", "informative", "other"],
                "description": "Type of business the user wants to create the agent for. e-commerce when it sells products or services through the chat, informative when the chat only informs."
            },
            "reasoning": {"type": "string", "description": "Why that business type was chosen."}
        }))
    }

    fn message(&self) -> &str {
        &self.reasoning
    }
}

/// Reply of the package input filler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInputsTurn {
    pub package_name: String,
    /// Inputs filled so far
    pub updated_slots: Vec<Slot>,
    pub all_inputs_filled: bool,
    pub user_confirmed: bool,
    pub bot_response: String,
}

impl PackageInputsTurn {
    /// Every input filled and the owner agreed in the same turn
    pub fn is_complete(&self) -> bool {
        self.all_inputs_filled && self.user_confirmed
    }
}

impl AgentResponse for PackageInputsTurn {
    const SCHEMA_NAME: &'static str = "package_inputs";

    fn schema() -> Value {
        object_schema(json!({
            "package_name": {"type": "string", "description": "Package name"},
            "updated_slots": {
                "type": "array",
                "description": "Inputs filled so far, in the order they were asked",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Input name"},
                        "value": {"type": "string", "description": "Value given by the user"}
                    },
                    "required": ["name", "value"],
                    "additionalProperties": false
                }
            },
            "all_inputs_filled": {"type": "boolean", "description": "All inputs are filled"},
            "user_confirmed": {"type": "boolean", "description": "The user confirmed the inputs after filling them"},
            "bot_response": {"type": "string", "description": "Bot response"}
        }))
    }

    fn message(&self) -> &str {
        &self.bot_response
    }

    fn progress(&self) -> Option<String> {
        (self.all_inputs_filled && !self.user_confirmed && !self.updated_slots.is_empty())
            .then(|| render_slots(&self.updated_slots))
    }
}

/// Reply of the workflow drafter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowTurn {
    /// Workflow plus commentary for the owner
    pub bot_response: String,
    /// The owner asked to see the workflow in this turn
    pub user_want_workflow: bool,
    pub business_workflow: String,
    pub user_confirmed: bool,
}

impl AgentResponse for WorkflowTurn {
    const SCHEMA_NAME: &'static str = "business_workflow";

    fn schema() -> Value {
        object_schema(json!({
            "bot_response": {
                "type": "string",
                "description": "Workflow and bot response. Never announce that the workflow will be shown in this message; show it."
            },
            "user_want_workflow": {
                "type": "boolean",
                "description": "The user asks right now to see the workflow (ignore earlier requests)"
            },
            "business_workflow": {"type": "string", "description": "Business workflow"},
            "user_confirmed": {
                "type": "boolean",
                "description": "The user confirmed or says that the business workflow is correct"
            }
        }))
    }

    fn message(&self) -> &str {
        &self.bot_response
    }

    fn progress(&self) -> Option<String> {
        (self.user_want_workflow && !self.business_workflow.is_empty())
            .then(|| self.business_workflow.clone())
    }
}

/// Object schema requiring every property, as strict structured output expects
fn object_schema(properties: Value) -> Value {
    let required: Vec<&String> = properties
        .as_object()
        .map(|props| props.keys().collect())
        .unwrap_or_default();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_require_every_property() {
        for schema in [
            QuestionTurn::schema(),
            BusinessClassification::schema(),
            PackageInputsTurn::schema(),
            WorkflowTurn::schema(),
        ] {
            let properties = schema["properties"].as_object().unwrap();
            let required = schema["required"].as_array().unwrap();
            assert_eq!(properties.len(), required.len());
            assert_eq!(schema["additionalProperties"], false);
        }
    }

    #[test]
    fn test_business_type_parsing() {
        let parsed: BusinessClassification =
            serde_json::from_value(json!({"business_type": "e-commerce", "reasoning": "vende"}))
                .unwrap();
        assert_eq!(parsed.business_type, BusinessType::ECommerce);

        let parsed: BusinessClassification =
            serde_json::from_value(json!({"business_type": "restaurant"})).unwrap();
        assert_eq!(parsed.business_type, BusinessType::Other);
        assert_eq!(parsed.reasoning, "");
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let turn: PackageInputsTurn =
            serde_json::from_value(json!({"bot_response": "¿Cuál es el monto?"})).unwrap();
        assert!(!turn.all_inputs_filled);
        assert!(!turn.user_confirmed);
        assert!(!turn.is_complete());
        assert!(turn.updated_slots.is_empty());
    }

    #[test]
    fn test_package_turn_progress_only_before_confirmation() {
        let mut turn = PackageInputsTurn {
            package_name: "Pagos".to_string(),
            updated_slots: vec![Slot::new("input1", "10")],
            all_inputs_filled: true,
            user_confirmed: false,
            bot_response: "¿Confirmas?".to_string(),
        };
        assert_eq!(turn.progress().as_deref(), Some("input1 = 10"));

        turn.user_confirmed = true;
        assert!(turn.is_complete());
        assert!(turn.progress().is_none());
    }

    #[test]
    fn test_workflow_progress_when_requested() {
        let turn = WorkflowTurn {
            bot_response: "Aquí está".to_string(),
            user_want_workflow: true,
            business_workflow: "1. Saludo".to_string(),
            user_confirmed: false,
        };
        assert_eq!(turn.progress().as_deref(), Some("1. Saludo"));
        assert!(WorkflowTurn::default().progress().is_none());
    }
}
