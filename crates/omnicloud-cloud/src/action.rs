//! Action types for previewing a stack

use crate::resource::{ResourceConfig, ResourceSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a planned action for a cloud resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier for the action
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Resource type token (e.g., "aws:s3/bucket:Bucket")
    pub resource_type: String,

    /// Logical resource name
    pub resource_id: String,

    /// Description of the action
    pub description: String,

    /// Additional details about the action
    pub details: HashMap<String, serde_json::Value>,
}

impl Action {
    fn for_resource(action_type: ActionType, resource: &ResourceConfig) -> Self {
        let mut details = HashMap::new();
        details.insert(
            "provider".to_string(),
            serde_json::json!(resource.provider),
        );
        if let Some(parent) = &resource.parent {
            details.insert("parent".to_string(), serde_json::json!(parent));
        }

        Self {
            id: format!("{}-{}", action_type, resource.key()),
            action_type,
            resource_type: resource.resource_type.clone(),
            resource_id: resource.name.clone(),
            description: format!("{} {} {}", action_type, resource.resource_type, resource.name),
            details,
        }
    }
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Delete a resource
    Delete,
    /// Drop the resource from the stack but leave it in the cloud
    Retain,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::Retain => write!(f, "retain"),
        }
    }
}

/// Plan containing all actions to be applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// List of actions to perform
    pub actions: Vec<Action>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = !actions.is_empty();
        Self {
            actions,
            has_changes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Create every resource, in registration order
    pub fn create(resources: &ResourceSet) -> Self {
        Self::new(
            resources
                .iter()
                .map(|r| Action::for_resource(ActionType::Create, r))
                .collect(),
        )
    }

    /// Tear down every resource, dependents first
    ///
    /// Resources declared with `retain_on_delete` are only forgotten.
    pub fn destroy(resources: &ResourceSet) -> Self {
        Self::new(
            resources
                .iter()
                .rev()
                .map(|r| {
                    let action_type = if r.retain_on_delete {
                        ActionType::Retain
                    } else {
                        ActionType::Delete
                    };
                    Action::for_resource(action_type, r)
                })
                .collect(),
        )
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            retain: self.actions_by_type(ActionType::Retain).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub delete: usize,
    pub retain: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to delete, {} to retain",
            self.create, self.delete, self.retain
        )
    }
}
