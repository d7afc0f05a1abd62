//! Wire types for the org chart backend
//!
//! The console never owns these records; they mirror what the backend sends
//! and accepts.

use serde::{Deserialize, Serialize};

/// A named grouping of employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

/// Reference from an employee to its manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub title: String,
}

/// A person record as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub manager_id: Option<u64>,
    #[serde(default)]
    pub manager: Option<ManagerRef>,
}

impl Employee {
    /// Team id, preferring the embedded team over the bare foreign key
    pub fn team_key(&self) -> Option<u64> {
        self.team.as_ref().map(|t| t.id).or(self.team_id)
    }

    /// Manager id, preferring the embedded reference over the bare foreign key
    pub fn manager_key(&self) -> Option<u64> {
        self.manager.as_ref().map(|m| m.id).or(self.manager_id)
    }

    /// Label used in select options: name and title, or just the name
    pub fn option_label(&self) -> String {
        if self.title.is_empty() {
            self.name.clone()
        } else {
            format!("{} — {}", self.name, self.title)
        }
    }
}

/// Backend-computed node of the reporting hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including the root
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Body of `POST /teams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    pub name: String,
}

/// Body of `POST /employees`; absent ids are left out of the JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<u64>,
}

/// Body of `PUT /employees/{id}`; absent ids are sent as explicit nulls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: String,
    pub email: String,
    pub title: String,
    pub team_id: Option<u64>,
    pub manager_id: Option<u64>,
}
