//! Create and edit forms for teams and employees
//!
//! Forms hold raw field text as typed by the user. Validation turns that text
//! into a request body or a [`ConsoleError::Validation`]; nothing is sent to
//! the backend until validation passes.

use serde::{Deserialize, Serialize};

use crate::api::OrgChartApi;
use crate::model::{Employee, EmployeeUpdate, NewEmployee, NewTeam};
use crate::store::Reload;
use crate::ConsoleError;

/// Severity of an inline message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Inline message shown next to a form or view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Raw fields of the create-team form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamForm {
    #[serde(default)]
    pub name: String,
}

impl TeamForm {
    pub fn validate(&self) -> crate::Result<NewTeam> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConsoleError::Validation("Team name is required".to_string()));
        }
        Ok(NewTeam {
            name: name.to_string(),
        })
    }
}

/// Raw fields of the employee form. Selections are the option values as
/// submitted: an id, or empty for none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub manager_id: String,
}

struct ValidEmployee {
    name: String,
    email: String,
    title: String,
    team_id: Option<u64>,
    manager_id: Option<u64>,
}

impl EmployeeForm {
    /// Pre-fill the form from an existing employee
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            title: employee.title.clone(),
            team_id: employee
                .team_key()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            manager_id: employee
                .manager_key()
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }

    fn validate(&self) -> crate::Result<ValidEmployee> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConsoleError::Validation("Name is required".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ConsoleError::Validation("Email is required".to_string()));
        }
        Ok(ValidEmployee {
            name: name.to_string(),
            email: email.to_string(),
            title: self.title.trim().to_string(),
            team_id: parse_selection(&self.team_id, "team")?,
            manager_id: parse_selection(&self.manager_id, "manager")?,
        })
    }

    /// Body for `POST /employees`
    pub fn to_new_employee(&self) -> crate::Result<NewEmployee> {
        let valid = self.validate()?;
        Ok(NewEmployee {
            name: valid.name,
            email: valid.email,
            title: valid.title,
            team_id: valid.team_id,
            manager_id: valid.manager_id,
        })
    }

    /// Body for `PUT /employees/{id}`
    pub fn to_update(&self) -> crate::Result<EmployeeUpdate> {
        let valid = self.validate()?;
        Ok(EmployeeUpdate {
            name: valid.name,
            email: valid.email,
            title: valid.title,
            team_id: valid.team_id,
            manager_id: valid.manager_id,
        })
    }
}

/// Empty selection means none; anything else must be a numeric id
fn parse_selection(raw: &str, what: &str) -> crate::Result<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(Some)
        .map_err(|_| ConsoleError::Validation(format!("Invalid {} selection", what)))
}

/// Create-team form with its inline message
#[derive(Debug, Clone, Default)]
pub struct TeamFormState {
    pub form: TeamForm,
    pub message: Option<Notice>,
}

impl TeamFormState {
    pub fn with_form(form: TeamForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Validate and submit. Returns true when the team was created.
    pub async fn submit(&mut self, api: &OrgChartApi, on_created: &dyn Reload) -> bool {
        let team = match self.form.validate() {
            Ok(team) => team,
            Err(e) => {
                self.message = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        match api.create_team(&team).await {
            Ok(created) => {
                tracing::info!("Created team {} '{}'", created.id, created.name);
                self.form = TeamForm::default();
                self.message = Some(Notice::success("Team created"));
                on_created.reload().await;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to create team: {}", e);
                self.message = Some(Notice::error(e.to_string()));
                false
            }
        }
    }
}

/// Create-employee form with its inline message
#[derive(Debug, Clone, Default)]
pub struct EmployeeFormState {
    pub form: EmployeeForm,
    pub message: Option<Notice>,
}

impl EmployeeFormState {
    pub fn with_form(form: EmployeeForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Validate and submit. Returns true when the employee was created.
    pub async fn submit(&mut self, api: &OrgChartApi, on_created: &dyn Reload) -> bool {
        let employee = match self.form.to_new_employee() {
            Ok(employee) => employee,
            Err(e) => {
                self.message = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        match api.create_employee(&employee).await {
            Ok(created) => {
                tracing::info!("Created employee {} '{}'", created.id, created.name);
                self.form = EmployeeForm::default();
                self.message = Some(Notice::success("Employee created"));
                on_created.reload().await;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to create employee: {}", e);
                self.message = Some(Notice::error(e.to_string()));
                false
            }
        }
    }
}

/// Edit dialog for a single employee
#[derive(Debug, Clone, Default)]
pub struct EditEmployeeDialog {
    pub open: bool,
    pub employee: Option<Employee>,
    pub form: EmployeeForm,
    pub message: Option<Notice>,
}

impl EditEmployeeDialog {
    /// Open the dialog pre-filled from `employee`
    pub fn open_for(employee: Employee) -> Self {
        Self {
            open: true,
            form: EmployeeForm::from_employee(&employee),
            employee: Some(employee),
            message: None,
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.employee = None;
    }

    /// Manager choices: every employee except the one being edited
    pub fn manager_options<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        let own_id = self.employee.as_ref().map(|e| e.id);
        employees
            .iter()
            .filter(|e| Some(e.id) != own_id)
            .collect()
    }

    /// Validate and save. Closes the dialog and returns true on success.
    pub async fn save(&mut self, api: &OrgChartApi, on_saved: &dyn Reload) -> bool {
        let Some(id) = self.employee.as_ref().map(|e| e.id) else {
            return false;
        };
        let update = match self.form.to_update() {
            Ok(update) => update,
            Err(e) => {
                self.message = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        match api.update_employee(id, &update).await {
            Ok(updated) => {
                tracing::info!("Updated employee {} '{}'", updated.id, updated.name);
                self.message = None;
                on_saved.reload().await;
                self.close();
                true
            }
            Err(e) => {
                tracing::warn!("Failed to update employee {}: {}", id, e);
                self.message = Some(Notice::error(e.to_string()));
                false
            }
        }
    }
}
