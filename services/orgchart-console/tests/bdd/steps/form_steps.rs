//! BDD step definitions for the create and edit forms

use cucumber::when;

use crate::world::ConsoleWorld;

/// application/x-www-form-urlencoded value encoding
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{:02X}", other),
        })
        .collect()
}

fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn id_or_blank(world: &ConsoleWorld, name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        world.backend.employee_id(name).to_string()
    }
}

#[when(expr = "I submit the team form with name {string}")]
async fn submit_team(world: &mut ConsoleWorld, name: String) {
    let body = form_body(&[("name", name.as_str())]);
    world.post_form("/teams", &body).await;
}

#[when(expr = "I submit the employee form with name {string}, email {string} and title {string}")]
async fn submit_employee(world: &mut ConsoleWorld, name: String, email: String, title: String) {
    let body = form_body(&[
        ("name", name.as_str()),
        ("email", email.as_str()),
        ("title", title.as_str()),
        ("team_id", ""),
        ("manager_id", ""),
    ]);
    world.post_form("/employees", &body).await;
}

#[when(expr = "I submit the employee form for {string} in team {string} reporting to {string}")]
async fn submit_employee_placed(
    world: &mut ConsoleWorld,
    name: String,
    team: String,
    manager: String,
) {
    let team_id = world.backend.team_id(&team).to_string();
    let manager_id = id_or_blank(world, &manager);
    let email = format!("{}@corp.com", name.to_lowercase());
    let body = form_body(&[
        ("name", name.as_str()),
        ("email", email.as_str()),
        ("title", "Engineer"),
        ("team_id", team_id.as_str()),
        ("manager_id", manager_id.as_str()),
    ]);
    world.post_form("/employees", &body).await;
}

#[when(expr = "I open the edit dialog for {string}")]
async fn open_edit(world: &mut ConsoleWorld, name: String) {
    let id = world.backend.employee_id(&name);
    world.get(&format!("/employees/{}/edit", id)).await;
}

#[when(expr = "I save {string} with title {string} and manager {string}")]
async fn save_employee(world: &mut ConsoleWorld, name: String, title: String, manager: String) {
    let employee = world.backend.employee(&name).expect("employee not found");
    let manager_id = id_or_blank(world, &manager);
    let team_id = employee.team_id.map(|id| id.to_string()).unwrap_or_default();
    let body = form_body(&[
        ("name", employee.name.as_str()),
        ("email", employee.email.as_str()),
        ("title", title.as_str()),
        ("team_id", team_id.as_str()),
        ("manager_id", manager_id.as_str()),
    ]);
    world
        .post_form(&format!("/employees/{}", employee.id), &body)
        .await;
}

#[when(expr = "I save {string} with a blank name")]
async fn save_blank_name(world: &mut ConsoleWorld, name: String) {
    let employee = world.backend.employee(&name).expect("employee not found");
    let body = form_body(&[
        ("name", " "),
        ("email", employee.email.as_str()),
        ("title", employee.title.as_str()),
        ("team_id", ""),
        ("manager_id", ""),
    ]);
    world
        .post_form(&format!("/employees/{}", employee.id), &body)
        .await;
}
