//! Server-side HTML rendering for the console page

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::forms::{
    EditEmployeeDialog, EmployeeForm, EmployeeFormState, Notice, NoticeKind, TeamFormState,
};
use crate::model::{Employee, Team, TreeNode};
use crate::store::CollectionState;
use crate::tree::{node_marker, node_subtitle, root_options, TreeViewState};

const CELL: &str = "padding: 0.5rem; text-align: left;";
const CARD: &str = "border: 1px solid #dee2e6; border-radius: 0.75rem; padding: 1rem; margin-bottom: 1.5rem; background: #fff;";
const INPUT: &str = "width: 100%; padding: 0.4rem; border: 1px solid #ced4da; border-radius: 0.5rem;";

/// Everything needed to draw one console page
#[derive(Debug, Clone)]
pub struct Page {
    pub api_url: String,
    pub backend_up: bool,
    pub teams: CollectionState<Team>,
    pub employees: CollectionState<Employee>,
    pub team_form: TeamFormState,
    pub employee_form: EmployeeFormState,
    pub tree: TreeViewState,
    pub edit: Option<EditEmployeeDialog>,
    pub banner: Option<Notice>,
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// API URL without its scheme, as shown in the header
pub fn display_url(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

pub fn notice(n: &Notice) -> String {
    let (color, bg) = match n.kind {
        NoticeKind::Info => ("#084298", "#cfe2ff"),
        NoticeKind::Success => ("#155724", "#d4edda"),
        NoticeKind::Error => ("#721c24", "#f8d7da"),
    };
    format!(
        r#"<div class="notice notice-{kind:?}" style="padding: 0.5rem 0.75rem; margin: 0.5rem 0; border-radius: 0.5rem; color: {color}; background-color: {bg};">{text}</div>"#,
        kind = n.kind,
        color = color,
        bg = bg,
        text = escape(&n.text),
    )
}

fn input(label: &str, name: &str, value: &str, placeholder: &str) -> String {
    format!(
        r#"<label style="display: block; margin-bottom: 0.5rem;"><span style="font-size: 0.85em; color: #6c757d;">{label}</span>
            <input name="{name}" value="{value}" placeholder="{placeholder}" style="{INPUT}"></label>"#,
        label = label,
        name = name,
        value = escape(value),
        placeholder = escape(placeholder),
    )
}

fn select(
    label: &str,
    name: &str,
    selected: &str,
    none_label: &str,
    options: &[(String, String)],
) -> String {
    let mut html = format!(
        r#"<label style="display: block; margin-bottom: 0.5rem;"><span style="font-size: 0.85em; color: #6c757d;">{label}</span>
            <select name="{name}" style="{INPUT}"><option value="">{none_label}</option>"#
    );
    for (value, text) in options {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            escape(value),
            mark,
            escape(text)
        );
    }
    html.push_str("</select></label>");
    html
}

fn team_options(teams: &[Team]) -> Vec<(String, String)> {
    teams
        .iter()
        .map(|t| (t.id.to_string(), t.name.clone()))
        .collect()
}

fn employee_options<'a>(
    employees: impl IntoIterator<Item = &'a Employee>,
) -> Vec<(String, String)> {
    employees
        .into_iter()
        .map(|e| (e.id.to_string(), e.option_label()))
        .collect()
}

fn form_message(message: &Option<Notice>) -> String {
    message.as_ref().map(notice).unwrap_or_default()
}

fn employee_fields(form: &EmployeeForm, teams: &[Team], managers: Vec<(String, String)>) -> String {
    [
        input("Full name", "name", &form.name, "e.g., Alice Doe"),
        input("Email", "email", &form.email, "alice@corp.com"),
        input("Title", "title", &form.title, "e.g., Engineering Manager"),
        select("Team", "team_id", &form.team_id, "— none —", &team_options(teams)),
        select("Manager", "manager_id", &form.manager_id, "— none —", &managers),
    ]
    .concat()
}

pub fn team_card(page: &Page) -> String {
    let error = page
        .teams
        .error
        .as_ref()
        .map(|e| notice(&Notice::error(e.clone())))
        .unwrap_or_default();
    format!(
        r#"<section id="team-card" style="{CARD}">
    <h2>Create team</h2>
    {error}
    <form method="post" action="/teams">
        {name}
        <button type="submit">Create team</button>
        {message}
    </form>
    <p style="font-size: 0.8em; color: #6c757d;">{count} team(s)</p>
</section>"#,
        name = input("Team name", "name", &page.team_form.form.name, "e.g., Engineering"),
        message = form_message(&page.team_form.message),
        count = page.teams.data.len(),
    )
}

pub fn employee_card(page: &Page) -> String {
    let error = page
        .employees
        .error
        .as_ref()
        .or(page.teams.error.as_ref())
        .map(|e| notice(&Notice::error(e.clone())))
        .unwrap_or_default();
    format!(
        r#"<section id="employee-card" style="{CARD}">
    <h2>Create employee</h2>
    {error}
    <form method="post" action="/employees">
        {fields}
        <button type="submit">Create employee</button>
        {message}
    </form>
</section>"#,
        fields = employee_fields(
            &page.employee_form.form,
            &page.teams.data,
            employee_options(&page.employees.data),
        ),
        message = form_message(&page.employee_form.message),
    )
}

fn or_dash(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => escape(t),
        _ => "—".to_string(),
    }
}

/// Flat table of every employee
pub fn employee_table(employees: &[Employee]) -> String {
    let rows: String = employees
        .iter()
        .map(|e| {
            format!(
                r#"<tr style="border-top: 1px solid #dee2e6;">
                    <td style="{CELL} font-weight: 600;">{name}</td>
                    <td style="{CELL}">{title}</td>
                    <td style="{CELL}">{email}</td>
                    <td style="{CELL}">{team}</td>
                    <td style="{CELL}">{manager}</td>
                    <td style="{CELL}">
                        <a href="/employees/{id}/edit">Edit</a>
                        <form method="post" action="/employees/{id}/delete" style="display: inline;"><button type="submit">Delete</button></form>
                    </td>
                </tr>"#,
                name = escape(&e.name),
                title = or_dash(Some(&e.title)),
                email = escape(&e.email),
                team = or_dash(e.team.as_ref().map(|t| t.name.as_str())),
                manager = or_dash(e.manager.as_ref().map(|m| m.name.as_str())),
                id = e.id,
            )
        })
        .collect();
    let rows = if employees.is_empty() {
        format!(
            r#"<tr><td colspan="6" style="{CELL} text-align: center; color: #6c757d;">No employees yet</td></tr>"#
        )
    } else {
        rows
    };
    format!(
        r#"<table id="employee-table" style="width: 100%; border-collapse: collapse;">
    <thead>
        <tr style="border-bottom: 2px solid #dee2e6;">
            <th style="{CELL}">Name</th>
            <th style="{CELL}">Title</th>
            <th style="{CELL}">Email</th>
            <th style="{CELL}">Team</th>
            <th style="{CELL}">Manager</th>
            <th style="{CELL}">Actions</th>
        </tr>
    </thead>
    <tbody>{rows}</tbody>
</table>"#
    )
}

/// Recursive HTML for one subtree. Collapsed nodes hide their children.
pub fn tree_node(node: &TreeNode, collapsed: &HashSet<u64>, depth: usize) -> String {
    let mut html = format!(
        r#"<div class="tree-node" data-id="{id}" style="margin: 0.25rem 0; padding-left: {pad}px;">
    <form method="post" action="/tree/toggle/{id}" style="display: inline;"><button type="submit" class="tree-toggle">{marker}</button></form>
    <span class="tree-name" style="font-weight: 600;">{name}</span>
    <span class="tree-subtitle" style="font-size: 0.8em; color: #6c757d;">{subtitle}</span>"#,
        id = node.id,
        pad = depth * 16,
        marker = node_marker(node, collapsed),
        name = escape(&node.name),
        subtitle = escape(&node_subtitle(node)),
    );
    if node.has_children() && !collapsed.contains(&node.id) {
        html.push_str(
            r#"<div class="tree-children" style="border-left: 1px solid #dee2e6; margin-left: 1rem;">"#,
        );
        for child in &node.children {
            html.push_str(&tree_node(child, collapsed, depth + 1));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

pub fn tree_card(page: &Page) -> String {
    let selected = page
        .tree
        .root_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let picker = select(
        "Root employee",
        "root",
        &selected,
        "— select —",
        &employee_options(root_options(&page.employees.data)),
    );

    let mut body = String::new();
    if page.tree.busy {
        body.push_str(&notice(&Notice::info("Loading tree…")));
    }
    if let Some(err) = &page.tree.error {
        body.push_str(&notice(&Notice::error(err.clone())));
    }
    if let Some(node) = page.tree.visible_node() {
        let _ = write!(
            body,
            r#"<div id="tree" style="border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 0.75rem;">{}</div>"#,
            tree_node(node, &page.tree.collapsed, 0)
        );
    }

    format!(
        r#"<section id="tree-card" style="{CARD}">
    <h2>Hierarchy viewer</h2>
    <form method="post" action="/tree">
        {picker}
        <button type="submit">Show</button>
    </form>
    <form method="post" action="/tree/refresh"><button type="submit">Refresh</button></form>
    {body}
</section>"#
    )
}

pub fn edit_dialog(dialog: &EditEmployeeDialog, teams: &[Team], employees: &[Employee]) -> String {
    let Some(employee) = dialog.employee.as_ref().filter(|_| dialog.open) else {
        return String::new();
    };
    format!(
        r#"<div id="edit-dialog" style="position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,0.3);">
    <div style="{CARD} width: 100%; max-width: 36rem;">
        <h3>Edit employee</h3>
        <a href="/">Close</a>
        <form method="post" action="/employees/{id}">
            {fields}
            {message}
            <a href="/">Cancel</a>
            <button type="submit">Save changes</button>
        </form>
    </div>
</div>"#,
        id = employee.id,
        fields = employee_fields(
            &dialog.form,
            teams,
            employee_options(dialog.manager_options(employees)),
        ),
        message = form_message(&dialog.message),
    )
}

/// Full console page
pub fn render_page(page: &Page) -> String {
    let health = if page.backend_up {
        notice(&Notice::success("Backend connected"))
    } else {
        notice(&Notice::error(format!(
            "Cannot reach backend at {}.",
            page.api_url
        )))
    };
    let banner = page.banner.as_ref().map(notice).unwrap_or_default();
    let table = if page.teams.loading || page.employees.loading {
        notice(&Notice::info("Loading…"))
    } else {
        employee_table(&page.employees.data)
    };
    let dialog = page
        .edit
        .as_ref()
        .map(|d| edit_dialog(d, &page.teams.data, &page.employees.data))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>orgChart · Admin</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 1100px; margin: 0 auto; padding: 1rem; background: #f8f9fa;">
    <header style="display: flex; justify-content: space-between; align-items: center;">
        <h1>orgChart · Admin</h1>
        <span style="font-size: 0.8em; color: #6c757d;">API: {api}</span>
    </header>
    {health}
    {banner}
    {team_card}
    {employee_card}
    <section id="employees" style="{CARD}">
        <h2>Employees</h2>
        {table}
    </section>
    {tree_card}
    {dialog}
</body>
</html>"#,
        api = escape(display_url(&page.api_url)),
        team_card = team_card(page),
        employee_card = employee_card(page),
        tree_card = tree_card(page),
    )
}
