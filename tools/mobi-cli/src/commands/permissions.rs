//! Role permission inspection.

use anyhow::{bail, Result};
use mobi_auth::{resolve, PermAction, Permission, Resource, Role};
use serde::Serialize;

use super::PermissionsArgs;
use crate::context::Context;
use crate::output::allowed_badge;

#[derive(Serialize)]
struct CheckResult<'a> {
    role: &'a str,
    permission: &'a str,
    allowed: bool,
}

/// Run the permissions command.
pub async fn run(args: PermissionsArgs, ctx: &Context) -> Result<()> {
    let role = match args.role {
        Some(ref name) => match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => bail!("{}. Known roles: {}", e, role_names()),
        },
        None => None,
    };

    match (role, args.check.as_deref()) {
        (Some(role), Some(permission)) => check(&[role], permission, ctx),
        (None, Some(permission)) => check(&Role::ALL, permission, ctx),
        (Some(role), None) => grants(role, ctx),
        (None, None) => matrix(ctx),
    }
}

fn check(roles: &[Role], permission: &str, ctx: &Context) -> Result<()> {
    let results: Vec<CheckResult> = roles
        .iter()
        .map(|role| CheckResult {
            role: role.as_str(),
            permission,
            allowed: resolve(role.as_str(), permission),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!("Check: {}", permission));
    for result in &results {
        ctx.output
            .table_row(&[result.role, allowed_badge(result.allowed).as_str()], &[12, 8]);
    }
    Ok(())
}

fn grants(role: Role, ctx: &Context) -> Result<()> {
    let grants: Vec<String> = role.permissions().iter().map(ToString::to_string).collect();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "role": role.as_str(), "grants": grants }));
        return Ok(());
    }

    ctx.output.header(&format!("{} ({})", role.display_name(), role.as_str()));
    ctx.output.kv("back-office", if role.is_staff() { "yes" } else { "no" });
    for grant in &grants {
        ctx.output.list_item(grant);
    }
    Ok(())
}

fn matrix(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let rows: Vec<_> = Role::ALL
            .iter()
            .map(|role| {
                serde_json::json!({
                    "role": role.as_str(),
                    "resources": Resource::ALL
                        .iter()
                        .map(|r| (r.as_str(), matrix_cell(*role, *r)))
                        .collect::<std::collections::BTreeMap<_, _>>(),
                })
            })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Role permissions (R=read C=create U=update D=delete)");
    let mut widths = vec![12];
    widths.extend(Resource::ALL.iter().map(|r| r.as_str().len().max(4)));

    let mut header = vec!["role"];
    header.extend(Resource::ALL.iter().map(|r| r.as_str()));
    ctx.output.table_row(&header, &widths);

    for role in Role::ALL {
        let cells: Vec<String> = Resource::ALL.iter().map(|r| matrix_cell(role, *r)).collect();
        let mut row = vec![role.as_str()];
        row.extend(cells.iter().map(String::as_str));
        ctx.output.table_row(&row, &widths);
    }
    Ok(())
}

/// `RCUD` with `-` for each missing action.
fn matrix_cell(role: Role, resource: Resource) -> String {
    PermAction::ALL
        .iter()
        .map(|action| {
            if role.allows(Permission::new(resource, *action)) {
                action_letter(*action)
            } else {
                '-'
            }
        })
        .collect()
}

fn action_letter(action: PermAction) -> char {
    match action {
        PermAction::Read => 'R',
        PermAction::Create => 'C',
        PermAction::Update => 'U',
        PermAction::Delete => 'D',
    }
}

fn role_names() -> String {
    Role::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_cells() {
        assert_eq!(matrix_cell(Role::SuperAdmin, Resource::Settings), "RCUD");
        assert_eq!(matrix_cell(Role::Editor, Resource::Products), "RCU-");
        assert_eq!(matrix_cell(Role::Viewer, Resource::Orders), "R---");
        assert_eq!(matrix_cell(Role::Customer, Resource::Users), "----");
    }
}
