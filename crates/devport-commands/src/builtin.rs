//! Built-in commands shipped with the daemon.

use anyhow::Context as _;
use devport_env::{Env, execute_shell, read_json, replace_in_file};
use serde_json::{Value, json};

use crate::error::CommandError;
use crate::registry::CommandRegistry;
use crate::spec::CommandSpec;

/// Register every built-in command whose name is not in `disabled`.
pub fn register_builtin(
    registry: &mut CommandRegistry,
    disabled: &[String],
) -> Result<(), CommandError> {
    let specs = [
        CommandSpec::new("reset").on_get(reset),
        CommandSpec::new("clone-project").on_post(clone_project),
        CommandSpec::new("echo").on_post(echo).on_put(echo),
        CommandSpec::new("status").on_delete(status),
    ];
    for spec in specs {
        if disabled.iter().any(|name| name == spec.name()) {
            continue;
        }
        registry.register(spec)?;
    }
    Ok(())
}

/// Wipe and reseed the workspace directories.
async fn reset(env: Env) -> anyhow::Result<Value> {
    env.info("resetting workspace");
    env.paths().reset_workspace()?;
    Ok(json!({}))
}

/// Clone a git repository into the projects directory under a new name,
/// rewriting the package name in `package.json` and `index.html`.
async fn clone_project(body: Value, env: Env) -> anyhow::Result<Value> {
    let url = body
        .get("url")
        .and_then(Value::as_str)
        .context("clone-project body is missing \"url\"")?;
    let new_name = body
        .get("name")
        .and_then(Value::as_str)
        .context("clone-project body is missing \"name\"")?;

    let folder_name = new_name.rsplit('/').next().unwrap_or(new_name);
    let checkout_name = url
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git");
    let projects = env.paths().projects_dir.clone();
    std::fs::create_dir_all(&projects)?;

    env.info_with("cloning project", &json!({ "url": url, "name": new_name }));
    execute_shell(&format!("git clone {url}"), &projects).await?;

    let destination = projects.join(folder_name);
    if checkout_name != folder_name {
        std::fs::rename(projects.join(checkout_name), &destination)?;
    }

    let manifest = destination.join("package.json");
    let old_name = read_json(&manifest)?
        .get("name")
        .and_then(Value::as_str)
        .context("cloned package.json has no \"name\"")?
        .to_string();
    replace_in_file(&manifest, &old_name, new_name)?;
    replace_in_file(&destination.join("index.html"), &old_name, new_name)?;

    Ok(json!({}))
}

/// Return the `returnObject` field of the body, as-is.
async fn echo(body: Value, _env: Env) -> anyhow::Result<Value> {
    body.get("returnObject")
        .cloned()
        .context("echo body is missing \"returnObject\"")
}

async fn status(_env: Env) -> anyhow::Result<Value> {
    Ok(json!({ "status": "ok" }))
}
