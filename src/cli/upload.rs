//! `upload` command: create or update remote tests from RFML files.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, path_or_current_dir};
use crate::cli::validate::load_and_check;
use crate::core::rfml::RfmlFile;
use crate::error::Result;

/// Execute the upload command.
///
/// # Errors
///
/// Returns validation errors before anything is sent, or the first API error.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let api = services.api()?;
    let path = path_or_current_dir(ctx);
    let checked = load_and_check(&path, services).await?;

    let mut known: HashMap<String, i64> = checked
        .remote
        .iter()
        .map(|m| (m.rfml_id.clone(), m.id))
        .collect();

    let mut out = String::new();
    for file in upload_order(&checked.files) {
        let test = &file.test;
        if let Some(&id) = known.get(&test.rfml_id) {
            api.update_test(id, test).await?;
            tracing::info!(rfml_id = %test.rfml_id, id, "updated test");
            let _ = writeln!(out, "Updated {} ({id})", test.rfml_id);
        } else {
            let created = api.create_test(test).await?;
            tracing::info!(rfml_id = %test.rfml_id, id = ?created.id, "created test");
            if let Some(id) = created.id {
                known.insert(test.rfml_id.clone(), id);
            }
            let _ = writeln!(out, "Created {}", test.rfml_id);
        }
    }

    if out.is_empty() {
        let _ = writeln!(out, "No RFML files found in {}", path.display());
    }
    Ok(out)
}

/// Order files so embedded tests are uploaded before the tests embedding them.
#[must_use]
pub fn upload_order(files: &[RfmlFile]) -> Vec<&RfmlFile> {
    fn visit<'a>(
        file: &'a RfmlFile,
        by_id: &HashMap<&str, &'a RfmlFile>,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<&'a RfmlFile>,
    ) {
        if !visited.insert(&file.test.rfml_id) {
            return;
        }
        for embedded in file.test.embedded_ids() {
            if let Some(dep) = by_id.get(embedded) {
                visit(dep, by_id, visited, order);
            }
        }
        order.push(file);
    }

    let by_id: HashMap<&str, &RfmlFile> = files
        .iter()
        .map(|file| (file.test.rfml_id.as_str(), file))
        .collect();
    let mut visited = HashSet::new();
    let mut order = Vec::with_capacity(files.len());
    for file in files {
        visit(file, &by_id, &mut visited, &mut order);
    }
    order
}
