//! RFML test files.
//!
//! An RFML file looks like:
//!
//! ```text
//! #! login_works
//! # title: Login works
//! # start_uri: /login
//! # tags: smoke, auth
//!
//! Enter your email and password, then click "Sign in".
//! Do you see your dashboard?
//!
//! - shared_logout
//! ```
//!
//! The first line carries the RFML id. Header lines are `# key: value`;
//! other `#` lines are comments. The body is blank-line separated blocks:
//! an action line followed by a question line, or `- <rfml_id>` to embed
//! another test.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{RainforestError, Result};

/// File extension for RFML tests.
pub const EXTENSION: &str = "rfml";

/// One element of a test body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestElement {
    /// An action and the question that checks it.
    Step { action: String, response: String },
    /// Another test embedded by RFML id.
    Test { rfml_id: String },
}

/// A test as written in an RFML file and exchanged with the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RfmlTest {
    /// Remote id, only present on tests fetched from the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default)]
    pub rfml_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub browsers: Vec<String>,

    #[serde(default)]
    pub elements: Vec<TestElement>,
}

impl RfmlTest {
    /// RFML ids of embedded tests, in order.
    pub fn embedded_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            TestElement::Test { rfml_id } => Some(rfml_id.as_str()),
            TestElement::Step { .. } => None,
        })
    }
}

/// A parsed test together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfmlFile {
    pub path: PathBuf,
    pub test: RfmlTest,
}

// =============================================================================
// Parsing
// =============================================================================

fn rfml_error(path: &Path, line: usize, message: impl Into<String>) -> RainforestError {
    RainforestError::Rfml {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse RFML text. `path` is only used for error locations.
///
/// # Errors
///
/// Returns `Rfml` with the offending line when the text is malformed.
pub fn parse(path: &Path, content: &str) -> Result<RfmlTest> {
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

    let rfml_id = match lines.next() {
        Some((_, first)) if first.starts_with("#!") => first[2..].trim().to_string(),
        _ => return Err(rfml_error(path, 1, "first line must be `#! <rfml_id>`")),
    };
    if rfml_id.is_empty() {
        return Err(rfml_error(path, 1, "RFML id is empty"));
    }

    let mut test = RfmlTest {
        rfml_id,
        ..RfmlTest::default()
    };
    let mut title = None;
    let mut body: Vec<(usize, &str)> = Vec::new();

    for (number, line) in lines.by_ref() {
        let Some(header) = line.strip_prefix('#') else {
            body.push((number, line));
            break;
        };
        let Some((key, value)) = header.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "title" => title = Some(value.to_string()),
            "start_uri" => test.start_uri = Some(value.to_string()),
            "site_id" => {
                let site_id = value
                    .parse()
                    .map_err(|_| rfml_error(path, number, format!("invalid site_id \"{value}\"")))?;
                test.site_id = Some(site_id);
            }
            "tags" => test.tags = split_list(value),
            "browsers" => test.browsers = split_list(value),
            _ => {}
        }
    }

    test.title = match title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(rfml_error(path, 1, "missing `# title:` header")),
    };

    body.extend(lines);
    test.elements = parse_body(path, &body)?;
    Ok(test)
}

fn parse_body(path: &Path, lines: &[(usize, &str)]) -> Result<Vec<TestElement>> {
    let mut elements = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for &(number, line) in lines.iter().chain(std::iter::once(&(0, ""))) {
        if line.starts_with('#') {
            continue;
        }
        if !line.is_empty() {
            block.push((number, line));
            continue;
        }
        if let Some(element) = parse_block(path, &block)? {
            elements.push(element);
        }
        block.clear();
    }

    Ok(elements)
}

fn parse_block(path: &Path, block: &[(usize, &str)]) -> Result<Option<TestElement>> {
    match block {
        [] => Ok(None),
        [(number, line)] if line.starts_with('-') => {
            let rfml_id = line[1..].trim();
            if rfml_id.is_empty() {
                return Err(rfml_error(path, *number, "embedded test needs an RFML id"));
            }
            Ok(Some(TestElement::Test {
                rfml_id: rfml_id.to_string(),
            }))
        }
        [(_, action), (number, response)] => {
            if !response.ends_with('?') {
                return Err(rfml_error(path, *number, "question must end with '?'"));
            }
            Ok(Some(TestElement::Step {
                action: (*action).to_string(),
                response: (*response).to_string(),
            }))
        }
        [(number, _)] => Err(rfml_error(
            path,
            *number,
            "step needs an action line followed by a question line",
        )),
        [_, _, (number, _), ..] => Err(rfml_error(
            path,
            *number,
            "unexpected line; separate steps with a blank line",
        )),
    }
}

/// Render a test as RFML text.
#[must_use]
pub fn serialize(test: &RfmlTest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#! {}", test.rfml_id);
    let _ = writeln!(out, "# title: {}", test.title);
    if let Some(start_uri) = &test.start_uri {
        let _ = writeln!(out, "# start_uri: {start_uri}");
    }
    if let Some(site_id) = test.site_id {
        let _ = writeln!(out, "# site_id: {site_id}");
    }
    if !test.tags.is_empty() {
        let _ = writeln!(out, "# tags: {}", test.tags.join(", "));
    }
    if !test.browsers.is_empty() {
        let _ = writeln!(out, "# browsers: {}", test.browsers.join(", "));
    }

    for element in &test.elements {
        out.push('\n');
        match element {
            TestElement::Step { action, response } => {
                let _ = writeln!(out, "{action}\n{response}");
            }
            TestElement::Test { rfml_id } => {
                let _ = writeln!(out, "- {rfml_id}");
            }
        }
    }
    out
}

/// File name for a test title: lowercase words joined by `_`.
#[must_use]
pub fn file_stem_for(title: &str) -> String {
    let stem = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        "test".to_string()
    } else {
        stem
    }
}

// =============================================================================
// Files and Directories
// =============================================================================

/// Read and parse one RFML file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or `Rfml` if it is
/// malformed.
pub fn read_file(path: &Path) -> Result<RfmlFile> {
    let content = fs::read_to_string(path)?;
    let test = parse(path, &content)?;
    Ok(RfmlFile {
        path: path.to_path_buf(),
        test,
    })
}

/// RFML files under `path`, sorted. A file path is returned as is.
///
/// # Errors
///
/// Returns `NotFound` if `path` does not exist, or an I/O error if a
/// directory cannot be walked.
pub fn collect_paths(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(RainforestError::NotFound(path.display().to_string()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|e| RainforestError::Io(e.into()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(EXTENSION)
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parse every RFML file under `path`.
///
/// # Errors
///
/// Returns the first read or parse failure.
pub fn load(path: &Path) -> Result<Vec<RfmlFile>> {
    let files = collect_paths(path)?
        .iter()
        .map(|p| read_file(p))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(path = %path.display(), count = files.len(), "loaded RFML files");
    Ok(files)
}

/// Check RFML ids across files.
///
/// Ids must be unique, and every embedded test must refer to a local file or
/// one of `remote_ids`.
///
/// # Errors
///
/// Returns `Validation` listing every problem found.
pub fn check_references(files: &[RfmlFile], remote_ids: &HashSet<String>) -> Result<()> {
    let mut problems = Vec::new();
    let mut seen: HashMap<&str, &Path> = HashMap::new();

    for file in files {
        if let Some(first) = seen.insert(&file.test.rfml_id, &file.path) {
            problems.push(format!(
                "duplicate RFML id '{}' in {} and {}",
                file.test.rfml_id,
                first.display(),
                file.path.display()
            ));
        }
    }

    for file in files {
        for embedded in file.test.embedded_ids() {
            if !seen.contains_key(embedded) && !remote_ids.contains(embedded) {
                problems.push(format!(
                    "{} embeds unknown test '{embedded}'",
                    file.path.display()
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(RainforestError::Validation(problems.join("; ")))
    }
}
