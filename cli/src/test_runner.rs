use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use guidebook::ContentBlock;
use guidebook::import::{ImportError, Importer};
use guidebook::section::{Resolution, list_sections, resolve_section};
use guidebook::toc::build_toc;

const FIXTURE_SUFFIX: &str = ".test.md";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedSection {
    pub slug: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Block kinds of the body, in order.
    #[serde(default)]
    pub body_kinds: Option<Vec<String>>,
}

/// Frontmatter of a fixture. Every expectation is optional; only the ones
/// present are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    pub description: Option<String>,

    pub expect_slugs: Option<Vec<String>>,
    pub expect_titles: Option<Vec<String>>,
    pub expect_labels: Option<Vec<String>>,
    /// One entry per section; `""` stands for a section without description.
    pub expect_descriptions: Option<Vec<String>>,
    /// Table-of-contents ids in depth-first order.
    pub expect_toc: Option<Vec<String>>,

    pub resolve: Vec<ExpectedSection>,
    /// Slugs that must not resolve.
    pub expect_not_found: Vec<String>,

    /// The import must fail with an error containing this substring.
    pub expect_import_error: Option<String>,
    /// If present (even empty), warning count and content are checked.
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

/// Split a fixture into its TOML frontmatter and Markdown body.
fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, body))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or("?", |name| name.trim_end_matches(FIXTURE_SUFFIX))
        })
    }
}

fn run_fixture(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };
    let (config, body) = match parse_fixture(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let outcome = match check_fixture(&config, body) {
        Ok(()) => TestOutcome::Pass,
        Err(reason) => TestOutcome::Fail(reason),
    };
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

/// Import the body and check every expectation the fixture states.
fn check_fixture(config: &FixtureConfig, body: &str) -> Result<(), String> {
    let result = Importer::new(body.to_string(), 0).import();

    if let Some(expected) = &config.expect_import_error {
        return match result {
            Ok(_) => Err(format!(
                "expected import error containing \"{}\", but the import succeeded",
                expected
            )),
            Err(errors) if errors.iter().any(|e| e.is_error() && e.message.contains(expected)) => {
                Ok(())
            }
            Err(errors) => Err(format!(
                "expected import error containing \"{}\", got: {}",
                expected,
                messages(&errors)
            )),
        };
    }

    let imported = result.map_err(|errors| format!("unexpected import error: {}", messages(&errors)))?;

    if let Some(expected) = &config.expect_warnings {
        check_warnings(body, &imported.warnings, expected)?;
    }

    check_sections(config, &imported.blocks)
}

fn check_sections(config: &FixtureConfig, blocks: &[ContentBlock]) -> Result<(), String> {
    let sections = list_sections(blocks);

    compare(
        "slugs",
        config.expect_slugs.as_deref(),
        sections.iter().map(|s| s.slug.clone()).collect(),
    )?;
    compare(
        "titles",
        config.expect_titles.as_deref(),
        sections.iter().map(|s| s.title.clone()).collect(),
    )?;
    compare(
        "labels",
        config.expect_labels.as_deref(),
        sections.iter().map(|s| s.ordinal_label.clone()).collect(),
    )?;
    compare(
        "descriptions",
        config.expect_descriptions.as_deref(),
        sections
            .iter()
            .map(|s| s.description.clone().unwrap_or_default())
            .collect(),
    )?;
    compare(
        "toc",
        config.expect_toc.as_deref(),
        build_toc(blocks)
            .iter()
            .flat_map(|item| item.walk())
            .map(|item| item.id.clone())
            .collect(),
    )?;

    for expected in &config.resolve {
        let Resolution::Found(section) = resolve_section(blocks, &expected.slug) else {
            return Err(format!("section \"{}\" not found", expected.slug));
        };
        if let Some(title) = &expected.title {
            if &section.title != title {
                return Err(format!(
                    "section \"{}\": expected title \"{}\", got \"{}\"",
                    expected.slug, title, section.title
                ));
            }
        }
        if let Some(kinds) = &expected.body_kinds {
            let actual: Vec<&str> = section.body.iter().map(ContentBlock::kind).collect();
            if actual != *kinds {
                return Err(format!(
                    "section \"{}\": body mismatch\n  expected: {:?}\n  actual:   {:?}",
                    expected.slug, kinds, actual
                ));
            }
        }
    }

    for slug in &config.expect_not_found {
        if resolve_section(blocks, slug).is_found() {
            return Err(format!("expected \"{}\" not to resolve, but it did", slug));
        }
    }

    Ok(())
}

fn compare(what: &str, expected: Option<&[String]>, actual: Vec<String>) -> Result<(), String> {
    match expected {
        Some(expected) if expected != actual.as_slice() => Err(format!(
            "{} mismatch\n  expected: {:?}\n  actual:   {:?}",
            what, expected, actual
        )),
        _ => Ok(()),
    }
}

fn messages(errors: &[ImportError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_warnings(
    source: &str,
    warnings: &[ImportError],
    expected: &[ExpectedWarning],
) -> Result<(), String> {
    if warnings.len() != expected.len() {
        let actual: Vec<String> = warnings.iter().map(|w| format!("  - {}", w)).collect();
        return Err(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual.is_empty() {
                "    (none)".to_string()
            } else {
                actual.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Err(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }
        if let Some(expected_line) = expected.line {
            let actual_line = actual.line(source);
            if actual_line != expected_line {
                return Err(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    Ok(())
}

/// Fixtures grouped by category (subfolder relative to root), sorted.
/// Files directly in `root` get category "".
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fixtures(&path, root, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(FIXTURE_SUFFIX))
        {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// ANSI styling of the report, off with `--no-color`.
struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, s: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, s)
        } else {
            s.to_string()
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }
}

/// Select the categories to run. Unknown requests are reported and skipped.
fn select<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let request = request.trim_matches('/');
        let prefix = format!("{}/", request);
        let before = selected.len();
        for (category, files) in all {
            if category == request || category.starts_with(&prefix) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                request,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

/// Run every fixture under `path` (or the single file `path`).
/// Returns the exit code: 0 when all pass, 1 otherwise.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { color: !no_color };

    let all = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover_categorized(path)
    };
    if all.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let selected = select(&all, categories);
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &selected {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", style.bold(category_label(category)));
        }
        for file in files.iter() {
            let result = run_fixture(file);
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.fail(), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("31", "FAILED"),
            passed,
            failed,
            passed + failed
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "---\n\
description = \"two sections\"\n\
expect_slugs = [\"intro\", \"next\"]\n\
expect_descriptions = [\"hello\", \"\"]\n\
\n\
[[resolve]]\n\
slug = \"intro\"\n\
body_kinds = [\"paragraph\"]\n\
---\n\
## Intro\n\
\n\
hello\n\
\n\
## Next\n";

    #[test]
    fn fixture_splits_frontmatter_and_body() {
        let (config, body) = parse_fixture(FIXTURE).unwrap();
        assert_eq!(config.description.as_deref(), Some("two sections"));
        assert_eq!(config.resolve.len(), 1);
        assert!(body.starts_with("## Intro\n"));
        assert_eq!(check_fixture(&config, body), Ok(()));
    }

    #[test]
    fn mismatch_is_reported() {
        let (mut config, body) = parse_fixture(FIXTURE).unwrap();
        config.expect_slugs = Some(vec!["intro".into()]);
        let reason = check_fixture(&config, body).unwrap_err();
        assert!(reason.starts_with("slugs mismatch"));
    }

    #[test]
    fn missing_delimiters() {
        assert!(parse_fixture("## Intro\n").is_err());
        assert!(parse_fixture("---\ndescription = \"x\"\n").is_err());
    }

    #[test]
    fn warning_lines_are_checked() {
        let body = "## Data\n\n---\n";
        let imported = Importer::new(body.to_string(), 0).import().unwrap();
        let expected = |line| {
            vec![ExpectedWarning {
                contains: "horizontal rule".into(),
                line: Some(line),
            }]
        };
        assert_eq!(check_warnings(body, &imported.warnings, &expected(3)), Ok(()));
        assert!(check_warnings(body, &imported.warnings, &expected(1)).is_err());
    }
}
