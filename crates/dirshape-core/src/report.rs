use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::violation::{ErrorCollector, Violation};

// Violation paths shown relative to the validated root, always with '/'.
fn display_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut t = rel.to_string_lossy().replace('\\', "/");

    while let Some(rest) = t.strip_prefix("./") {
        t = rest.to_string();
    }

    if t.is_empty() {
        t.push('.');
    }

    t
}

#[derive(Serialize)]
struct JsonOut<'a> {
    ok: bool,
    violations: Vec<JsonViolation<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonViolation<'a> {
    code: &'static str,
    path: String,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    violation_count: usize,
    // code -> count, sorted for stable output
    by_code: BTreeMap<&'static str, usize>,
}

fn summarize(errs: &ErrorCollector) -> BTreeMap<&'static str, usize> {
    let mut by_code = BTreeMap::new();
    for v in errs {
        *by_code.entry(v.kind.code()).or_insert(0) += 1;
    }
    by_code
}

fn json_violation<'a>(root: &Path, v: &'a Violation) -> JsonViolation<'a> {
    JsonViolation {
        code: v.kind.code(),
        path: display_key(root, &v.path),
        message: v.kind.message(),
        detail: v.detail.as_deref(),
    }
}

/// Machine-readable report of a validation run.
pub fn render_json(errs: &ErrorCollector, root: &Path) -> String {
    let out = JsonOut {
        ok: errs.is_empty(),
        violations: errs.iter().map(|v| json_violation(root, v)).collect(),
        summary: JsonSummary {
            violation_count: errs.count(),
            by_code: summarize(errs),
        },
    };

    // Only plain strings and numbers go in, so this cannot fail in practice.
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{\"ok\":false}".to_string())
}

/// Line-oriented report. `quiet` prints bare paths only.
pub fn render_human(errs: &ErrorCollector, root: &Path, verbosity: u8, quiet: bool) -> String {
    let mut out = String::new();

    if quiet {
        for v in errs {
            out.push_str(&display_key(root, &v.path));
            out.push('\n');
        }
        return out;
    }

    if errs.is_empty() {
        out.push_str("OK: directory matches its shape\n");
        return out;
    }

    for v in errs {
        out.push_str(&format!(
            "{}: {}: {}",
            v.kind.code(),
            display_key(root, &v.path),
            v.kind.message()
        ));
        if let Some(detail) = &v.detail {
            out.push_str(&format!(" ({detail})"));
        }
        out.push('\n');
    }

    if verbosity > 0 {
        out.push_str(&format!("summary: violations={}\n", errs.count()));
        for (code, n) in summarize(errs) {
            out.push_str(&format!("  {code}={n}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;

    fn sample(root: &Path) -> ErrorCollector {
        let mut errs = ErrorCollector::accumulating();
        errs.push(Violation::new(ViolationKind::UnexpectedFile, root.join("src/extra.js")))
            .unwrap();
        errs.push(
            Violation::new(ViolationKind::InvalidContent, root.join("cfg.json")).with_detail("bad"),
        )
        .unwrap();
        errs
    }

    #[test]
    fn display_key_is_relative() {
        let root = Path::new("/tmp/r");
        assert_eq!(display_key(root, Path::new("/tmp/r/a/b.txt")), "a/b.txt");
        assert_eq!(display_key(root, root), ".");
        assert_eq!(display_key(root, Path::new("/elsewhere/x")), "/elsewhere/x");
    }

    #[test]
    fn human_lists_each_violation() {
        let root = Path::new("/tmp/r");
        let text = render_human(&sample(root), root, 1, false);

        assert!(text.contains("unexpected_file: src/extra.js: unexpected file\n"));
        assert!(text.contains("invalid_content: cfg.json: invalid content (bad)\n"));
        assert!(text.contains("summary: violations=2\n"));
    }

    #[test]
    fn human_quiet_and_ok() {
        let root = Path::new("/tmp/r");
        assert_eq!(
            render_human(&sample(root), root, 0, true),
            "src/extra.js\ncfg.json\n"
        );
        assert_eq!(
            render_human(&ErrorCollector::accumulating(), root, 0, false),
            "OK: directory matches its shape\n"
        );
    }

    #[test]
    fn json_shape() {
        let root = Path::new("/tmp/r");
        let v: serde_json::Value = serde_json::from_str(&render_json(&sample(root), root)).unwrap();

        assert_eq!(v["ok"], false);
        assert_eq!(v["summary"]["violation_count"], 2);
        assert_eq!(v["summary"]["by_code"]["unexpected_file"], 1);
        assert_eq!(v["violations"][0]["path"], "src/extra.js");
        assert_eq!(v["violations"][1]["detail"], "bad");
        assert!(v["violations"][0].get("detail").is_none());
    }
}
