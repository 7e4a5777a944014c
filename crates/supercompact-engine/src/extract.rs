//! Regex-family entity extraction.
//!
//! One compiled pattern set, built once and shared read-only across scorer
//! runs. Patterns are anchored enough that ambiguous tokens do not inflate
//! coverage; matches are trimmed, de-noised and deduplicated per turn.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use supercompact_rollout::Turn;
use supercompact_types::{Entity, EntityIndex, EntitySet, EntityType};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`\])]+"#).unwrap());

// Absolute-ish paths with at least two separator segments: /foo/bar,
// ./a/b, ~/x/y. URL-derived paths are excluded by span overlap instead of
// lookbehind (the regex crate has none).
static ABS_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.~]?(?:/[\w.\-]+){2,}").unwrap());

// Relative paths with a directory separator: src/lib.rs, a/b/c.
static REL_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w.\-]+(?:/[\w.\-]+)+").unwrap());

// Bare file names with an extension: main.rs, pyproject.toml.
static FILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w\-]+\.[A-Za-z][A-Za-z0-9]{0,5}\b").unwrap());

// Ports: ":8080" or "port 8080" / "PORT=8080".
static PORT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bport[= ]+(\d{2,5})\b").unwrap());
static PORT_COLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d{2,5})(?:[/\s,)]|$)").unwrap());

// HTTP status codes in an error/status context.
static HTTP_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([1-5]\d{2})\s+(?:Unauthorized|Forbidden|Not Found|Internal Server Error|Bad Request|OK|Created|Accepted|No Content|Bad Gateway|Service Unavailable|Gateway Timeout|error|Error|ERROR)",
    )
    .unwrap()
});

// CamelCase exception names.
static EXCEPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-zA-Z]*(?:Error|Exception|Warning))\b").unwrap());

// Error codes: errno names (EPERM, ECONNREFUSED) and rustc codes (E0382).
static ERROR_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bE(?:[A-Z]{2,12}|\d{4})\b").unwrap());

// snake_case or dotted callables followed by an opening paren.
static FUNC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z_][a-z0-9_]*(?:\.[a-z_][a-z0-9_]*)*)\s*\(").unwrap());

// CamelCase identifiers with at least two humps.
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-z]+(?:[A-Z][a-z]+)+)\b").unwrap());

// Package names after an install command.
static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:pip install|pip3 install|npm install|yarn add|pacman -S|yay -S|cargo install|cargo add|gem install|go install)\s+([a-zA-Z][a-zA-Z0-9_\-]+)",
    )
    .unwrap()
});

// Shell commands: common CLI tools at line start or after a prompt.
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)(?:^|\$\s+)((?:git|docker|npm|pip|python|node|cargo|make|curl|wget|ssh|scp|rsync|kubectl|uv|systemctl)\s+[a-z][a-z0-9_\- ]{2,40})",
    )
    .unwrap()
});

// SCREAMING_SNAKE_CASE with at least two tokens.
static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)+\b").unwrap());

// Trivial callables that would otherwise dominate the function type.
static SKIP_FUNCS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "print", "len", "str", "int", "list", "dict", "set", "type", "range", "open", "super",
        "self", "init", "main", "test", "run", "get", "put", "post", "vec", "some", "none", "ok",
        "err", "format", "println",
    ]
    .into_iter()
    .collect()
});

// Wordlike all-caps tokens that are not environment variables.
static SKIP_ENVS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "TODO_LIST", "NOTE_THAT", "READ_ME", "END_OF", "AS_IS",
    ]
    .into_iter()
    .collect()
});

// Dotted abbreviations the file-name pattern would otherwise pick up.
static SKIP_FILE_NAMES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["e.g", "i.e", "p.s", "a.m", "p.m", "etc.etc"].into_iter().collect());

fn overlaps(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start < e && end > s)
}

/// Extract the typed entity set of one turn's text.
pub fn extract_entities(text: &str) -> EntitySet {
    let mut set = EntitySet::new();

    let mut add = |etype: EntityType, raw: &str| {
        if let Some(entity) = Entity::new(etype, raw) {
            set.insert(entity);
        }
    };

    // URLs first so URL-derived path fragments can be excluded below.
    let mut url_spans: Vec<(usize, usize)> = Vec::new();
    for m in URL_RE.find_iter(text) {
        add(EntityType::Url, m.as_str());
        url_spans.push((m.start(), m.end()));
    }

    // Paths, most specific pattern first; later patterns skip spans already
    // claimed so subsets of one path are not reported twice.
    let mut path_spans = url_spans.clone();
    for re in [&*ABS_PATH_RE, &*REL_PATH_RE] {
        for m in re.find_iter(text) {
            if overlaps(&path_spans, m.start(), m.end()) {
                continue;
            }
            add(EntityType::FilePath, m.as_str());
            path_spans.push((m.start(), m.end()));
        }
    }
    for m in FILE_NAME_RE.find_iter(text) {
        if overlaps(&path_spans, m.start(), m.end())
            || SKIP_FILE_NAMES.contains(m.as_str().to_lowercase().as_str())
        {
            continue;
        }
        add(EntityType::FilePath, m.as_str());
        path_spans.push((m.start(), m.end()));
    }

    for re in [&*PORT_WORD_RE, &*PORT_COLON_RE] {
        for cap in re.captures_iter(text) {
            let port = &cap[1];
            if let Ok(n) = port.parse::<u32>()
                && ((80..=99).contains(&n) || (1024..=65535).contains(&n))
            {
                add(EntityType::Port, port);
            }
        }
    }

    for cap in HTTP_STATUS_RE.captures_iter(text) {
        add(EntityType::HttpStatus, &cap[1]);
    }

    for cap in EXCEPTION_RE.captures_iter(text) {
        add(EntityType::Exception, &cap[1]);
    }

    for m in ERROR_CODE_RE.find_iter(text) {
        add(EntityType::Error, m.as_str());
    }

    for cap in FUNC_RE.captures_iter(text) {
        let name = &cap[1];
        if name.len() >= 4 && !SKIP_FUNCS.contains(name) {
            add(EntityType::Function, name);
        }
    }

    for cap in CLASS_RE.captures_iter(text) {
        add(EntityType::ClassName, &cap[1]);
    }

    for cap in PACKAGE_RE.captures_iter(text) {
        add(EntityType::Package, &cap[1]);
    }

    for cap in COMMAND_RE.captures_iter(text) {
        add(EntityType::Command, cap[1].trim_end());
    }

    for m in ENV_VAR_RE.find_iter(text) {
        let var = m.as_str();
        if var.len() >= 4 && !SKIP_ENVS.contains(var) {
            add(EntityType::EnvVar, var);
        }
    }

    set
}

/// Extract entities for every turn and build the global index over them.
pub fn extract_all(turns: &[Turn]) -> (Vec<EntitySet>, EntityIndex) {
    let per_turn: Vec<EntitySet> = turns.iter().map(|t| extract_entities(&t.text)).collect();
    let indexed: Vec<(usize, EntitySet)> = per_turn
        .iter()
        .enumerate()
        .map(|(i, set)| (i, set.clone()))
        .collect();
    let index = EntityIndex::build(&indexed);
    (per_turn, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str, etype: EntityType) -> Vec<String> {
        extract_entities(text)
            .into_iter()
            .filter(|e| e.etype == etype)
            .map(|e| e.surface)
            .collect()
    }

    #[test]
    fn test_paths_need_separator_or_extension() {
        let found = surfaces(
            "edit src/watcher.rs and /etc/nginx/nginx.conf, also Cargo.toml; not plainword",
            EntityType::FilePath,
        );
        assert!(found.contains(&"src/watcher.rs".to_string()));
        assert!(found.contains(&"/etc/nginx/nginx.conf".to_string()));
        assert!(found.contains(&"Cargo.toml".to_string()));
        assert!(!found.iter().any(|s| s.contains("plainword")));
    }

    #[test]
    fn test_url_fragments_are_not_paths() {
        let text = "see https://docs.rs/regex/latest/regex/ for details";
        let entities = extract_entities(text);
        assert!(entities.iter().any(|e| e.etype == EntityType::Url));
        assert!(
            !entities
                .iter()
                .any(|e| e.etype == EntityType::FilePath && e.surface.contains("docs.rs"))
        );
    }

    #[test]
    fn test_paths_keep_case_other_types_fold() {
        let entities = extract_entities("ValueError in /Users/Dev/App.py");
        assert!(entities.contains(&Entity {
            etype: EntityType::FilePath,
            surface: "/Users/Dev/App.py".to_string(),
        }));
        assert!(entities.contains(&Entity {
            etype: EntityType::Exception,
            surface: "valueerror".to_string(),
        }));
    }

    #[test]
    fn test_exceptions_are_camelcase_with_known_suffix() {
        let found = surfaces(
            "ModuleNotFoundError and DeprecationWarning but not SegFault",
            EntityType::Exception,
        );
        assert_eq!(found, vec!["deprecationwarning", "modulenotfounderror"]);
    }

    #[test]
    fn test_port_ranges_filter_noise() {
        let found = surfaces("listen on :8080, retry on :443, :70000 ignored", EntityType::Port);
        assert_eq!(found, vec!["8080"]);

        let found = surfaces("the server uses port 5432 now", EntityType::Port);
        assert_eq!(found, vec!["5432"]);
    }

    #[test]
    fn test_env_vars_need_two_tokens() {
        let found = surfaces("set DATABASE_URL and PATH and RUST_LOG=debug", EntityType::EnvVar);
        assert_eq!(found, vec!["database_url", "rust_log"]);
    }

    #[test]
    fn test_error_codes() {
        let found = surfaces("bind failed with EADDRINUSE, see E0382", EntityType::Error);
        assert_eq!(found, vec!["e0382", "eaddrinuse"]);
    }

    #[test]
    fn test_functions_filter_trivial_names() {
        let found = surfaces("call parse_config() then print(x)", EntityType::Function);
        assert_eq!(found, vec!["parse_config"]);
    }

    #[test]
    fn test_commands_and_packages() {
        let text = "$ git rebase -i main\nthen run pip install requests";
        let entities = extract_entities(text);
        assert!(entities.iter().any(|e| e.etype == EntityType::Command && e.surface.starts_with("git rebase")));
        assert!(entities.contains(&Entity {
            etype: EntityType::Package,
            surface: "requests".to_string(),
        }));
    }

    #[test]
    fn test_http_status_needs_context() {
        assert_eq!(surfaces("got 404 Not Found", EntityType::HttpStatus), vec!["404"]);
        assert!(surfaces("line 404 of the file", EntityType::HttpStatus).is_empty());
    }

    #[test]
    fn test_duplicates_collapse_within_a_turn() {
        let entities = extract_entities(":8080 and :8080 again");
        let ports: Vec<_> = entities.iter().filter(|e| e.etype == EntityType::Port).collect();
        assert_eq!(ports.len(), 1);
    }
}
