use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are left untouched so that commented-out
/// credentials do not have to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // Group 1: scoped key (`env.NAME`), group 2: optional default
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;

        for captures in placeholder().captures_iter(line) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let fallback = captures.get(2).map(|m| m.as_str());

            output.push_str(&line[last_end..whole.start()]);
            output.push_str(&resolve(key.as_str(), fallback)?);
            last_end = whole.end();
        }

        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let mut parts = key.split('.');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("env"), Some(name), None) => match std::env::var(name) {
            Ok(value) => Ok(value),
            Err(_) => fallback
                .map(ToOwned::to_owned)
                .ok_or_else(|| format!("environment variable not found: `{name}`")),
        },
        _ => Err(format!("only variables scoped with 'env.' are supported: `{key}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_placeholders() {
        let input = "name = \"openai/doubao-seed-1-6\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn api_key_from_env() {
        temp_env::with_var("ARKWAY_TEST_KEY", Some("ark-secret"), || {
            let result = expand_env("api_key = \"{{ env.ARKWAY_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"ark-secret\"");
        });
    }

    #[test]
    fn several_placeholders_on_separate_lines() {
        let vars = [("ARKWAY_BASE", Some("http://localhost:9000")), ("ARKWAY_MODEL", Some("gpt-4o"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("base_url = \"{{ env.ARKWAY_BASE }}\"\nname = \"openai/{{ env.ARKWAY_MODEL }}\"\n").unwrap();
            assert_eq!(result, "base_url = \"http://localhost:9000\"\nname = \"openai/gpt-4o\"\n");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("ARKWAY_MISSING", || {
            let err = expand_env("api_key = \"{{ env.ARKWAY_MISSING }}\"").unwrap_err();
            assert!(err.contains("ARKWAY_MISSING"));
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("api_key = \"{{ vault.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("ARKWAY_MISSING", || {
            let input = "  # api_key = \"{{ env.ARKWAY_MISSING }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("ARKWAY_OPTIONAL", || {
            let result = expand_env("timeout = \"{{ env.ARKWAY_OPTIONAL | default(\"30s\") }}\"").unwrap();
            assert_eq!(result, "timeout = \"30s\"");
        });

        temp_env::with_var("ARKWAY_OPTIONAL", Some("5m"), || {
            let result = expand_env("timeout = \"{{ env.ARKWAY_OPTIONAL | default(\"30s\") }}\"").unwrap();
            assert_eq!(result, "timeout = \"5m\"");
        });
    }
}
