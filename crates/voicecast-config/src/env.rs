use std::sync::LazyLock;

use regex::Regex;

/// `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#)
        .expect("placeholder pattern is valid")
});

/// Substitute environment placeholders in raw config text
///
/// Runs before TOML parsing so secrets can be kept out of the file. Comment
/// lines are copied verbatim, so a commented-out key never requires its
/// variable to be set.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in PLACEHOLDER.captures_iter(line) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(key.as_str(), captures.get(2).map(|m| m.as_str()))?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("unsupported placeholder `{key}`, expected `env.NAME`"));
    };

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(str::to_owned)
            .ok_or_else(|| format!("environment variable `{name}` is not set")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[podcast]\nmodel = \"tts-1\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_set_variable() {
        temp_env::with_var("VOICECAST_TEST_KEY", Some("sk-test"), || {
            let result = expand_env("api_key = \"{{ env.VOICECAST_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-test\"");
        });
    }

    #[test]
    fn substitutes_several_on_one_line() {
        let vars = [("VC_HOST", Some("127.0.0.1")), ("VC_PORT", Some("8080"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("listen_address = \"{{ env.VC_HOST }}:{{env.VC_PORT}}\"").unwrap();
            assert_eq!(result, "listen_address = \"127.0.0.1:8080\"");
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("VC_MISSING", || {
            let err = expand_env("key = \"{{ env.VC_MISSING }}\"").unwrap_err();
            assert!(err.contains("VC_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("VC_OPTIONAL", || {
            let result = expand_env("key = \"{{ env.VC_OPTIONAL | default(\"fallback\") }}\"").unwrap();
            assert_eq!(result, "key = \"fallback\"");
        });

        temp_env::with_var("VC_OPTIONAL", Some("set"), || {
            let result = expand_env("key = \"{{ env.VC_OPTIONAL | default(\"fallback\") }}\"").unwrap();
            assert_eq!(result, "key = \"set\"");
        });
    }

    #[test]
    fn only_env_scope_is_supported() {
        let err = expand_env("key = \"{{ vault.SECRET }}\"").unwrap_err();
        assert!(err.contains("expected `env.NAME`"));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_vars([("VC_REAL", Some("value")), ("VC_COMMENTED", None::<&str>)], || {
            let input = "  # old = \"{{ env.VC_COMMENTED }}\"\nkey = \"{{ env.VC_REAL }}\"\n";
            let result = expand_env(input).unwrap();
            assert_eq!(result, "  # old = \"{{ env.VC_COMMENTED }}\"\nkey = \"value\"\n");
        });
    }
}
