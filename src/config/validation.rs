use std::env;

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as-is.
pub fn expand_env_var_in_string(value: &str) -> String {
    let mut result = value.to_string();
    let re = match regex::Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return result,
    };

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        if let Ok(replacement) = env::var(var_name) {
            result = result.replace(&cap[0], &replacement);
        }
    }

    result
}
