use std::collections::HashMap;
use std::path::Path;

/// Trim a raw value and drop it entirely when blank.
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read `KEY=VALUE` pairs from a dotenv file without touching the process
/// environment.
pub fn read_env_file(
    path: &Path,
) -> Result<HashMap<String, String>, dotenvy::Error> {
    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        vars.insert(key, value);
    }
    Ok(vars)
}
