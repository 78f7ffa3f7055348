use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Launch arguments come either comma separated or as a JSON array:
/// `--args -v,--fast` or `--args '["-v","--fast"]'`.
pub fn parse_launch_args(raw: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let raw = raw.trim();
    if raw.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(raw).context("launch arguments are not a valid JSON array")?;
        return values.into_iter().map(scalar_string).collect();
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect())
}

/// Launch environment comes as `KEY=VALUE,...` or a JSON object.
pub fn parse_launch_env(raw: Option<&str>) -> Result<Vec<(String, String)>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let raw = raw.trim();
    if raw.starts_with('{') {
        let map: serde_json::Map<String, Value> =
            serde_json::from_str(raw).context("launch environment is not a valid JSON object")?;
        return map
            .into_iter()
            .map(|(key, value)| Ok((key, scalar_string(value)?)))
            .collect();
    }

    let mut pairs = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            bail!("invalid KEY=VALUE pair '{part}' in launch environment");
        };
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(pairs)
}

fn scalar_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => bail!("expected a scalar launch value, got {other}"),
    }
}
