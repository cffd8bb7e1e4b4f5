//! Assembling a simulation request from command-line input

use anyhow::{Context, Result, bail};
use serde_json::Value;
use simrun_client::SimulationRequest;
use std::io::Read;

/// Marker for reading the request from stdin
pub const STDIN_SOURCE: &str = "-";

/// Parse a `key=value` parameter
///
/// The value is read as JSON when possible (`steps=10`, `bounds=[0,1]`),
/// otherwise it is taken as a plain string (`integrator=verlet`).
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid parameter '{}': expected KEY=VALUE", raw);
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("invalid parameter '{}': empty key", raw);
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parse request text, which must hold a JSON object
pub fn parse_request_text(text: &str, origin: &str) -> Result<SimulationRequest> {
    let value: Value =
        serde_json::from_str(text).with_context(|| format!("{} is not valid JSON", origin))?;
    SimulationRequest::try_from(value).with_context(|| format!("invalid request in {}", origin))
}

/// Read a request from a file path, or from stdin for `-`
pub fn read_source(source: &str) -> Result<SimulationRequest> {
    if source == STDIN_SOURCE {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read request from stdin")?;
        return parse_request_text(&text, "stdin");
    }

    let text = std::fs::read_to_string(source)
        .with_context(|| format!("failed to read request file {}", source))?;
    parse_request_text(&text, source)
}

/// Combine an optional request source with `key=value` overrides
///
/// With neither, the request is an empty object.
pub fn build_request(source: Option<&str>, params: &[String]) -> Result<SimulationRequest> {
    let mut request = match source {
        Some(source) => read_source(source)?,
        None => SimulationRequest::new(),
    };

    for raw in params {
        let (key, value) = parse_param(raw)?;
        request.insert(key, value);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_param_json_values() {
        assert_eq!(parse_param("steps=10").unwrap(), ("steps".to_string(), json!(10)));
        assert_eq!(parse_param("dt=0.25").unwrap(), ("dt".to_string(), json!(0.25)));
        assert_eq!(parse_param("periodic=true").unwrap(), ("periodic".to_string(), json!(true)));
        assert_eq!(
            parse_param("bounds=[0,1]").unwrap(),
            ("bounds".to_string(), json!([0, 1]))
        );
    }

    #[test]
    fn test_parse_param_string_fallback() {
        assert_eq!(
            parse_param("integrator=verlet").unwrap(),
            ("integrator".to_string(), json!("verlet"))
        );
        assert_eq!(parse_param("label=").unwrap(), ("label".to_string(), json!("")));
        // Only the first '=' separates key from value
        assert_eq!(parse_param("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("steps").is_err());
        assert!(parse_param("=10").is_err());
    }

    #[test]
    fn test_parse_request_text() {
        let request = parse_request_text(r#"{"particles": 2, "steps": 10}"#, "inline").unwrap();
        assert_eq!(request.get("particles"), Some(&json!(2)));

        let err = parse_request_text("[1, 2]", "inline").unwrap_err();
        assert!(err.to_string().contains("invalid request in inline"));

        let err = parse_request_text("{particles: 2}", "inline").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_build_request_without_input_is_empty() {
        let request = build_request(None, &[]).unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_build_request_params_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"particles": 2, "steps": 10}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let request = build_request(
            Some(&path),
            &["steps=50".to_string(), "integrator=rk4".to_string()],
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"particles": 2, "steps": 50, "integrator": "rk4"})
        );
    }

    #[test]
    fn test_build_request_keeps_field_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"steps": 10, "particles": 2, "dt": 0.5}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let request = build_request(
            Some(&path),
            &["particles=4".to_string(), "integrator=rk4".to_string()],
        )
        .unwrap();

        // Overrides stay in place; new fields are appended
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"steps":10,"particles":4,"dt":0.5,"integrator":"rk4"}"#
        );
    }

    #[test]
    fn test_build_request_missing_file() {
        let err = build_request(Some("/nonexistent/request.json"), &[]).unwrap_err();
        assert!(err.to_string().contains("failed to read request file"));
    }
}
