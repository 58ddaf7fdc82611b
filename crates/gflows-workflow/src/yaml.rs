use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Parse YAML into a JSON tree.
///
/// Non-string mapping keys are rendered as strings, tags are dropped and
/// non-finite floats become `null`, since none of these have a JSON form.
pub fn yaml_to_json(content: &str) -> Result<Value, serde_yaml::Error> {
  let yaml: YamlValue = serde_yaml::from_str(content)?;
  Ok(convert(yaml))
}

/// Re-serialize a workflow as plain YAML, dropping comments and normalizing layout.
pub fn normalize_workflow(content: &str) -> Result<String, serde_yaml::Error> {
  let yaml: YamlValue = serde_yaml::from_str(content)?;
  serde_yaml::to_string(&yaml)
}

fn convert(yaml: YamlValue) -> Value {
  match yaml {
    YamlValue::Null => Value::Null,
    YamlValue::Bool(b) => Value::Bool(b),
    YamlValue::Number(n) => {
      if let Some(i) = n.as_i64() {
        Value::Number(i.into())
      } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
      } else {
        n.as_f64()
          .and_then(Number::from_f64)
          .map(Value::Number)
          .unwrap_or(Value::Null)
      }
    }
    YamlValue::String(s) => Value::String(s),
    YamlValue::Sequence(items) => Value::Array(items.into_iter().map(convert).collect()),
    YamlValue::Mapping(mapping) => {
      let mut object = Map::new();
      for (key, value) in mapping {
        object.insert(key_to_string(key), convert(value));
      }
      Value::Object(object)
    }
    YamlValue::Tagged(tagged) => convert(tagged.value),
  }
}

fn key_to_string(key: YamlValue) -> String {
  match key {
    YamlValue::String(s) => s,
    YamlValue::Null => "null".to_string(),
    YamlValue::Bool(b) => b.to_string(),
    YamlValue::Number(n) => n.to_string(),
    other => serde_yaml::to_string(&other)
      .map(|s| s.trim_end().to_string())
      .unwrap_or_default(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_yaml_to_json() {
    let json = yaml_to_json(
      r#"
"on":
  push:
    branches: [develop]
jobs:
  test:
    runs-on: ubuntu-latest
    timeout-minutes: 10
    steps:
      - run: echo Hello, World!
"#,
    )
    .unwrap();

    assert_eq!(
      json,
      json!({
        "on": { "push": { "branches": ["develop"] } },
        "jobs": {
          "test": {
            "runs-on": "ubuntu-latest",
            "timeout-minutes": 10,
            "steps": [{ "run": "echo Hello, World!" }]
          }
        }
      })
    );
  }

  #[test]
  fn test_unquoted_on_is_a_string_key() {
    let json = yaml_to_json("on: push\n").unwrap();
    assert_eq!(json, json!({ "on": "push" }));
  }

  #[test]
  fn test_non_string_keys() {
    let json = yaml_to_json("1: one\ntrue: yes\n").unwrap();
    assert_eq!(json, json!({ "1": "one", "true": "yes" }));
  }

  #[test]
  fn test_invalid_yaml() {
    assert!(yaml_to_json("jobs: [unclosed").is_err());
  }

  #[test]
  fn test_normalize_workflow_drops_comments() {
    let normalized = normalize_workflow("# comment\nname:   test\nenv: {FOO: bar}\n").unwrap();
    assert_eq!(normalized, "name: test\nenv:\n  FOO: bar\n");
  }
}
