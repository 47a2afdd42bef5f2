//! Shape checks applied to every config source before merging.
//!
//! Unknown keys are errors, and every error carries `origin:dotted.key`.

use crate::ConfigError;
use serde_json::{Map, Value};

const SECTIONS: &[&str] = &[
    "$schema",
    "retrieval",
    "embedding",
    "generation",
    "index",
    "conversations",
    "server",
];

/// Check one source document. `origin` prefixes every error location.
pub(super) fn check_source(value: &Value, origin: &str) -> Result<(), ConfigError> {
    let root = Scope::root(origin);
    let map = root.object(value)?;
    root.only_keys(map, SECTIONS)?;

    for (section, value) in map {
        let scope = root.child(section);
        match section.as_str() {
            "$schema" => scope.string(value)?,
            "retrieval" => retrieval(&scope, value)?,
            "embedding" => embedding(&scope, value)?,
            "generation" => generation(&scope, value)?,
            "index" => {
                let map = scope.object(value)?;
                scope.only_keys(map, &["path"])?;
                scope.optional(map, "path", Scope::string)?;
            }
            "conversations" => {
                let map = scope.object(value)?;
                scope.only_keys(map, &["enabled", "path"])?;
                scope.optional(map, "enabled", Scope::boolean)?;
                scope.optional(map, "path", Scope::string)?;
            }
            "server" => server(&scope, value)?,
            _ => {}
        }
    }
    Ok(())
}

fn retrieval(scope: &Scope<'_>, value: &Value) -> Result<(), ConfigError> {
    let map = scope.object(value)?;
    scope.only_keys(map, &["top_k", "max_top_k", "on_failure"])?;
    scope.optional(map, "top_k", Scope::count)?;
    scope.optional(map, "max_top_k", Scope::count)?;
    scope.optional(map, "on_failure", |s, v| {
        s.one_of(v, &["abort", "ungrounded"])
    })
}

fn embedding(scope: &Scope<'_>, value: &Value) -> Result<(), ConfigError> {
    let map = scope.object(value)?;
    scope.only_keys(map, &["provider", "model", "dimensions"])?;
    scope.optional(map, "provider", |s, v| s.one_of(v, &["hashing", "openai"]))?;
    scope.optional(map, "model", Scope::string)?;
    scope.optional(map, "dimensions", Scope::count)
}

fn generation(scope: &Scope<'_>, value: &Value) -> Result<(), ConfigError> {
    let map = scope.object(value)?;
    scope.only_keys(
        map,
        &[
            "provider",
            "model",
            "max_tokens",
            "temperature",
            "system_prompt",
        ],
    )?;
    scope.optional(map, "provider", |s, v| {
        s.one_of(v, &["openai", "extractive"])
    })?;
    scope.optional(map, "model", Scope::string)?;
    scope.optional(map, "system_prompt", Scope::string)?;
    scope.optional(map, "max_tokens", Scope::count)?;
    scope.optional(map, "temperature", Scope::number)
}

fn server(scope: &Scope<'_>, value: &Value) -> Result<(), ConfigError> {
    let map = scope.object(value)?;
    scope.only_keys(map, &["address", "port", "allowed_origins"])?;
    scope.optional(map, "address", Scope::string)?;
    scope.optional(map, "port", |s, v| match v.as_u64() {
        Some(port) if port <= u64::from(u16::MAX) => Ok(()),
        _ => Err(s.fail("expected port number")),
    })?;
    scope.optional(map, "allowed_origins", |s, v| {
        let Value::Array(items) = v else {
            return Err(s.fail("expected array of origins"));
        };
        items
            .iter()
            .enumerate()
            .try_for_each(|(idx, item)| s.index(idx).string(item))
    })
}

/// Location inside one config source.
struct Scope<'a> {
    origin: &'a str,
    path: String,
}

impl<'a> Scope<'a> {
    fn root(origin: &'a str) -> Self {
        Self {
            origin,
            path: String::new(),
        }
    }

    fn child(&self, key: &str) -> Self {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        };
        Self {
            origin: self.origin,
            path,
        }
    }

    fn index(&self, idx: usize) -> Self {
        Self {
            origin: self.origin,
            path: format!("{}[{idx}]", self.path),
        }
    }

    fn fail(&self, reason: &str) -> ConfigError {
        let path = if self.path.is_empty() {
            "root"
        } else {
            self.path.as_str()
        };
        ConfigError::Field {
            at: format!("{}:{path}", self.origin),
            reason: reason.to_string(),
        }
    }

    fn object<'v>(&self, value: &'v Value) -> Result<&'v Map<String, Value>, ConfigError> {
        value.as_object().ok_or_else(|| self.fail("expected object"))
    }

    fn only_keys(&self, map: &Map<String, Value>, allowed: &[&str]) -> Result<(), ConfigError> {
        match map.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(self.child(key).fail("unknown key")),
            None => Ok(()),
        }
    }

    fn optional(
        &self,
        map: &Map<String, Value>,
        key: &str,
        check: impl FnOnce(&Scope<'a>, &Value) -> Result<(), ConfigError>,
    ) -> Result<(), ConfigError> {
        match map.get(key) {
            Some(value) => check(&self.child(key), value),
            None => Ok(()),
        }
    }

    fn string(&self, value: &Value) -> Result<(), ConfigError> {
        value
            .as_str()
            .map(|_| ())
            .ok_or_else(|| self.fail("expected string"))
    }

    fn boolean(&self, value: &Value) -> Result<(), ConfigError> {
        value
            .as_bool()
            .map(|_| ())
            .ok_or_else(|| self.fail("expected true or false"))
    }

    fn count(&self, value: &Value) -> Result<(), ConfigError> {
        value
            .as_u64()
            .map(|_| ())
            .ok_or_else(|| self.fail("expected non-negative integer"))
    }

    fn number(&self, value: &Value) -> Result<(), ConfigError> {
        value
            .as_f64()
            .map(|_| ())
            .ok_or_else(|| self.fail("expected number"))
    }

    fn one_of(&self, value: &Value, allowed: &[&str]) -> Result<(), ConfigError> {
        match value.as_str() {
            Some(value) if allowed.contains(&value) => Ok(()),
            _ => Err(self.fail(&format!("expected one of: {}", allowed.join(", ")))),
        }
    }
}
