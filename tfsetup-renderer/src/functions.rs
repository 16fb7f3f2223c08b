//! Utility filters registered on top of Tera's built-ins.
//!
//! | Filter                    | Example                                        | Result            |
//! |---------------------------|------------------------------------------------|-------------------|
//! | `repeat(count)`           | `"ab" \| repeat(count=3)`                      | `ababab`          |
//! | `nindent(width)`          | `"a\nb" \| nindent(width=2)`                   | `\n  a\n  b`      |
//! | `quote` / `squote`        | `"x" \| quote`                                 | `"x"`             |
//! | `trim_prefix(prefix)`     | `"v1.2" \| trim_prefix(prefix="v")`            | `1.2`             |
//! | `trim_suffix(suffix)`     | `"a.tf" \| trim_suffix(suffix=".tf")`          | `a`               |
//! | `snakecase`               | `"FooBar baz" \| snakecase`                    | `foo_bar_baz`     |
//! | `kebabcase`               | `"FooBar baz" \| kebabcase`                    | `foo-bar-baz`     |
//! | `camelcase`               | `"foo_bar-baz" \| camelcase`                   | `FooBarBaz`       |
//! | `compact`                 | `["a", "", null] \| compact`                   | `["a"]`           |
//! | `keys`                    | `{"b":1,"a":2} \| keys`                        | `["a", "b"]`      |
//! | `has_key(key)`            | `{"a":1} \| has_key(key="a")`                  | `true`            |
//! | `ternary(yes, no)`        | `true \| ternary(yes="on", no="off")`          | `on`              |
//! | `b64enc` / `b64dec`       | `"Potato" \| b64enc`                           | `UG90YXRv`        |
//! | `sha256sum`               | `"" \| sha256sum`                              | `e3b0c442…b855`   |
//! | `regex_replace(pattern, replacement)` | `"a-1" \| regex_replace(pattern="-", replacement="_")` | `a_1` |
//!
//! Tera already provides `upper`, `lower`, `capitalize`, `title`, `trim`,
//! `replace`, `split`, `join`, `first`, `last`, `length`, `reverse`, `sort`,
//! `unique`, `slice`, `concat`, `default`, `indent` and `json_encode`, so
//! those names are left alone. `regex_replace` uses the `regex` crate's
//! syntax, with `$1` / `${name}` for captures in the replacement.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use sha2::{Digest, Sha256};
use tera::{Error, Result, Tera, Value};

type Args = HashMap<String, Value>;

/// Register every utility filter on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_filter("repeat", repeat);
    tera.register_filter("nindent", nindent);
    tera.register_filter("quote", quote);
    tera.register_filter("squote", squote);
    tera.register_filter("trim_prefix", trim_prefix);
    tera.register_filter("trim_suffix", trim_suffix);
    tera.register_filter("snakecase", snakecase);
    tera.register_filter("kebabcase", kebabcase);
    tera.register_filter("camelcase", camelcase);
    tera.register_filter("compact", compact);
    tera.register_filter("keys", keys);
    tera.register_filter("has_key", has_key);
    tera.register_filter("ternary", ternary);
    tera.register_filter("b64enc", b64enc);
    tera.register_filter("b64dec", b64dec);
    tera.register_filter("sha256sum", sha256sum);
    tera.register_filter("regex_replace", regex_replace);
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

fn arg<'a>(args: &'a Args, filter: &str, key: &str) -> Result<&'a Value> {
    args.get(key)
        .ok_or_else(|| Error::msg(format!("filter `{filter}` expected an arg called `{key}`")))
}

fn str_arg<'a>(args: &'a Args, filter: &str, key: &str) -> Result<&'a str> {
    arg(args, filter, key)?
        .as_str()
        .ok_or_else(|| Error::msg(format!("filter `{filter}`: `{key}` must be a string")))
}

fn count_arg(args: &Args, filter: &str, key: &str) -> Result<usize> {
    let n = arg(args, filter, key)?
        .as_u64()
        .ok_or_else(|| Error::msg(format!("filter `{filter}`: `{key}` must be a non-negative integer")))?;
    usize::try_from(n).map_err(|_| Error::msg(format!("filter `{filter}`: `{key}` is too large")))
}

fn input_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::msg(format!("filter `{filter}` was called on a non-string value")))
}

/// Strings render bare; every other scalar renders as JSON text.
fn scalar_text(value: &Value, filter: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        _ => Err(Error::msg(format!(
            "filter `{filter}` was called on an array or object"
        ))),
    }
}

// ---------------------------------------------------------------------------
// String filters
// ---------------------------------------------------------------------------

fn repeat(value: &Value, args: &Args) -> Result<Value> {
    let s = scalar_text(value, "repeat")?;
    let count = count_arg(args, "repeat", "count")?;
    Ok(Value::String(s.repeat(count)))
}

fn nindent(value: &Value, args: &Args) -> Result<Value> {
    let s = scalar_text(value, "nindent")?;
    let pad = " ".repeat(count_arg(args, "nindent", "width")?);
    let body: Vec<String> = s.split('\n').map(|line| format!("{pad}{line}")).collect();
    Ok(Value::String(format!("\n{}", body.join("\n"))))
}

fn quote(value: &Value, _: &Args) -> Result<Value> {
    let s = scalar_text(value, "quote")?;
    Ok(Value::String(format!("\"{}\"", s.replace('"', "\\\""))))
}

fn squote(value: &Value, _: &Args) -> Result<Value> {
    let s = scalar_text(value, "squote")?;
    Ok(Value::String(format!("'{s}'")))
}

fn trim_prefix(value: &Value, args: &Args) -> Result<Value> {
    let s = input_str(value, "trim_prefix")?;
    let prefix = str_arg(args, "trim_prefix", "prefix")?;
    Ok(Value::String(s.strip_prefix(prefix).unwrap_or(s).to_string()))
}

fn trim_suffix(value: &Value, args: &Args) -> Result<Value> {
    let s = input_str(value, "trim_suffix")?;
    let suffix = str_arg(args, "trim_suffix", "suffix")?;
    Ok(Value::String(s.strip_suffix(suffix).unwrap_or(s).to_string()))
}

fn regex_replace(value: &Value, args: &Args) -> Result<Value> {
    let s = scalar_text(value, "regex_replace")?;
    let pattern = str_arg(args, "regex_replace", "pattern")?;
    let replacement = str_arg(args, "regex_replace", "replacement")?;
    let re = Regex::new(pattern)
        .map_err(|e| Error::msg(format!("filter `regex_replace`: bad pattern: {e}")))?;
    Ok(Value::String(re.replace_all(&s, replacement).into_owned()))
}

// ---------------------------------------------------------------------------
// Encoding and hashing
// ---------------------------------------------------------------------------

fn b64enc(value: &Value, _: &Args) -> Result<Value> {
    let s = scalar_text(value, "b64enc")?;
    Ok(Value::String(STANDARD.encode(s.as_bytes())))
}

fn b64dec(value: &Value, _: &Args) -> Result<Value> {
    let s = input_str(value, "b64dec")?;
    let bytes = STANDARD
        .decode(s.trim())
        .map_err(|e| Error::msg(format!("filter `b64dec`: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| Error::msg("filter `b64dec`: decoded bytes are not UTF-8"))?;
    Ok(Value::String(text))
}

fn sha256sum(value: &Value, _: &Args) -> Result<Value> {
    let s = scalar_text(value, "sha256sum")?;
    Ok(Value::String(hex::encode(Sha256::digest(s.as_bytes()))))
}

// ---------------------------------------------------------------------------
// Case conversion
// ---------------------------------------------------------------------------

/// Split on non-alphanumerics, lower→upper transitions, and the end of an
/// acronym (`HTTPServer` → `HTTP`, `Server`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn joined_lower(value: &Value, filter: &str, sep: &str) -> Result<Value> {
    let s = input_str(value, filter)?;
    let parts: Vec<String> = words(s).iter().map(|w| w.to_lowercase()).collect();
    Ok(Value::String(parts.join(sep)))
}

fn snakecase(value: &Value, _: &Args) -> Result<Value> {
    joined_lower(value, "snakecase", "_")
}

fn kebabcase(value: &Value, _: &Args) -> Result<Value> {
    joined_lower(value, "kebabcase", "-")
}

fn camelcase(value: &Value, _: &Args) -> Result<Value> {
    let s = input_str(value, "camelcase")?;
    let mut out = String::with_capacity(s.len());
    for word in words(s) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    Ok(Value::String(out))
}

// ---------------------------------------------------------------------------
// Collection filters
// ---------------------------------------------------------------------------

fn compact(value: &Value, _: &Args) -> Result<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::msg("filter `compact` was called on a non-array value"))?;
    let kept = items
        .iter()
        .filter(|v| !matches!(v, Value::Null) && v.as_str() != Some(""))
        .cloned()
        .collect();
    Ok(Value::Array(kept))
}

fn keys(value: &Value, _: &Args) -> Result<Value> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::msg("filter `keys` was called on a non-object value"))?;
    let mut names: Vec<&String> = map.keys().collect();
    names.sort();
    Ok(Value::Array(
        names.into_iter().map(|k| Value::String(k.clone())).collect(),
    ))
}

fn has_key(value: &Value, args: &Args) -> Result<Value> {
    let key = str_arg(args, "has_key", "key")?;
    Ok(Value::Bool(
        value.as_object().is_some_and(|map| map.contains_key(key)),
    ))
}

fn ternary(value: &Value, args: &Args) -> Result<Value> {
    let yes = arg(args, "ternary", "yes")?;
    let no = arg(args, "ternary", "no")?;
    let truthy = match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    };
    Ok(if truthy { yes.clone() } else { no.clone() })
}
