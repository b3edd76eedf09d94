use {
    lazy_static::lazy_static,
    regex::{Captures, Regex},
    serde_json::Value,
};

const MAX_PASSES: usize = 8;

lazy_static! {
    static ref TOKEN: Regex =
        Regex::new(r"\$\{([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\}").expect("Invalid token regex");
}

/// Replaces `${dotted.path}` tokens in every string of `root` with the scalar
/// found at that path of `root` itself. Unknown paths and non-scalar targets
/// are left verbatim.
pub fn expand_tokens(root: &Value) -> Value {
    let mut current = root.clone();
    for _ in 0..MAX_PASSES {
        let next = expand_value(&current, &current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn expand_value(value: &Value, root: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(expand_str(s, root)),
        Value::Array(items) => Value::Array(items.iter().map(|v| expand_value(v, root)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_value(v, root)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn expand_str(s: &str, root: &Value) -> String {
    TOKEN
        .replace_all(s, |caps: &Captures| {
            lookup(root, &caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn lookup(root: &Value, path: &str) -> Option<String> {
    match path.split('.').try_fold(root, |node, key| node.get(key))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
