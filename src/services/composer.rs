use crate::services::signature::CommandSignature;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

type Document = Map<String, Value>;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("{} is not readable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} does not contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("unexpected shape in {}: {detail}", .path.display())]
    Malformed { path: PathBuf, detail: String },
    #[error("{} is not writable", .path.display())]
    NotWritable { path: PathBuf },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ScriptError {
    pub fn code(&self) -> &'static str {
        match self {
            ScriptError::Unreadable { .. }
            | ScriptError::InvalidJson { .. }
            | ScriptError::NotAnObject { .. }
            | ScriptError::Malformed { .. } => "CONFIG_PARSE",
            ScriptError::NotWritable { .. }
            | ScriptError::Write { .. }
            | ScriptError::Encode { .. } => "CONFIG_WRITE",
        }
    }
}

/// A hook value under `scripts.<hook>`: composer accepts a bare command or a list.
enum HookEntry<'a> {
    Single(&'a str),
    List(&'a [Value]),
    Other,
}

impl<'a> HookEntry<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) => HookEntry::Single(s),
            Value::Array(items) => HookEntry::List(items),
            _ => HookEntry::Other,
        }
    }
}

enum Pruned {
    Unchanged,
    RemoveKey,
    Replace(Vec<Value>),
}

/// Reads and rewrites one hook list of a `composer.json` file.
pub struct ComposerScripts<'a> {
    path: PathBuf,
    hook: String,
    signature: &'a CommandSignature,
}

impl<'a> ComposerScripts<'a> {
    pub fn new(
        path: impl Into<PathBuf>,
        hook: impl Into<String>,
        signature: &'a CommandSignature,
    ) -> Self {
        Self {
            path: path.into(),
            hook: hook.into(),
            signature,
        }
    }

    /// Removes every entry matching the signature from `scripts.<hook>`.
    ///
    /// Returns `Ok(false)` without touching the file when nothing matched. An
    /// emptied hook is dropped, and so is a `scripts` section emptied by this call.
    pub fn remove_injected_script(&self) -> Result<bool, ScriptError> {
        let mut doc = self.read_document()?;
        if !prune_hook(&mut doc, &self.hook, self.signature) {
            tracing::debug!(
                path = %self.path.display(),
                hook = %self.hook,
                "no injected command found"
            );
            return Ok(false);
        }
        self.write_document(&doc)?;
        tracing::info!(path = %self.path.display(), hook = %self.hook, "removed injected command");
        Ok(true)
    }

    /// Adds `command` to `scripts.<hook>` unless an entry already matches the signature.
    pub fn ensure_injected_script(&self, command: &str) -> Result<bool, ScriptError> {
        let mut doc = self.read_document()?;
        let scripts = doc
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(scripts) = scripts else {
            return Err(self.malformed("`scripts` is not an object"));
        };

        let next = match scripts.get(&self.hook).map(HookEntry::from_value) {
            None => Value::Array(vec![Value::String(command.to_string())]),
            Some(HookEntry::Single(existing)) if self.signature.matches(existing) => {
                return Ok(false)
            }
            Some(HookEntry::Single(existing)) => Value::Array(vec![
                Value::String(existing.to_string()),
                Value::String(command.to_string()),
            ]),
            Some(HookEntry::List(items)) => {
                if items
                    .iter()
                    .any(|v| v.as_str().is_some_and(|s| self.signature.matches(s)))
                {
                    return Ok(false);
                }
                let mut items = items.to_vec();
                items.push(Value::String(command.to_string()));
                Value::Array(items)
            }
            Some(HookEntry::Other) => {
                return Err(self.malformed(&format!(
                    "`scripts.{}` is neither a string nor a list",
                    self.hook
                )))
            }
        };
        scripts.insert(self.hook.clone(), next);

        self.write_document(&doc)?;
        tracing::info!(path = %self.path.display(), hook = %self.hook, "added injected command");
        Ok(true)
    }

    fn malformed(&self, detail: &str) -> ScriptError {
        ScriptError::Malformed {
            path: self.path.clone(),
            detail: detail.to_string(),
        }
    }

    fn read_document(&self) -> Result<Document, ScriptError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ScriptError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| ScriptError::InvalidJson {
            path: self.path.clone(),
            source,
        })?;
        match value {
            Value::Object(doc) => Ok(doc),
            _ => Err(ScriptError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), ScriptError> {
        let write_err = |source| ScriptError::Write {
            path: self.path.clone(),
            source,
        };
        let permissions = std::fs::metadata(&self.path)
            .map_err(write_err)?
            .permissions();
        if permissions.readonly() {
            return Err(ScriptError::NotWritable {
                path: self.path.clone(),
            });
        }

        let rendered = render_document(doc).map_err(|source| ScriptError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(rendered.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        std::fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

fn prune_hook(doc: &mut Document, hook: &str, signature: &CommandSignature) -> bool {
    let Some(Value::Object(scripts)) = doc.get_mut("scripts") else {
        return false;
    };
    let Some(entry) = scripts.get(hook) else {
        return false;
    };

    let pruned = match HookEntry::from_value(entry) {
        HookEntry::Single(cmd) if signature.matches(cmd) => Pruned::RemoveKey,
        HookEntry::Single(_) | HookEntry::Other => Pruned::Unchanged,
        HookEntry::List(items) => {
            let survivors: Vec<Value> = items
                .iter()
                .filter(|v| !v.as_str().is_some_and(|s| signature.matches(s)))
                .cloned()
                .collect();
            if survivors.len() == items.len() {
                Pruned::Unchanged
            } else if survivors.is_empty() {
                Pruned::RemoveKey
            } else {
                Pruned::Replace(survivors)
            }
        }
    };

    match pruned {
        Pruned::Unchanged => return false,
        Pruned::RemoveKey => {
            scripts.shift_remove(hook);
        }
        Pruned::Replace(survivors) => {
            scripts.insert(hook.to_string(), Value::Array(survivors));
        }
    }

    if scripts.is_empty() {
        doc.shift_remove("scripts");
    }
    true
}

/// Four-space pretty JSON with a single trailing newline, matching composer's own layout.
pub fn render_document(doc: &Document) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    let mut out = String::from_utf8_lossy(&buf).into_owned();
    out.push('\n');
    Ok(out)
}
