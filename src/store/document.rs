// Config document module
// The persisted JSON object: server records plus free-form settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `servers`. Fields other than `id` are opaque payload.
pub type ServerRecord = Map<String, Value>;

/// Key holding the server collection
const SERVERS_KEY: &str = "servers";

/// The whole persisted document.
///
/// Kept as an ordered JSON object so unknown top-level keys and arbitrary
/// record fields survive a read/write cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl Default for ConfigDocument {
    /// `{"servers": [], "log_level": "info", "auto_connect": false}`
    fn default() -> Self {
        let mut map = Map::new();
        map.insert(SERVERS_KEY.to_string(), Value::Array(Vec::new()));
        map.insert("log_level".to_string(), Value::from("info"));
        map.insert("auto_connect".to_string(), Value::Bool(false));
        Self(map)
    }
}

impl ConfigDocument {
    /// Wrap an arbitrary JSON value; only objects are documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Server records; empty when the key is absent or not an array.
    pub fn servers(&self) -> &[Value] {
        match self.0.get(SERVERS_KEY) {
            Some(Value::Array(servers)) => servers,
            _ => &[],
        }
    }

    /// Run `f` over the server records, normalizing `servers` to an array
    /// in place first.
    fn with_servers<T>(&mut self, f: impl FnOnce(&mut Vec<Value>) -> T) -> T {
        let entry = self.0.entry(SERVERS_KEY).or_insert(Value::Null);
        let mut servers = match entry.take() {
            Value::Array(servers) => servers,
            _ => Vec::new(),
        };
        let result = f(&mut servers);
        *entry = Value::Array(servers);
        result
    }

    /// Index of the first record whose `id` or `uuid` equals `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.servers().iter().position(|server| matches_id(server, id))
    }

    /// First record whose `id` or `uuid` equals `id`.
    pub fn find_server(&self, id: &str) -> Option<&Value> {
        self.servers().iter().find(|server| matches_id(server, id))
    }

    /// Append a record to the collection.
    pub fn push_server(&mut self, record: ServerRecord) {
        self.with_servers(|servers| servers.push(Value::Object(record)));
    }

    /// Replace the matching record, keeping the stored `id` of the record it
    /// replaces. Returns the stored record, or `None` when nothing matched.
    pub fn replace_server(&mut self, id: &str, mut record: ServerRecord) -> Option<ServerRecord> {
        let index = self.position_of(id)?;
        match self.servers().get(index)?.get("id").cloned() {
            Some(original) => {
                record.insert("id".to_string(), original);
            }
            None => {
                record.shift_remove("id");
            }
        }
        let stored = record.clone();
        self.with_servers(|servers| {
            servers.get_mut(index).map(|slot| *slot = Value::Object(record))
        })?;
        Some(stored)
    }

    /// Remove the first matching record.
    pub fn remove_server(&mut self, id: &str) -> Option<Value> {
        let index = self.position_of(id)?;
        self.with_servers(|servers| (index < servers.len()).then(|| servers.remove(index)))
    }
}

/// The lookup predicate shared by every `/api/servers/{id}` handler.
pub fn matches_id(server: &Value, id: &str) -> bool {
    ["id", "uuid"]
        .iter()
        .any(|key| server.get(key).and_then(Value::as_str) == Some(id))
}
