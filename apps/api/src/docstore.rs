//! Firestore REST shim — keyed document store plus ID-token verification.
//!
//! Collapses the Firestore wire format to plain JSON maps. Every failure is
//! swallowed to an absent/false result with a warning; callers treat the
//! store as best-effort and decide their own error surface.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use tracing::warn;

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
const IDENTITY_TOOLKIT_LOOKUP_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";
const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Identity attached to a verified Google/Firebase ID token.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub email: String,
    pub subject: String,
    pub name: String,
    pub picture: String,
}

pub struct FirestoreClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FirestoreClient {
    pub fn new(project_id: &str, api_key: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: format!(
                "{FIRESTORE_API_BASE}/projects/{project_id}/databases/(default)/documents"
            ),
            api_key,
        }
    }

    /// Document ids are lower-cased before the lookup: identity is
    /// case-insensitive by normalization, not by store behavior.
    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}/{}?key={}",
            self.base_url,
            collection,
            document_id.to_lowercase(),
            self.api_key
        )
    }

    /// Fetches one document as a plain JSON map. Absent on 404 and on every
    /// failure.
    pub async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Option<Map<String, Value>> {
        let url = self.document_url(collection, document_id);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Docstore get from {collection} failed: {e}");
                return None;
            }
        };

        let status = response.status();
        if status.is_success() {
            let body: Value = response.json().await.ok()?;
            Some(decode_fields(body.get("fields")))
        } else if status == StatusCode::NOT_FOUND {
            // Normal for unknown users
            None
        } else {
            warn!("Docstore get from {collection} returned {status}");
            None
        }
    }

    /// Creates or overwrites one document. True on success.
    pub async fn set_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Map<String, Value>,
    ) -> bool {
        let url = self.document_url(collection, document_id);
        let payload = json!({ "fields": encode_fields(fields) });

        match self.http.patch(&url).json(&payload).send().await {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                warn!("Docstore set in {collection} returned {}", r.status());
                false
            }
            Err(e) => {
                warn!("Docstore set in {collection} failed: {e}");
                false
            }
        }
    }

    /// Updates only the named fields of one document. True on success.
    pub async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Map<String, Value>,
    ) -> bool {
        let mut url = self.document_url(collection, document_id);
        for key in fields.keys() {
            url.push_str("&updateMask.fieldPaths=");
            url.push_str(key);
        }
        let payload = json!({ "fields": encode_fields(fields) });

        match self.http.patch(&url).json(&payload).send().await {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                warn!("Docstore update in {collection} returned {}", r.status());
                false
            }
            Err(e) => {
                warn!("Docstore update in {collection} failed: {e}");
                false
            }
        }
    }

    /// Appends a document with a store-assigned id to a collection. Returns
    /// the new document id.
    pub async fn add_document(
        &self,
        collection_path: &str,
        fields: &Map<String, Value>,
    ) -> Option<String> {
        let url = format!("{}/{}?key={}", self.base_url, collection_path, self.api_key);
        let payload = json!({ "fields": encode_fields(fields) });

        let response = match self.http.post(&url).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Docstore add to {collection_path} failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(
                "Docstore add to {collection_path} returned {}",
                response.status()
            );
            return None;
        }

        let body: Value = response.json().await.ok()?;
        let name = body.get("name")?.as_str()?;
        name.rsplit('/').next().map(str::to_string)
    }

    /// Lists up to `limit` documents of a collection, each carrying its
    /// document id under `id`. Empty on every failure.
    pub async fn get_collection(
        &self,
        collection_path: &str,
        limit: u32,
    ) -> Vec<Map<String, Value>> {
        let url = format!(
            "{}/{}?pageSize={}&key={}",
            self.base_url, collection_path, limit, self.api_key
        );

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Docstore list of {collection_path} failed: {e}");
                return Vec::new();
            }
        };
        if !response.status().is_success() {
            warn!(
                "Docstore list of {collection_path} returned {}",
                response.status()
            );
            return Vec::new();
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        };

        let documents = body
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        documents
            .iter()
            .map(|doc| {
                let mut fields = decode_fields(doc.get("fields"));
                if let Some(id) = doc
                    .get("name")
                    .and_then(Value::as_str)
                    .and_then(|n| n.rsplit('/').next())
                {
                    fields.insert("id".to_string(), json!(id));
                }
                fields
            })
            .collect()
    }

    /// Verifies a Google/Firebase ID token: Identity Toolkit lookup first,
    /// tokeninfo endpoint as fallback. Absent on any failure.
    pub async fn verify_id_token(&self, id_token: &str) -> Option<IdentityClaims> {
        if let Some(claims) = self.lookup_identity(id_token).await {
            return Some(claims);
        }
        self.tokeninfo_identity(id_token).await
    }

    async fn lookup_identity(&self, id_token: &str) -> Option<IdentityClaims> {
        let url = format!("{IDENTITY_TOOLKIT_LOOKUP_URL}?key={}", self.api_key);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "idToken": id_token }))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            warn!("Identity lookup returned {}", response.status());
            return None;
        }

        let body: Value = response.json().await.ok()?;
        let user = body.get("users")?.as_array()?.first()?;
        Some(IdentityClaims {
            email: user.get("email")?.as_str()?.to_string(),
            subject: user
                .get("localId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: user
                .get("displayName")
                .and_then(Value::as_str)
                .unwrap_or("User")
                .to_string(),
            picture: user
                .get("photoUrl")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    async fn tokeninfo_identity(&self, id_token: &str) -> Option<IdentityClaims> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }

        let body: Value = response.json().await.ok()?;
        Some(IdentityClaims {
            email: body.get("email")?.as_str()?.to_string(),
            subject: body
                .get("sub")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: body
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Google User")
                .to_string(),
            picture: body
                .get("picture")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Firestore value conversion
// ────────────────────────────────────────────────────────────────────────────

/// Decodes a Firestore `fields` object into a plain JSON map.
fn decode_fields(fields: Option<&Value>) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(Value::Object(fields)) = fields {
        for (key, value) in fields {
            out.insert(key.clone(), decode_value(value));
        }
    }
    out
}

/// Decodes one Firestore typed value into plain JSON.
fn decode_value(value: &Value) -> Value {
    if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(raw) = value.get("integerValue") {
        // Firestore sends integers as decimal strings
        let parsed = raw
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| raw.as_i64());
        if let Some(n) = parsed {
            return json!(n);
        }
    }
    if let Some(b) = value.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(map) = value.get("mapValue") {
        return Value::Object(decode_fields(map.get("fields")));
    }
    if let Some(arr) = value.get("arrayValue") {
        let values = arr
            .get("values")
            .and_then(Value::as_array)
            .map(|vs| vs.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(ts) = value.get("timestampValue").and_then(Value::as_str) {
        return Value::String(ts.to_string());
    }
    Value::Null
}

/// Encodes a plain JSON map into a Firestore `fields` object. Nulls and
/// non-finite numbers are skipped; floats are truncated to integers.
fn encode_fields(map: &Map<String, Value>) -> Value {
    let mut fields = Map::new();
    for (key, value) in map {
        if let Some(encoded) = encode_value(value) {
            fields.insert(key.clone(), encoded);
        }
    }
    Value::Object(fields)
}

fn encode_value(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(json!({ "stringValue": s })),
        Value::Bool(b) => Some(json!({ "booleanValue": b })),
        Value::Number(n) => {
            let as_int = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Some(json!({ "integerValue": as_int.to_string() }))
        }
        Value::Object(map) => Some(json!({ "mapValue": { "fields": encode_fields(map) } })),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().filter_map(encode_value).collect();
            Some(json!({ "arrayValue": { "values": values } }))
        }
        Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_typed_fields() {
        let fields = json!({
            "email": { "stringValue": "a@b.com" },
            "onboarded": { "integerValue": "1" },
            "active": { "booleanValue": true },
            "created_at": { "timestampValue": "2024-05-01T00:00:00Z" }
        });
        let decoded = decode_fields(Some(&fields));
        assert_eq!(decoded.get("email"), Some(&json!("a@b.com")));
        assert_eq!(decoded.get("onboarded"), Some(&json!(1)));
        assert_eq!(decoded.get("active"), Some(&json!(true)));
        assert_eq!(
            decoded.get("created_at"),
            Some(&json!("2024-05-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_decode_nested_map_and_array() {
        let fields = json!({
            "profile": { "mapValue": { "fields": {
                "college": { "stringValue": "MIT" }
            }}},
            "skills": { "arrayValue": { "values": [
                { "stringValue": "Python" },
                { "stringValue": "SQL" }
            ]}}
        });
        let decoded = decode_fields(Some(&fields));
        assert_eq!(decoded.get("profile"), Some(&json!({ "college": "MIT" })));
        assert_eq!(decoded.get("skills"), Some(&json!(["Python", "SQL"])));
    }

    #[test]
    fn test_decode_unknown_shape_is_null() {
        let fields = json!({ "blob": { "bytesValue": "deadbeef" } });
        let decoded = decode_fields(Some(&fields));
        assert_eq!(decoded.get("blob"), Some(&Value::Null));
    }

    #[test]
    fn test_encode_skips_nulls_and_stringifies_integers() {
        let mut map = Map::new();
        map.insert("name".to_string(), json!("User"));
        map.insert("onboarded".to_string(), json!(0));
        map.insert("missing".to_string(), Value::Null);

        let encoded = encode_fields(&map);
        assert_eq!(
            encoded.get("name"),
            Some(&json!({ "stringValue": "User" }))
        );
        assert_eq!(
            encoded.get("onboarded"),
            Some(&json!({ "integerValue": "0" }))
        );
        assert!(encoded.get("missing").is_none());
    }

    #[test]
    fn test_encode_decode_roundtrip_on_user_document() {
        let mut map = Map::new();
        map.insert("email".to_string(), json!("user@example.com"));
        map.insert("onboarded".to_string(), json!(1));
        map.insert("profile".to_string(), json!({ "year": 3 }));
        map.insert("skills".to_string(), json!(["C", "Java"]));

        let encoded = encode_fields(&map);
        let decoded = decode_fields(Some(&encoded));
        assert_eq!(Value::Object(decoded), Value::Object(map));
    }

    #[test]
    fn test_document_url_lowercases_id() {
        let client = FirestoreClient::new("demo-project", "key123".to_string());
        let url = client.document_url("users", "Alice@Example.COM");
        assert!(url.contains("/users/alice@example.com?"));
    }
}
