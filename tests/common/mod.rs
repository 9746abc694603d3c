use acme_eab_admin::AdminClientBuilder;
use acme_eab_admin::HttpAdminClient;
use serde_json::json;
use serde_json::Value;
use wiremock::MockServer;

pub const TOKEN: &str = "admin-token";

/// 32 bytes of key material, standard base64 as the CA sends it.
pub const HMAC_KEY_STD: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";
/// The same bytes as the operator sees them.
pub const HMAC_KEY_URL: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

pub async fn admin_client(server: &MockServer) -> HttpAdminClient {
  AdminClientBuilder::new(server.uri())
    .token(TOKEN.to_string())
    .build()
    .await
    .unwrap()
}

pub fn unbound_key(id: &str, reference: &str) -> Value {
  json!({
    "id": id,
    "provisioner": "acme-prov",
    "reference": reference,
    "hmacKey": HMAC_KEY_STD,
    "createdAt": "2024-03-01T12:30:45Z"
  })
}

pub fn bound_key(id: &str, account: &str) -> Value {
  json!({
    "id": id,
    "provisioner": "acme-prov",
    "reference": "",
    "hmacKey": HMAC_KEY_STD,
    "createdAt": "2024-03-01T12:30:45Z",
    "boundAt": "2024-03-02T08:15:00-07:00",
    "account": account
  })
}

pub fn admin_error(typ: &str, status: u16, message: &str) -> Value {
  json!({
    "type": typ,
    "status": status,
    "detail": "the server says no",
    "message": message
  })
}

pub fn output(out: Vec<u8>) -> String {
  String::from_utf8(out).unwrap()
}
