//! Test fixtures and data factories
//!
//! Provides builders for batch bodies and users with sensible defaults.

use batch_gateway::core::models::User;
use uuid::Uuid;

/// Factory for creating test users
pub struct UserFactory;

impl UserFactory {
    /// First user of the reference JSON batch
    pub fn tony() -> User {
        User::new("tony").with_name("Tony", "Stark")
    }

    /// Second user of the reference JSON batch
    pub fn flint() -> User {
        User::new("flint").with_name("Fred", "Flintstone")
    }

    /// A user with a random name
    pub fn random() -> User {
        User::new(format!("user_{}", &Uuid::new_v4().to_string()[..8]))
    }
}

/// JSON batch body posting every user to `api/User`
pub fn json_batch_body(users: &[User]) -> String {
    let items: Vec<serde_json::Value> = users
        .iter()
        .map(|user| {
            serde_json::json!({
                "method": "POST",
                "relativeUrl": "api/User",
                "body": user,
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}

/// Builder for `multipart/mixed` batch bodies
pub struct MultipartBatchBuilder {
    boundary: String,
    body: String,
}

impl MultipartBatchBuilder {
    pub fn new() -> Self {
        Self {
            boundary: format!("batch_{}", Uuid::new_v4()),
            body: String::new(),
        }
    }

    /// Add a part holding `method target` with an optional JSON body
    pub fn request(mut self, method: &str, target: &str, json: Option<&str>) -> Self {
        self.body.push_str(&format!(
            "--{}\r\nContent-Type: application/http; msgtype=request\r\n\r\n",
            self.boundary
        ));
        self.body.push_str(&format!(
            "{} {} HTTP/1.1\r\nHost: localhost\r\n",
            method, target
        ));
        match json {
            Some(json) => self.body.push_str(&format!(
                "Content-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\n\r\n{}\r\n",
                json.len(),
                json
            )),
            None => self.body.push_str("\r\n\r\n"),
        }
        self
    }

    /// `Content-Type` header value for the batch
    pub fn content_type(&self) -> String {
        format!("multipart/mixed; boundary=\"{}\"", self.boundary)
    }

    pub fn build(mut self) -> String {
        self.body.push_str(&format!("--{}--\r\n", self.boundary));
        self.body
    }
}

impl Default for MultipartBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
