use std::collections::BTreeMap;
use std::sync::OnceLock;

use mongodb::bson::{oid::ObjectId, Document};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::serialize_object_id;

const MIN_FIRST_NAME_LEN: usize = 2;
const MIN_LAST_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub encrypted_password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserParams {
    /// Returns a field name to message map; empty when the params are valid.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        if self.first_name.chars().count() < MIN_FIRST_NAME_LEN {
            errors.insert(
                "firstName".to_string(),
                format!("firstName length should be at least {MIN_FIRST_NAME_LEN} characters"),
            );
        }
        if self.last_name.chars().count() < MIN_LAST_NAME_LEN {
            errors.insert(
                "lastName".to_string(),
                format!("lastName length should be at least {MIN_LAST_NAME_LEN} characters"),
            );
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("password length should be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if !is_email_valid(&self.email) {
            errors.insert("email".to_string(), "invalid email address".to_string());
        }

        errors
    }
}

fn is_email_valid(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UpdateUserParams {
    /// `$set` body holding only the non-empty fields.
    pub fn to_document(&self) -> Document {
        let mut update = Document::new();
        if let Some(first_name) = self.first_name.as_deref().filter(|s| !s.is_empty()) {
            update.insert("firstName", first_name);
        }
        if let Some(last_name) = self.last_name.as_deref().filter(|s| !s.is_empty()) {
            update.insert("lastName", last_name);
        }
        update
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = self.first_name.as_deref().filter(|s| !s.is_empty()) {
            user.first_name = first_name.to_string();
        }
        if let Some(last_name) = self.last_name.as_deref().filter(|s| !s.is_empty()) {
            user.last_name = last_name.to_string();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_document().is_empty()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn valid_params() -> CreateUserParams {
        CreateUserParams {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@doe.com".to_string(),
            password: "password12345".to_string(),
        }
    }

    #[test]
    fn valid_params_have_no_errors() {
        assert!(valid_params().validate().is_empty());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let params = CreateUserParams {
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            email: "john-at-doe".to_string(),
            password: "short".to_string(),
        };
        let errors = params.validate();

        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("firstName"));
        assert!(errors.contains_key("lastName"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn update_skips_empty_fields() {
        let update = UpdateUserParams {
            first_name: Some("Jane".to_string()),
            last_name: Some(String::new()),
        };
        assert_eq!(update.to_document(), doc! { "firstName": "Jane" });

        let mut user = User {
            id: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@doe.com".to_string(),
            encrypted_password: String::new(),
            is_admin: false,
        };
        update.apply(&mut user);
        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.last_name, "Doe");

        assert!(UpdateUserParams::default().is_empty());
    }

    #[test]
    fn response_hides_password() {
        let user = User {
            id: Some(ObjectId::new()),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@doe.com".to_string(),
            encrypted_password: "secret-hash".to_string(),
            is_admin: false,
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("firstName"));
    }
}
