use super::auth::CatalogHasher;
use serde::{Deserialize, Serialize};

/// A stored admin account, including its password hash.
#[derive(Clone, Debug)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub hasher: CatalogHasher,
    pub date: i64,
    pub last_login: Option<i64>,
}

/// What a verified credential resolves to. Never carries the hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date: i64,
}

impl From<&Admin> for AdminIdentity {
    fn from(admin: &Admin) -> Self {
        AdminIdentity {
            id: admin.id.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            date: admin.date,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
