//! Password hashing and admin credentials.

use anyhow::{anyhow, bail, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

mod catalog_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    /// Returns the PHC string, salt included.
    pub fn hash(plain: &[u8]) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?;
        Ok(hash.to_string())
    }

    pub fn verify(plain: &[u8], phc: &str) -> Result<bool> {
        let password_hash = PasswordHash::new(phc).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default().verify_password(plain, &password_hash).is_ok())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogHasher {
    Argon2,
}

impl FromStr for CatalogHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(CatalogHasher::Argon2),
            _ => bail!("Unknown password hasher '{}'", s),
        }
    }
}

impl CatalogHasher {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogHasher::Argon2 => "argon2",
        }
    }

    pub fn hash(&self, plain: &str) -> Result<String> {
        match self {
            CatalogHasher::Argon2 => catalog_argon2::hash(plain.as_bytes()),
        }
    }

    pub fn verify(&self, plain: &str, target_hash: &str) -> Result<bool> {
        match self {
            CatalogHasher::Argon2 => catalog_argon2::verify(plain.as_bytes(), target_hash),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaim {
    pub id: String,
}

/// JWT payload: `{ "admin": { "id": ... }, "iat": ..., "exp": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: AdminClaim,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks HS256 admin tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_sec: i64,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_sec: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        TokenCodec {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_sec: ttl_sec as i64,
        }
    }

    pub fn ttl_sec(&self) -> i64 {
        self.ttl_sec
    }

    pub fn issue(&self, admin_id: &str) -> Result<String> {
        self.issue_at(admin_id, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, admin_id: &str, issued_at: i64) -> Result<String> {
        let claims = AdminClaims {
            admin: AdminClaim {
                id: admin_id.to_string(),
            },
            iat: issued_at,
            exp: issued_at + self.ttl_sec,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| anyhow!("Failed to sign admin token: {}", err))
    }

    /// Fails for bad signatures, malformed tokens and expired tokens alike.
    pub fn decode(&self, token: &str) -> Result<AdminClaims> {
        let data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| anyhow!("Invalid admin token: {}", err))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn argon2_hash() {
        let hash = CatalogHasher::Argon2.hash("123mypw").unwrap();
        assert!(hash.starts_with("$argon2"));

        // fresh salt every time
        let other = CatalogHasher::Argon2.hash("123mypw").unwrap();
        assert_ne!(hash, other);

        assert!(CatalogHasher::Argon2.verify("123mypw", &hash).unwrap());
        assert!(!CatalogHasher::Argon2.verify("not the pw", &hash).unwrap());
    }

    #[test]
    fn hasher_round_trips_through_name() {
        let hasher: CatalogHasher = CatalogHasher::Argon2.as_str().parse().unwrap();
        assert_eq!(hasher, CatalogHasher::Argon2);
        assert!("bcrypt".parse::<CatalogHasher>().is_err());
    }

    #[test]
    fn issued_token_decodes_to_admin_id() {
        let codec = TokenCodec::new(SECRET, 3600);
        let token = codec.issue("admin-1").unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.admin.id, "admin-1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new(SECRET, 60);
        let token = codec
            .issue_at("admin-1", chrono::Utc::now().timestamp() - 3600)
            .unwrap();
        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenCodec::new(b"another-secret-another-secret!!", 3600)
            .issue("admin-1")
            .unwrap();
        assert!(TokenCodec::new(SECRET, 3600).decode(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let codec = TokenCodec::new(SECRET, 3600);
        assert!(codec.decode("not.a.token").is_err());
        assert!(codec.decode("").is_err());
    }
}
