use super::admin_models::Admin;
use super::auth::CatalogHasher;
use anyhow::Result;

pub trait AdminStore: Send + Sync {
    /// Creates a new admin and returns it.
    /// Returns Err if the email is already taken or on database errors.
    fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        hasher: CatalogHasher,
    ) -> Result<Admin>;

    /// Returns Ok(None) if the admin does not exist.
    fn get_admin(&self, id: &str) -> Result<Option<Admin>>;

    /// Looks an admin up by email, ignoring case.
    /// Returns Ok(None) if no admin has this email.
    fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>>;

    fn list_admins(&self) -> Result<Vec<Admin>>;

    /// Returns Ok(false) if the admin did not exist.
    fn delete_admin(&self, id: &str) -> Result<bool>;

    fn update_password(&self, id: &str, password_hash: &str, hasher: CatalogHasher)
        -> Result<()>;

    /// Records a successful login at the current time.
    fn touch_last_login(&self, id: &str) -> Result<()>;
}
