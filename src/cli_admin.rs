use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use std::path::{Path, PathBuf};

use music_catalog_server::admin::{is_valid_email, CatalogHasher, MIN_PASSWORD_LENGTH};
use music_catalog_server::config::MIN_JWT_SECRET_LENGTH;
use music_catalog_server::{AdminStore, SqliteAdminStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser)]
#[command(name = "cli-admin", about = "Manages admin accounts of the music catalog server")]
struct CliArgs {
    /// Path to admin.db. When omitted it is searched in /data/db, then in
    /// the current directory and its parents.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Creates an admin account.
    AddAdmin {
        name: String,
        email: String,
        password: String,
    },

    /// Replaces the password of an admin.
    SetPassword { email: String, password: String },

    /// Compares a password against the stored hash without logging in.
    CheckPassword { email: String, password: String },

    /// Shows every admin account.
    ListAdmins,

    /// Deletes an admin account. Tokens already issued stop working.
    DeleteAdmin { email: String },

    /// Prints a random secret usable as JWT_SECRET. Doesn't need a db.
    GenSecret {
        #[clap(default_value_t = 48)]
        length: usize,
    },

    /// Shows the path of the admin db in use.
    Where,
}

fn generate_secret(length: usize) -> Result<String> {
    if length < MIN_JWT_SECRET_LENGTH {
        bail!("A secret needs at least {} characters", MIN_JWT_SECRET_LENGTH);
    }
    Ok(rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect())
}

fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "Please enter a password with {} or more characters",
            MIN_PASSWORD_LENGTH
        );
    }
    Ok(())
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn execute(command: Command, store: &SqliteAdminStore, db_path: &Path) -> Result<()> {
    match command {
        Command::AddAdmin {
            name,
            email,
            password,
        } => {
            if name.trim().is_empty() {
                bail!("Name is required");
            }
            if !is_valid_email(&email) {
                bail!("Please include a valid email");
            }
            check_new_password(&password)?;
            if store.get_admin_by_email(&email)?.is_some() {
                bail!("Admin already exists");
            }
            let hasher = CatalogHasher::Argon2;
            let admin = store.create_admin(name.trim(), &email, &hasher.hash(&password)?, hasher)?;
            println!("Created admin {} <{}>", admin.id, admin.email);
        }
        Command::SetPassword { email, password } => {
            check_new_password(&password)?;
            let admin = store
                .get_admin_by_email(&email)?
                .with_context(|| format!("No admin with email {}", email))?;
            let hasher = CatalogHasher::Argon2;
            store.update_password(&admin.id, &hasher.hash(&password)?, hasher)?;
            println!("Password updated for {}", admin.email);
        }
        Command::CheckPassword { email, password } => {
            let admin = store
                .get_admin_by_email(&email)?
                .with_context(|| format!("No admin with email {}", email))?;
            if admin.hasher.verify(&password, &admin.password_hash)? {
                println!("Password matches");
            } else {
                println!("Password does NOT match");
            }
        }
        Command::ListAdmins => {
            let admins = store.list_admins()?;
            if admins.is_empty() {
                println!("No admins");
            }
            for admin in admins {
                println!(
                    "{}  {:<30} {:<20} created {}  last login {}",
                    admin.id,
                    admin.email,
                    admin.name,
                    format_timestamp(admin.date),
                    admin
                        .last_login
                        .map(format_timestamp)
                        .unwrap_or_else(|| "never".to_string())
                );
            }
        }
        Command::DeleteAdmin { email } => {
            let admin = store
                .get_admin_by_email(&email)?
                .with_context(|| format!("No admin with email {}", email))?;
            store.delete_admin(&admin.id)?;
            println!("Deleted admin {}", admin.email);
        }
        Command::Where => println!("{}", db_path.display()),
        Command::GenSecret { length } => println!("{}", generate_secret(length)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    if let Command::GenSecret { length } = cli_args.command {
        println!("{}", generate_secret(length)?);
        return Ok(());
    }

    let db_path = match cli_args.db.or_else(SqliteAdminStore::infer_path) {
        Some(path) => path,
        None => bail!("No admin.db found, pass it with --db"),
    };
    let store = SqliteAdminStore::new(&db_path)?;
    execute(cli_args.command, &store, &db_path)
}
