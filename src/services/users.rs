use crate::{
    entities::{user, user::UserRole, User},
    errors::ServiceError,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;
use uuid::Uuid;

/// Account to create or refresh
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub location_id: Option<Uuid>,
}

/// Hashes a password into a PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates the account or updates the existing one with the same email.
/// The flag is true when a new row was created.
///
/// An existing hash is kept when it already verifies against `password`,
/// so repeated upserts do not churn the stored hash.
pub async fn upsert_user<C: ConnectionTrait>(
    conn: &C,
    input: NewUser,
) -> Result<(user::Model, bool), ServiceError> {
    let email = normalize_email(&input.email);
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::ValidationError(format!(
            "Invalid email address '{}'",
            input.email
        )));
    }

    let now = Utc::now();
    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(conn)
        .await?;

    match existing {
        Some(current) => {
            let password_hash = if verify_password(&input.password, &current.password_hash)? {
                current.password_hash.clone()
            } else {
                hash_password(&input.password)?
            };
            debug!("Refreshing account {}", email);

            let mut active: user::ActiveModel = current.into();
            active.name = Set(input.name);
            active.password_hash = Set(password_hash);
            active.role = Set(input.role);
            active.phone = Set(input.phone);
            active.location_id = Set(input.location_id);
            active.updated_at = Set(now);
            Ok((active.update(conn).await?, false))
        }
        None => {
            debug!("Creating account {}", email);
            let created = user::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(input.name),
                email: Set(email),
                password_hash: Set(hash_password(&input.password)?),
                role: Set(input.role),
                phone: Set(input.phone),
                location_id: Set(input.location_id),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(conn)
            .await?;
            Ok((created, true))
        }
    }
}
