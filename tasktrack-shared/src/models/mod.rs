/// Database models for TaskTrack
///
/// This module contains the database models and their store operations.
///
/// # Models
///
/// - `user`: User accounts, the fixed two-value role enum, and cascade delete
/// - `task`: Tasks owned by a user
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::user::{CreateUser, Role, User};
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "John Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// assert_eq!(user.role, Role::User);
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
