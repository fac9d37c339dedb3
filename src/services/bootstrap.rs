use crate::error::AppResult;
use crate::models::{normalize_email, CreateUser, Role, User, UserChanges};
use crate::services::AuthService;
use crate::state::AppState;

/// Make sure the configured admin account exists and holds the admin role.
/// Does nothing unless both ADMIN_EMAIL and ADMIN_PASSWORD are set.
pub async fn ensure_admin(state: &AppState) -> AppResult<()> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password)
    else {
        return Ok(());
    };

    let email = normalize_email(email);

    match state.users.find_by_email(&email).await? {
        Some(existing) if existing.role == Role::Admin => {
            tracing::debug!(user_id = %existing.id, "Admin account present");
        }
        Some(existing) => {
            let changes = UserChanges {
                role: Some(Role::Admin),
                ..Default::default()
            };
            state.users.update(existing.id, &changes).await?;
            tracing::info!(user_id = %existing.id, "Promoted existing account to admin");
        }
        None => {
            let password_hash = AuthService::hash_password(password, state.config.bcrypt_cost)?;
            let admin = User::new(
                CreateUser {
                    name: "Administrator".to_string(),
                    email,
                    role: Role::Admin,
                    bio: None,
                    location: None,
                    company: None,
                    position: None,
                },
                password_hash,
            );
            let admin = state.users.insert(admin).await?;
            tracing::info!(user_id = %admin.id, "Created admin account");
        }
    }

    Ok(())
}
