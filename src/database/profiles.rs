use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::Profile;

pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let profile =
            sqlx::query_as::<_, Profile>("SELECT * FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM user_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn list(&self) -> Result<Vec<Profile>, DatabaseError> {
        let profiles = sqlx::query_as::<_, Profile>("SELECT * FROM user_profiles ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    pub async fn create(&self, user_id: Uuid, role: &str) -> Result<Profile, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO user_profiles (id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Fetch the user's profile, creating a default `viewer` one if missing.
    ///
    /// Every user that authenticates must end up with exactly one profile;
    /// the UNIQUE constraint on user_id plus ON CONFLICT keeps concurrent
    /// first logins from creating two.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<Profile, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, user_id, role)
            VALUES ($1, $2, 'viewer')
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))
    }

    pub async fn touch_login(&self, user_id: Uuid) -> Result<Profile, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE user_profiles SET last_login_time = now() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))
    }

    pub async fn touch_logout(&self, user_id: Uuid) -> Result<Profile, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE user_profiles SET last_logout_time = now() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))
    }

    pub async fn set_role(&self, user_id: Uuid, role: &str) -> Result<Profile, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE user_profiles SET role = $2 WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| DatabaseError::NotFound("Profile not found".to_string()))
    }
}
