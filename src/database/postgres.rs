//! Postgres implementations of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{Address, NewUser, Pet, PetData, Role, SessionRecord, SessionUser, User, UserChanges};
use crate::database::repository::{HealthCheck, PetRepository, RepoError, SessionStore, UserRepository};
use crate::filter::filter_where::select_pets_sql;
use crate::filter::DirectFilter;

const PET_COLUMNS_SQL: &str =
    "id, name, description, species, age, gender, profile_img, address, created_at, updated_at";
const USER_COLUMNS_SQL: &str = "id, username, email, password, role, pets, created_at, updated_at";

/// Drops the first occurrence of `$2` from the user's pets; later copies stay.
const REMOVE_PET_SQL: &str = "UPDATE users SET pets = CASE WHEN $2 = ANY(pets) \
     THEN pets[:array_position(pets, $2) - 1] || pets[array_position(pets, $2) + 1:] \
     ELSE pets END, updated_at = now() WHERE id = $1";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct PetRow {
    id: Uuid,
    name: String,
    description: String,
    species: String,
    age: Option<i32>,
    gender: String,
    profile_img: String,
    address: Json<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PetRow> for Pet {
    fn from(row: PetRow) -> Self {
        Pet {
            id: row.id,
            name: row.name,
            description: row.description,
            species: row.species,
            age: row.age,
            gender: row.gender,
            profile_img: row.profile_img,
            address: row.address.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password: String,
    role: String,
    pets: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(RepoError::Validation)?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            role,
            pets: row.pets,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct SessionRow {
    token_hash: String,
    data: Json<SessionUser>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord {
            token_hash: row.token_hash,
            user: row.data.0,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl PetRepository for PgStore {
    async fn find_by_filter(&self, filter: &DirectFilter) -> Result<Vec<Pet>, RepoError> {
        let sql = select_pets_sql(filter)?;
        let mut query = sqlx::query_as::<_, PetRow>(&sql.query);
        for param in &sql.params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, RepoError> {
        let row = sqlx::query_as::<_, PetRow>(&format!("SELECT {} FROM pets WHERE id = $1", PET_COLUMNS_SQL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Pet::from))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, RepoError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {} FROM pets WHERE id = ANY($1) ORDER BY array_position($1, id)",
            PET_COLUMNS_SQL
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Pet>, RepoError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            "SELECT {} FROM pets WHERE name = $1 ORDER BY created_at, id",
            PET_COLUMNS_SQL
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn create(&self, data: PetData) -> Result<Pet, RepoError> {
        let pet = data.into_pet();
        let row = sqlx::query_as::<_, PetRow>(&format!(
            "INSERT INTO pets ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
            cols = PET_COLUMNS_SQL
        ))
        .bind(pet.id)
        .bind(&pet.name)
        .bind(&pet.description)
        .bind(&pet.species)
        .bind(pet.age)
        .bind(&pet.gender)
        .bind(&pet.profile_img)
        .bind(Json(&pet.address))
        .bind(pet.created_at)
        .bind(pet.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, data: PetData) -> Result<Pet, RepoError> {
        let row = sqlx::query_as::<_, PetRow>(&format!(
            "UPDATE pets SET name = $2, description = $3, species = $4, age = $5, gender = $6, \
             profile_img = $7, address = $8, updated_at = now() WHERE id = $1 RETURNING {}",
            PET_COLUMNS_SQL
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.species)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.profile_img)
        .bind(Json(&data.address))
        .fetch_optional(&self.pool)
        .await?;
        row.map(Pet::from)
            .ok_or_else(|| RepoError::NotFound(format!("pet {}", id)))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM pets WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let user = user.into_user();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            cols = USER_COLUMNS_SQL
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(&user.pets)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS_SQL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS_SQL
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at, id",
            USER_COLUMNS_SQL
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, RepoError> {
        // A NULL password parameter keeps the stored hash.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET username = $2, email = $3, password = COALESCE($4, password), updated_at = now() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS_SQL
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(changes.password.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| RepoError::NotFound(format!("user {}", id)))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS_SQL
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| RepoError::NotFound(format!("user {}", id)))
    }

    async fn append_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError> {
        // Single statement: concurrent appends cannot lose each other's ids.
        let result = sqlx::query(
            "UPDATE users SET pets = CASE WHEN $2 = ANY(pets) THEN pets ELSE array_append(pets, $2) END, \
             updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(pet_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn remove_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(REMOVE_PET_SQL)
            .bind(user_id)
            .bind(pet_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create(&self, session: SessionRecord) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO sessions (token_hash, user_id, data, expires_at) VALUES ($1, $2, $3, $4)")
            .bind(&session.token_hash)
            .bind(session.user.id)
            .bind(Json(&session.user))
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT token_hash, data, expires_at FROM sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(SessionRecord::from))
    }

    async fn refresh(&self, token_hash: &str, user: SessionUser, expires_at: DateTime<Utc>) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE sessions SET data = $2, expires_at = $3 WHERE token_hash = $1")
            .bind(token_hash)
            .bind(Json(&user))
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("session".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
