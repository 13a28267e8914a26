use crate::model::{
    Author, AuthorName, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError,
    DeleteAuthorRequest, FindAllAuthorsError, FindAuthorError, FindAuthorRequest,
    UpdateAuthorError, UpdateAuthorRequest,
};
use crate::store::AuthorStore;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(path)
            .with_context(|| format!("Invalid database path {path}"))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePool::connect_with(opts)
            .await
            .with_context(|| format!("Failed to open database at {path}"))?;

        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self { pool })
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: &str = row.try_get("id")?;
        let name = row.try_get("name")?;
        let picture_url: Option<String> = row.try_get("pic_url")?;

        let id = Uuid::parse_str(id).map_err(|err| sqlx::Error::ColumnDecode {
            index: "id".into(),
            source: Box::new(err),
        })?;
        let name = AuthorName::new_unchecked(name);
        Ok(Self::new(id, name, picture_url))
    }
}

#[async_trait]
impl AuthorStore for Sqlite {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError> {
        let id = req.id().unwrap_or_else(Uuid::new_v4);
        let author = sqlx::query_as(
            "INSERT INTO author (id, name, pic_url) VALUES (?, ?, ?) RETURNING id, name, pic_url",
        )
        .bind(id.to_string())
        .bind(req.name().as_str())
        .bind(req.picture_url())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CreateAuthorError::Duplicate { id }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create author with name "{}""#,
                    req.name()
                ));
                CreateAuthorError::Unknown(err)
            }
        })?;

        Ok(author)
    }

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
        let author = sqlx::query_as("SELECT id, name, pic_url FROM author WHERE id = ?")
            .bind(req.id().to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindAuthorError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve author with id "{}""#,
                        req.id()
                    ));
                    FindAuthorError::Unknown(err)
                }
            })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
        let authors = sqlx::query_as("SELECT id, name, pic_url FROM author")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to retrieve all authors");
                FindAllAuthorsError(err)
            })?;

        Ok(authors)
    }

    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<(), UpdateAuthorError> {
        let result = sqlx::query("UPDATE author SET name = ?, pic_url = ? WHERE id = ?")
            .bind(req.name().as_str())
            .bind(req.picture_url())
            .bind(req.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to update author with id "{}""#, req.id()));
                UpdateAuthorError::Unknown(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(UpdateAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(req.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to delete author with id "{}""#, req.id()));
                DeleteAuthorError::Unknown(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }

    false
}
