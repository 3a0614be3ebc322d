use sqlx::{Pool, Postgres};
use tracing::instrument;
use uuid::Uuid;

use crate::models::idea::{CreateIdea, IdeaModel};

/// Listing filter; a `None` username means all users, a `None` limit means
/// no LIMIT clause (Postgres treats a NULL limit as LIMIT ALL).
#[derive(Debug, Default, Clone)]
pub struct IdeaFilter {
    pub username: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct IdeaRepository {
    pool: Pool<Postgres>,
}

impl IdeaRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Most-recently-created first, optionally scoped to an owner username.
    #[instrument(name = "Listing ideas from database", skip(self))]
    pub async fn list(&self, filter: &IdeaFilter) -> anyhow::Result<Vec<IdeaModel>> {
        let ideas = sqlx::query_as::<_, IdeaModel>(
            r#"SELECT i.id, i.title, i.business_idea, i.usp, i.customers,
                i.business_model, i.competitors, i.team, i.market_barriers,
                i.created, i.updated, i.user_id
            FROM ideas i
            JOIN users u ON u.id = i.user_id
            WHERE ($1::text IS NULL OR u.username = $1)
            ORDER BY i.created DESC
            LIMIT $2 OFFSET $3"#,
        )
        .bind(filter.username.as_deref())
        .bind(filter.limit)
        .bind(filter.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list ideas: {:?}", e);
            e
        })?;
        Ok(ideas)
    }

    /// Row count under the username filter only; limit/offset do not apply.
    #[instrument(name = "Counting ideas in database", skip(self))]
    pub async fn count(&self, username: Option<&str>) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
            FROM ideas i
            JOIN users u ON u.id = i.user_id
            WHERE ($1::text IS NULL OR u.username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count ideas: {:?}", e);
            e
        })?;
        Ok(count)
    }

    #[instrument(name = "Fetching idea by id from database", skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<IdeaModel>> {
        let idea = sqlx::query_as::<_, IdeaModel>(
            r#"SELECT id, title, business_idea, usp, customers, business_model,
                competitors, team, market_barriers, created, updated, user_id
            FROM ideas WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch idea: {:?}", e);
            e
        })?;
        Ok(idea)
    }

    #[instrument(name = "Saving new idea to database", skip(self, input))]
    pub async fn insert(&self, input: &CreateIdea, user_id: Uuid) -> anyhow::Result<IdeaModel> {
        let idea = sqlx::query_as::<_, IdeaModel>(
            r#"INSERT INTO ideas (title, business_idea, usp, customers,
                business_model, competitors, team, market_barriers, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, business_idea, usp, customers, business_model,
                competitors, team, market_barriers, created, updated, user_id"#,
        )
        .bind(&input.title)
        .bind(&input.business_idea)
        .bind(&input.usp)
        .bind(&input.customers)
        .bind(&input.business_model)
        .bind(&input.competitors)
        .bind(&input.team)
        .bind(&input.market_barriers)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert idea: {:?}", e);
            e
        })?;
        Ok(idea)
    }

    /// Writes the full merged row and bumps `updated`.
    #[instrument(name = "Updating idea in database", skip(self, idea))]
    pub async fn update(&self, idea: &IdeaModel) -> anyhow::Result<IdeaModel> {
        let idea = sqlx::query_as::<_, IdeaModel>(
            r#"UPDATE ideas
            SET title = $2, business_idea = $3, usp = $4, customers = $5,
                business_model = $6, competitors = $7, team = $8,
                market_barriers = $9, updated = now()
            WHERE id = $1
            RETURNING id, title, business_idea, usp, customers, business_model,
                competitors, team, market_barriers, created, updated, user_id"#,
        )
        .bind(idea.id)
        .bind(&idea.title)
        .bind(&idea.business_idea)
        .bind(&idea.usp)
        .bind(&idea.customers)
        .bind(&idea.business_model)
        .bind(&idea.competitors)
        .bind(&idea.team)
        .bind(&idea.market_barriers)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update idea: {:?}", e);
            e
        })?;
        Ok(idea)
    }

    #[instrument(name = "Deleting idea from database", skip(self))]
    pub async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete idea: {:?}", e);
                e
            })?;
        Ok(result.rows_affected())
    }
}
