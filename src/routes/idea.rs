use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::IdeaError,
    models::idea::{CreateIdea, UpdateIdea},
    routes::auth::Claims,
    startup::AppState,
    store::idea::IdeaFilter,
};

#[derive(Debug, serde::Deserialize)]
pub struct ListParams {
    pub user: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    /// Postgres rejects a negative LIMIT/OFFSET, so catch it here as a 400
    /// instead of letting it surface as a 500 from the repository.
    fn into_filter(self) -> Result<IdeaFilter, IdeaError> {
        if self.limit.is_some_and(|l| l < 0) || self.offset.is_some_and(|o| o < 0) {
            return Err(IdeaError::InvalidPagination);
        }

        Ok(IdeaFilter {
            username: self.user,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Request envelope; `{ "idea": { ... } }` on create and update.
#[derive(Debug, serde::Deserialize)]
pub struct IdeaBody<T> {
    idea: Option<T>,
}

impl<T> IdeaBody<T> {
    fn into_idea(self) -> Result<T, IdeaError> {
        self.idea.ok_or(IdeaError::MissingPayload)
    }
}

#[instrument(name = "HTTP: List ideas", skip(state, params))]
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, IdeaError> {
    let filter = params.into_filter()?;

    let (ideas, count) = state.idea_service.list(filter).await?;

    Ok(Json(json!({ "ideas": ideas, "ideasCount": count })))
}

#[instrument(name = "HTTP: Get idea", skip(state))]
pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, IdeaError> {
    let idea = state.idea_service.find(id).await?;

    Ok(Json(json!({ "idea": idea })))
}

#[instrument(name = "HTTP: Create idea", skip(state, claims, body), fields(user_id = %claims.sub))]
pub async fn create_idea(
    State(state): State<AppState>,
    claims: Claims,
    Json(body): Json<IdeaBody<CreateIdea>>,
) -> Result<impl IntoResponse, IdeaError> {
    let user_id = claims.user_id()?;
    let input = body.into_idea()?;

    let idea = state.idea_service.create(input, user_id).await?;

    tracing::info!(idea_id = %idea.id, "Idea created");
    Ok((StatusCode::CREATED, Json(json!({ "idea": idea }))))
}

#[instrument(name = "HTTP: Update idea", skip(state, claims, body), fields(user_id = %claims.sub))]
pub async fn update_idea(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(body): Json<IdeaBody<UpdateIdea>>,
) -> Result<impl IntoResponse, IdeaError> {
    let user_id = claims.user_id()?;
    let update = body.into_idea()?;

    let idea = state.idea_service.update(id, update, user_id).await?;

    Ok(Json(json!({ "idea": idea })))
}

#[instrument(name = "HTTP: Delete idea", skip(state, claims), fields(user_id = %claims.sub))]
pub async fn delete_idea(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, IdeaError> {
    let user_id = claims.user_id()?;

    let deleted = state.idea_service.delete(id, user_id).await?;

    tracing::info!(idea_id = %id, "Idea deleted");
    Ok(Json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_idea_envelope_is_a_bad_request() {
        let body: IdeaBody<UpdateIdea> = serde_json::from_str("{}").unwrap();

        assert!(matches!(
            body.into_idea(),
            Err(IdeaError::MissingPayload)
        ));
    }

    #[test]
    fn update_envelope_accepts_partial_fields() {
        let body: IdeaBody<UpdateIdea> =
            serde_json::from_str(r#"{"idea": {"title": "New title"}}"#).unwrap();

        let update = body.into_idea().unwrap();
        assert_eq!(update.title.as_deref(), Some("New title"));
        assert!(update.business_idea.is_none());
    }

    #[test]
    fn negative_limit_or_offset_is_rejected() {
        let params = ListParams {
            user: None,
            limit: Some(-1),
            offset: None,
        };
        assert!(matches!(
            params.into_filter(),
            Err(IdeaError::InvalidPagination)
        ));

        let params = ListParams {
            user: None,
            limit: None,
            offset: Some(-5),
        };
        assert!(matches!(
            params.into_filter(),
            Err(IdeaError::InvalidPagination)
        ));
    }

    #[test]
    fn valid_pagination_passes_through_to_the_filter() {
        let params = ListParams {
            user: Some("ada".into()),
            limit: Some(10),
            offset: Some(0),
        };

        let filter = params.into_filter().unwrap();
        assert_eq!(filter.username.as_deref(), Some("ada"));
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, Some(0));
    }

    #[test]
    fn create_envelope_parses_camel_case_fields() {
        let body: IdeaBody<CreateIdea> = serde_json::from_str(
            r#"{"idea": {
                "title": "t", "businessIdea": "b", "usp": "u",
                "customers": "c", "businessModel": "m", "competitors": "x",
                "team": "te", "marketBarriers": "mb"
            }}"#,
        )
        .unwrap();

        let input = body.into_idea().unwrap();
        assert_eq!(input.business_idea, "b");
        assert_eq!(input.market_barriers, "mb");
    }
}
