use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::IdeaError,
    models::idea::{CreateIdea, IdeaModel, UpdateIdea},
    store::idea::{IdeaFilter, IdeaRepository},
};

#[derive(Clone, Debug)]
pub struct IdeaService {
    repo: IdeaRepository,
}

impl IdeaService {
    pub fn new(repo: IdeaRepository) -> Self {
        Self { repo }
    }

    /// Returns the page of ideas plus the total count under the same
    /// user filter, so clients can paginate.
    #[instrument(name = "Service: List ideas", skip(self))]
    pub async fn list(&self, filter: IdeaFilter) -> Result<(Vec<IdeaModel>, i64), IdeaError> {
        let count = self
            .repo
            .count(filter.username.as_deref())
            .await
            .map_err(|e| {
                tracing::error!("Failed to count ideas: {:?}", e);
                IdeaError::Internal
            })?;

        let ideas = self.repo.list(&filter).await.map_err(|e| {
            tracing::error!("Failed to list ideas: {:?}", e);
            IdeaError::Internal
        })?;

        Ok((ideas, count))
    }

    #[instrument(name = "Service: Find idea", skip(self))]
    pub async fn find(&self, id: Uuid) -> Result<IdeaModel, IdeaError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch idea: {:?}", e);
                IdeaError::Internal
            })?
            .ok_or(IdeaError::NotFound)
    }

    #[instrument(name = "Service: Create idea", skip(self, input))]
    pub async fn create(&self, input: CreateIdea, user_id: Uuid) -> Result<IdeaModel, IdeaError> {
        self.repo.insert(&input, user_id).await.map_err(|e| {
            tracing::error!("Failed to create idea: {:?}", e);
            IdeaError::Internal
        })
    }

    /// Merge-update: only fields present in `update` overwrite the row.
    #[instrument(name = "Service: Update idea", skip(self, update))]
    pub async fn update(
        &self,
        id: Uuid,
        update: UpdateIdea,
        user_id: Uuid,
    ) -> Result<IdeaModel, IdeaError> {
        let mut idea = self.find(id).await?;
        if idea.user_id != user_id {
            tracing::warn!("Update rejected: idea owned by another user");
            return Err(IdeaError::NotOwner);
        }

        idea.apply(update);
        self.repo.update(&idea).await.map_err(|e| {
            tracing::error!("Failed to update idea: {:?}", e);
            IdeaError::Internal
        })
    }

    #[instrument(name = "Service: Delete idea", skip(self))]
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64, IdeaError> {
        let idea = self.find(id).await?;
        if idea.user_id != user_id {
            tracing::warn!("Delete rejected: idea owned by another user");
            return Err(IdeaError::NotOwner);
        }

        self.repo.delete(id).await.map_err(|e| {
            tracing::error!("Failed to delete idea: {:?}", e);
            IdeaError::Internal
        })
    }
}
