use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaModel {
    pub id: Uuid,
    pub title: String,
    pub business_idea: String,
    pub usp: String,
    pub customers: String,
    pub business_model: String,
    pub competitors: String,
    pub team: String,
    pub market_barriers: String,
    pub created: chrono::DateTime<chrono::Utc>,
    pub updated: chrono::DateTime<chrono::Utc>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdea {
    pub title: String,
    pub business_idea: String,
    pub usp: String,
    pub customers: String,
    pub business_model: String,
    pub competitors: String,
    pub team: String,
    pub market_barriers: String,
}

/// PUT payload; every field is optional and only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdea {
    pub title: Option<String>,
    pub business_idea: Option<String>,
    pub usp: Option<String>,
    pub customers: Option<String>,
    pub business_model: Option<String>,
    pub competitors: Option<String>,
    pub team: Option<String>,
    pub market_barriers: Option<String>,
}

impl IdeaModel {
    /// Merge an update into the stored row, keeping any field the client
    /// left out. `updated` is bumped by the repository on write, not here.
    pub fn apply(&mut self, update: UpdateIdea) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(business_idea) = update.business_idea {
            self.business_idea = business_idea;
        }
        if let Some(usp) = update.usp {
            self.usp = usp;
        }
        if let Some(customers) = update.customers {
            self.customers = customers;
        }
        if let Some(business_model) = update.business_model {
            self.business_model = business_model;
        }
        if let Some(competitors) = update.competitors {
            self.competitors = competitors;
        }
        if let Some(team) = update.team {
            self.team = team;
        }
        if let Some(market_barriers) = update.market_barriers {
            self.market_barriers = market_barriers;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_idea() -> IdeaModel {
        IdeaModel {
            id: Uuid::new_v4(),
            title: "Solar kiosks".into(),
            business_idea: "Off-grid charging stations".into(),
            usp: "Cheaper than diesel".into(),
            customers: "Rural commuters".into(),
            business_model: "Pay per charge".into(),
            competitors: "Diesel generators".into(),
            team: "Two founders".into(),
            market_barriers: "Upfront hardware cost".into(),
            created: chrono::Utc::now(),
            updated: chrono::Utc::now(),
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn apply_overwrites_only_provided_fields() {
        let mut idea = sample_idea();
        let before = idea.clone();

        idea.apply(UpdateIdea {
            title: Some("Solar hubs".into()),
            usp: Some("Zero fuel cost".into()),
            ..Default::default()
        });

        assert_eq!(idea.title, "Solar hubs");
        assert_eq!(idea.usp, "Zero fuel cost");
        assert_eq!(idea.business_idea, before.business_idea);
        assert_eq!(idea.customers, before.customers);
        assert_eq!(idea.business_model, before.business_model);
        assert_eq!(idea.competitors, before.competitors);
        assert_eq!(idea.team, before.team);
        assert_eq!(idea.market_barriers, before.market_barriers);
        assert_eq!(idea.user_id, before.user_id);
    }

    #[test]
    fn apply_with_empty_update_is_a_noop() {
        let mut idea = sample_idea();
        let before = idea.clone();

        idea.apply(UpdateIdea::default());

        assert_eq!(idea.title, before.title);
        assert_eq!(idea.market_barriers, before.market_barriers);
    }

    #[test]
    fn wire_form_is_camel_case() {
        let idea = sample_idea();
        let json = serde_json::to_value(&idea).unwrap();

        assert!(json.get("businessIdea").is_some());
        assert!(json.get("marketBarriers").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("business_idea").is_none());
    }
}
