//! Drafting client: prompt + schema + retry around a [`GenerativeService`].

use std::sync::Arc;

use mentor_db::models::{Profile, Subject, Topic, TopicSuggestion};

use super::error::DraftError;
use super::retry::RetryPolicy;
use super::trait_def::{GenerateRequest, GenerativeService};
use crate::plan::context::{PlanningContext, TopicSets};
use crate::plan::draft::{self, PlanDraft};
use crate::plan::prompt;
use crate::syllabus;

/// Produces untrusted plan drafts and topic suggestions.
#[derive(Clone)]
pub struct DraftingClient {
    service: Arc<dyn GenerativeService>,
    retry: RetryPolicy,
}

impl DraftingClient {
    pub fn new(service: Arc<dyn GenerativeService>) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Ask the service for a plan draft for `ctx.target_date`.
    ///
    /// The draft is not trusted: callers must run it through
    /// [`crate::plan::validate::validate`].
    pub async fn draft_plan(
        &self,
        profile: &Profile,
        topics: &TopicSets<'_>,
        ctx: &PlanningContext,
    ) -> Result<PlanDraft, DraftError> {
        let request = GenerateRequest {
            prompt: prompt::build_plan_prompt(profile, ctx, topics),
            response_schema: prompt::plan_draft_schema(),
        };
        let value = self.generate(&request).await?;
        draft::parse_plan_draft(value).map_err(|reason| self.malformed(reason))
    }

    /// Ask for new topics extending `subject`.
    ///
    /// `topics` is the whole syllabus; names already present in `subject`
    /// are both listed in the prompt and filtered out of the answer, as are
    /// suggestions without a positive, finite `estimated_hours`.
    pub async fn suggest_related_topics(
        &self,
        subject: &Subject,
        topics: &[Topic],
    ) -> Result<Vec<TopicSuggestion>, DraftError> {
        let existing: Vec<&str> = topics
            .iter()
            .filter(|t| t.subject_id == subject.id)
            .map(|t| t.name.as_str())
            .collect();
        let request = GenerateRequest {
            prompt: prompt::build_suggestion_prompt(subject, &existing),
            response_schema: prompt::suggestion_schema(),
        };
        let value = self.generate(&request).await?;
        let drafts = draft::parse_suggestions(value).map_err(|reason| self.malformed(reason))?;

        let suggestions = drafts
            .into_iter()
            .filter(|s| {
                let valid = s.estimated_hours.is_finite() && s.estimated_hours > 0.0;
                if !valid {
                    tracing::debug!(
                        name = %s.name,
                        estimated_hours = s.estimated_hours,
                        "dropping suggestion: estimated hours must be positive"
                    );
                }
                valid
            })
            .map(|s| TopicSuggestion {
                name: s.name,
                difficulty: s.difficulty,
                estimated_hours: s.estimated_hours,
                subject_id: subject.id.clone(),
                suggested: true,
            })
            .collect();
        Ok(syllabus::filter_new_suggestions(
            suggestions,
            topics,
            &subject.id,
        ))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<serde_json::Value, DraftError> {
        self.retry
            .run(self.service.name(), || self.service.generate(request))
            .await
    }

    fn malformed(&self, reason: String) -> DraftError {
        DraftError::Malformed {
            service: self.service.name().to_string(),
            reason,
        }
    }
}

impl std::fmt::Debug for DraftingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftingClient")
            .field("service", &self.service.name())
            .field("retry", &self.retry)
            .finish()
    }
}
