//! Multi-step survey state machine
//!
//! Questions are asked one at a time in [`QuestionKey::ALL`] order. The flow
//! moves only through `advance`/`retreat`, and `submit` hands the completed
//! record to a [`SurveyStore`] at most once.

use crate::{
    error::{AppError, AppResult},
    models::{QuestionKey, SurveyResponse},
    services::providers::SurveyStore,
};

/// Number of questions in the survey
pub const QUESTION_COUNT: usize = QuestionKey::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Showing the question at this index
    Answering(usize),
    Submitted,
}

#[derive(Debug, Clone)]
pub struct SurveyFlow {
    state: FlowState,
    responses: SurveyResponse,
}

impl Default for SurveyFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Answering(0),
            responses: SurveyResponse::new(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == FlowState::Submitted
    }

    /// Question currently shown, `None` once submitted
    pub fn current(&self) -> Option<QuestionKey> {
        match self.state {
            FlowState::Answering(index) => Some(QuestionKey::ALL[index]),
            FlowState::Submitted => None,
        }
    }

    pub fn responses(&self) -> &SurveyResponse {
        &self.responses
    }

    /// Records or overwrites the answer to `question`. Does not move.
    pub fn answer(&mut self, question: QuestionKey, value: &str) -> AppResult<()> {
        if self.is_submitted() {
            return Err(AppError::InvalidInput(
                "Survey has already been submitted".to_string(),
            ));
        }
        if !question.accepts(value) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not an option for {}",
                value, question
            )));
        }
        self.responses.insert(question, value);
        Ok(())
    }

    /// Answers the question currently shown
    pub fn answer_current(&mut self, value: &str) -> AppResult<()> {
        match self.current() {
            Some(question) => self.answer(question, value),
            None => Err(AppError::InvalidInput(
                "Survey has already been submitted".to_string(),
            )),
        }
    }

    /// Moves to the next question if the current one is answered.
    ///
    /// Returns whether the flow moved; the last question is a no-op.
    pub fn advance(&mut self) -> bool {
        match self.state {
            FlowState::Answering(index)
                if index + 1 < QUESTION_COUNT
                    && self.responses.get(QuestionKey::ALL[index]).is_some() =>
            {
                self.state = FlowState::Answering(index + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves to the previous question; the first question is a no-op.
    pub fn retreat(&mut self) -> bool {
        match self.state {
            FlowState::Answering(index) if index > 0 => {
                self.state = FlowState::Answering(index - 1);
                true
            }
            _ => false,
        }
    }

    /// `(i + 1) / N` while answering, `1.0` once submitted
    pub fn progress(&self) -> f64 {
        match self.state {
            FlowState::Answering(index) => (index + 1) as f64 / QUESTION_COUNT as f64,
            FlowState::Submitted => 1.0,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress() * 100.0
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitted() && self.responses.is_complete()
    }

    /// Hands the completed record to `store`.
    ///
    /// On failure the flow stays where it was so the user can retry.
    pub async fn submit(&mut self, store: &dyn SurveyStore) -> AppResult<()> {
        if self.is_submitted() {
            return Err(AppError::InvalidInput(
                "Survey has already been submitted".to_string(),
            ));
        }
        if !self.responses.is_complete() {
            let missing: Vec<&str> = self.responses.missing().iter().map(|k| k.as_str()).collect();
            return Err(AppError::InvalidInput(format!(
                "Unanswered questions: {}",
                missing.join(", ")
            )));
        }

        store.submit(&self.responses).await.map_err(|e| {
            tracing::warn!(store = store.name(), error = %e, "Survey submission failed");
            e
        })?;

        self.state = FlowState::Submitted;
        tracing::info!(store = store.name(), "Survey submitted");
        Ok(())
    }
}
