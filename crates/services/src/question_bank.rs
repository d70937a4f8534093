use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use quiz_core::model::{Question, QuestionRecord};

use crate::config::QuizConfig;
use crate::error::LoadError;

/// Source of raw question records.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the full, ordered question set.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the records cannot be retrieved or decoded.
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, LoadError>;
}

/// Question bank served over HTTP (`GET {base}/questions`).
#[derive(Clone, Debug)]
pub struct HttpQuestionBank {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpQuestionBank {
    #[must_use]
    pub fn new(config: &QuizConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: &QuizConfig) -> Self {
        Self {
            client,
            url: config.questions_url(),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionBank {
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        debug!("fetching questions from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Turns raw records into a validated question set.
#[derive(Clone)]
pub struct QuestionBankLoader {
    source: Arc<dyn QuestionSource>,
}

impl QuestionBankLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    /// Fetch and validate the question set.
    ///
    /// Safe to call again after a failure.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Empty` for an empty bank, `LoadError::InvalidQuestion`
    /// for a malformed record, and propagates fetch failures.
    pub async fn load(&self) -> Result<Vec<Question>, LoadError> {
        let records = self.source.fetch_questions().await?;
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let questions = records
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!("loaded {} questions", questions.len());
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionError, QuestionId};

    struct StaticSource(Vec<QuestionRecord>);

    #[async_trait]
    impl QuestionSource for StaticSource {
        async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, LoadError> {
            Ok(self.0.clone())
        }
    }

    fn record(id: u64, correct: &str) -> QuestionRecord {
        QuestionRecord {
            id: QuestionId::from(id),
            question: format!("Q{id}"),
            options: vec!["A".into(), "B".into()],
            correct_answer: correct.into(),
        }
    }

    #[tokio::test]
    async fn load_keeps_bank_order() {
        let loader = QuestionBankLoader::new(Arc::new(StaticSource(vec![
            record(3, "A"),
            record(1, "B"),
        ])));

        let questions = loader.load().await.unwrap();

        let ids: Vec<_> = questions.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
    }

    #[tokio::test]
    async fn empty_bank_is_a_load_error() {
        let loader = QuestionBankLoader::new(Arc::new(StaticSource(Vec::new())));
        assert!(matches!(loader.load().await, Err(LoadError::Empty)));
    }

    #[tokio::test]
    async fn malformed_record_is_a_load_error() {
        let loader = QuestionBankLoader::new(Arc::new(StaticSource(vec![
            record(1, "A"),
            record(2, "Z"),
        ])));

        let err = loader.load().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidQuestion(QuestionError::CorrectAnswerNotAnOption { .. })
        ));
    }
}
