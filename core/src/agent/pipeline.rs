use crate::agent::{ContextBuilder, SourceBundle};
use crate::audit::QueryLog;
use crate::documents;
use crate::error::AgentError;
use crate::session::Session;
use crate::traits::{ChatMessage, ChatRequest, Provider};
use crate::web::WebFetcher;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Single-turn question answering over local documents and scraped web text.
///
/// Each query runs the full pipeline end to end: document load, web fetch,
/// prompt assembly, one completion request, audit log append.
pub struct Agent {
    provider: Arc<dyn Provider>,
    context_builder: ContextBuilder,
    fetcher: WebFetcher,
    log: QueryLog,
    temperature: f64,
}

impl Agent {
    pub fn new(provider: Arc<dyn Provider>, context_builder: ContextBuilder, log: QueryLog) -> Self {
        Self {
            provider,
            context_builder,
            fetcher: WebFetcher::new(),
            log,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Answers one question, with optional extra context from a document
    /// folder and a website. The session is the caller's proof that its
    /// authentication gate passed; the core reads no ambient auth state.
    ///
    /// A directory that cannot be enumerated or a failed completion request
    /// aborts the query. A failed web fetch degrades into a placeholder in
    /// the prompt, and a failed log write never withholds the answer.
    pub async fn answer_query(
        &self,
        _session: &Session,
        question: &str,
        folder: Option<&Path>,
        url: Option<&str>,
    ) -> Result<String, AgentError> {
        let bundle = self.gather_sources(folder, url).await?;
        let system_prompt = self.context_builder.build_system_prompt(&bundle);

        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(question),
        ];
        let request = ChatRequest {
            messages: &messages,
            temperature: self.temperature,
        };

        let response = self
            .provider
            .chat(request)
            .await
            .map_err(AgentError::Completion)?;
        let answer = response.text;

        // Logged only after a successful completion; a write failure must
        // not discard the already-computed answer.
        if let Err(e) = self.log.append(question, &answer).await {
            warn!("Failed to record query in audit log: {}", e);
        }

        Ok(answer)
    }

    async fn gather_sources(
        &self,
        folder: Option<&Path>,
        url: Option<&str>,
    ) -> Result<SourceBundle, AgentError> {
        let folder_text = match folder {
            Some(dir) => documents::load_documents(dir)?,
            None => String::new(),
        };

        let web_text = match url {
            Some(url) if !url.is_empty() => match self.fetcher.fetch(url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Web fetch failed, degrading context: {}", e);
                    format!("Error fetching website: {}", e)
                }
            },
            _ => String::new(),
        };

        debug!(
            folder_chars = folder_text.len(),
            web_chars = web_text.len(),
            "Sources gathered"
        );

        Ok(SourceBundle {
            folder_text,
            web_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct MockProvider {
        answer: Option<String>,
        last_system_prompt: Mutex<Option<String>>,
    }

    impl MockProvider {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.to_string()),
                last_system_prompt: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                last_system_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
            *self.last_system_prompt.lock().unwrap() =
                request.messages.first().map(|m| m.content.clone());

            match &self.answer {
                Some(text) => Ok(ChatResponse { text: text.clone() }),
                None => Err(anyhow::anyhow!("401 invalid api key")),
            }
        }
    }

    fn agent_with(provider: Arc<MockProvider>, tmp: &TempDir) -> Agent {
        Agent::new(
            provider,
            ContextBuilder::new(),
            QueryLog::new(tmp.path().join("query_log.json")),
        )
    }

    #[tokio::test]
    async fn empty_sources_answer_verbatim_and_log_once() {
        let tmp = TempDir::new().unwrap();
        let empty_dir = tmp.path().join("empty_docs");
        std::fs::create_dir(&empty_dir).unwrap();

        let provider = Arc::new(MockProvider::answering("KYC means Know Your Customer."));
        let agent = agent_with(provider.clone(), &tmp);
        let session = Session::open();

        let answer = agent
            .answer_query(&session, "What is KYC?", Some(&empty_dir), Some(""))
            .await
            .unwrap();
        assert_eq!(answer, "KYC means Know Your Customer.");

        let prompt = provider.last_system_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Knowledge Base:"));
        assert!(prompt.ends_with("Website Content:\n"));

        let records = QueryLog::new(tmp.path().join("query_log.json"))
            .records()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "What is KYC?");
        assert_eq!(records[0].answer, "KYC means Know Your Customer.");
    }

    #[tokio::test]
    async fn fetch_failure_is_embedded_and_query_still_logs() {
        let tmp = TempDir::new().unwrap();
        let provider = Arc::new(MockProvider::answering("Answer anyway."));
        let agent = agent_with(provider.clone(), &tmp);
        let session = Session::open();

        let answer = agent
            .answer_query(
                &session,
                "Anything new?",
                None,
                Some("http://127.0.0.1:9/unreachable"),
            )
            .await
            .unwrap();
        assert_eq!(answer, "Answer anyway.");

        let prompt = provider.last_system_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Error fetching website:"));

        let records = QueryLog::new(tmp.path().join("query_log.json"))
            .records()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn log_write_failure_still_returns_the_answer() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "a file where a directory should be").unwrap();

        // The log path's parent is a plain file, so every append fails.
        let log = QueryLog::new(blocker.join("query_log.json"));
        let provider = Arc::new(MockProvider::answering("Answer survives."));
        let agent = Agent::new(provider, ContextBuilder::new(), log);
        let session = Session::open();

        let answer = agent
            .answer_query(&session, "What is KYC?", None, None)
            .await
            .unwrap();
        assert_eq!(answer, "Answer survives.");

        let records = QueryLog::new(blocker.join("query_log.json"))
            .records()
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn completion_failure_logs_nothing() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(Arc::new(MockProvider::failing()), &tmp);
        let session = Session::open();

        let result = agent.answer_query(&session, "What is KYC?", None, None).await;
        assert!(matches!(result, Err(AgentError::Completion(_))));

        let records = QueryLog::new(tmp.path().join("query_log.json"))
            .records()
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn unreadable_folder_aborts_before_completion() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("no_such_dir");

        let provider = Arc::new(MockProvider::answering("never reached"));
        let agent = agent_with(provider.clone(), &tmp);
        let session = Session::open();

        let result = agent
            .answer_query(&session, "What is KYC?", Some(&missing), None)
            .await;
        assert!(matches!(result, Err(AgentError::Load(_))));
        assert!(provider.last_system_prompt.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn document_text_appears_in_prompt() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        crate::documents::docx::tests::write_minimal_docx(
            &docs.join("policy.docx"),
            &["Onboarding requires two identity documents."],
        );

        let provider = Arc::new(MockProvider::answering("ok"));
        let agent = agent_with(provider.clone(), &tmp);
        let session = Session::open();

        agent
            .answer_query(&session, "How many documents?", Some(&docs), None)
            .await
            .unwrap();

        let prompt = provider.last_system_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Onboarding requires two identity documents."));
    }
}
