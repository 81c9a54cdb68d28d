use crate::bedrock_service::Generator;
use crate::models::*;
use crate::prompt::{build_context, build_prompt};
use crate::vector_search::Retriever;
use anyhow::Result;
use std::sync::Arc;

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_QUESTION: &str = "what is the meaning of <3?";

/// Uses `ask` when non-empty, otherwise the default question.
pub fn select_question(ask: &str) -> String {
    if !ask.is_empty() {
        ask.to_string()
    } else {
        log::info!("No question provided, using default question {}", DEFAULT_QUESTION);
        DEFAULT_QUESTION.to_string()
    }
}

pub struct QueryService {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
}

impl QueryService {
    pub fn new(retriever: Arc<dyn Retriever>, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<Document>> {
        self.retriever.retrieve(question, DEFAULT_TOP_K).await
    }

    pub async fn generate(&self, question: &str, documents: &[Document]) -> Result<String> {
        if documents.is_empty() {
            log::warn!("No similar documents found, generating without context");
        }

        let context = build_context(documents);
        let prompt = build_prompt(question, &context);
        log::debug!("Prompt:\n{}", prompt);

        self.generator.generate(&prompt).await
    }

    /// Retrieve the top documents for `question`, then generate an answer from them.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        log::info!("Starting KNN similarity search on OpenSearch, then passing the context to Bedrock");

        let source_documents = self.retrieve(question).await?;
        let result = self.generate(question, &source_documents).await?;

        Ok(Answer {
            result,
            source_documents,
        })
    }
}

/// Lines reported for an answer: every source document, then the answer.
pub fn report_lines(answer: &Answer) -> Vec<String> {
    let mut lines = Vec::with_capacity(answer.source_documents.len() * 2 + 1);

    for document in &answer.source_documents {
        lines.push(format!(
            "With the following similar content from OpenSearch:\n{}\n",
            document.page_content
        ));
        lines.push(format!("Text: {}", document.metadata_text()));
    }
    lines.push(format!("\nThe answer from AI: {}", answer.result));

    lines
}

pub fn log_answer(answer: &Answer) {
    log::info!("These are the similar documents from OpenSearch based on the provided query");
    for line in report_lines(answer) {
        log::info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubRetriever {
        documents: Vec<Document>,
        calls: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>> {
            self.calls.lock().unwrap().push((query.to_string(), k));
            Ok(self.documents.clone())
        }
    }

    #[derive(Default)]
    struct StubGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("A heart.".to_string())
        }
    }

    struct FailingRetriever;

    #[async_trait]
    impl Retriever for FailingRetriever {
        async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<Document>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn document(content: &str, text: &str) -> Document {
        let metadata: Map<String, Value> = json!({ "text": text }).as_object().unwrap().clone();
        Document::new(content, metadata)
    }

    #[test]
    fn non_empty_question_is_kept() {
        assert_eq!(select_question("Why?"), "Why?");
        assert_eq!(select_question(" "), " ");
    }

    #[test]
    fn empty_question_uses_default() {
        assert_eq!(select_question(""), DEFAULT_QUESTION);
    }

    #[tokio::test]
    async fn ask_retrieves_three_then_generates_once() {
        let retriever = Arc::new(StubRetriever {
            documents: vec![
                document("doc one", "text one"),
                document("doc two", "text two"),
                document("doc three", "text three"),
            ],
            ..Default::default()
        });
        let generator = Arc::new(StubGenerator::default());
        let service = QueryService::new(retriever.clone(), generator.clone());

        let answer = service.ask("What is <3?").await.unwrap();

        assert_eq!(
            *retriever.calls.lock().unwrap(),
            vec![("What is <3?".to_string(), 3)]
        );
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        for content in ["doc one", "doc two", "doc three"] {
            assert!(prompts[0].contains(content));
        }
        let question_at = prompts[0].find("Question: What is <3?").unwrap();
        assert!(prompts[0].find("doc three").unwrap() < question_at);

        assert_eq!(answer.result, "A heart.");
        assert_eq!(answer.source_documents.len(), 3);

        let lines = report_lines(&answer);
        assert_eq!(lines.len(), 7);
        assert!(lines[1].ends_with("text one"));
        assert!(lines[3].ends_with("text two"));
        assert!(lines[5].ends_with("text three"));
        assert_eq!(lines[6], "\nThe answer from AI: A heart.");
    }

    #[tokio::test]
    async fn empty_retrieval_still_generates() {
        let retriever = Arc::new(StubRetriever::default());
        let generator = Arc::new(StubGenerator::default());
        let service = QueryService::new(retriever, generator.clone());

        let answer = service.ask("Unknown?").await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context:\n\n\nQuestion: Unknown?"));
        assert!(answer.source_documents.is_empty());
        assert_eq!(report_lines(&answer), vec!["\nThe answer from AI: A heart.".to_string()]);
    }

    #[tokio::test]
    async fn retrieval_failure_skips_generation() {
        let generator = Arc::new(StubGenerator::default());
        let service = QueryService::new(Arc::new(FailingRetriever), generator.clone());

        assert!(service.ask("Why?").await.is_err());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
