use crate::models::Document;

/// Joins retrieved documents into one context block, in retrieval order.
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        r#"Human: Follow exactly these 3 steps
    1. Read the context below the instructions and aggregate this data
    2. Answer the question in the end using only the context if possible
    3. If you don't find the answer in the context, only respond with "I don't know", don't try to make up an answer and don't include harmful content

Context:
{context}

Question: {question}
Assistant:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn context_precedes_question() {
        let prompt = build_prompt("What is <3?", "hearts are love");
        let context_at = prompt.find("Context:\nhearts are love").unwrap();
        let question_at = prompt.find("Question: What is <3?").unwrap();
        assert!(context_at < question_at);
        assert!(prompt.starts_with("Human:"));
        assert!(prompt.contains("\"I don't know\""));
    }

    #[test]
    fn context_joins_documents() {
        let documents = vec![
            Document::new("a", Map::new()),
            Document::new("b", Map::new()),
        ];
        assert_eq!(build_context(&documents), "a\n\nb");
        assert_eq!(build_context(&[]), "");
    }
}
