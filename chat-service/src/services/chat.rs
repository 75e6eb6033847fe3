//! Chat reply + sentiment orchestrator.

use service_core::genai::invoker::TextGenerator;
use service_core::genai::response::{Extracted, ResponseShape, Sentiment};
use service_core::genai::GenAiError;

/// A usable model answer for one incoming message.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub reply: String,
    pub sentiment: Sentiment,
}

/// Ask the model for a reply and a sentiment classification in one
/// structured response.
pub async fn reply_and_sentiment(
    generator: &TextGenerator,
    message: &str,
) -> Result<ChatExchange, GenAiError> {
    let prompt = format!(
        r#"Analyze the following user message and provide a response in JSON format.
The user's message is: "{message}"

Your response must be a single JSON object with two keys:
1. "reply": A helpful, friendly, and concise response to the user's message.
2. "sentiment": Analyze the sentiment of the user's message. It must be one of three strings: "POSITIVE", "NEGATIVE", or "NEUTRAL".

JSON response:
"#
    );

    let raw = generator.generate(&prompt).await?;
    let Extracted::Reply { reply, sentiment } = ResponseShape::ReplyWithSentiment.parse(&raw)?
    else {
        return Err(GenAiError::EmptyText);
    };

    Ok(ChatExchange { reply, sentiment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::genai::keys::KeyRotator;
    use service_core::genai::mock::MockTextBackend;
    use std::sync::Arc;

    fn generator(backend: Arc<MockTextBackend>) -> TextGenerator {
        let rotator = Arc::new(KeyRotator::new(vec!["test-key".to_string()]).unwrap());
        TextGenerator::new(backend, rotator)
    }

    #[tokio::test]
    async fn parses_fenced_json_reply() {
        let backend = Arc::new(MockTextBackend::with_response(
            "```json\n{\"reply\": \"Happy to help!\", \"sentiment\": \"POSITIVE\"}\n```",
        ));

        let exchange = reply_and_sentiment(&generator(backend), "thanks a lot!")
            .await
            .unwrap();

        assert_eq!(exchange.reply, "Happy to help!");
        assert_eq!(exchange.sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn unknown_label_is_surfaced() {
        let backend = Arc::new(MockTextBackend::with_response(
            "{\"reply\": \"hm\", \"sentiment\": \"ANGRY\"}",
        ));

        let err = reply_and_sentiment(&generator(backend), "whatever")
            .await
            .unwrap_err();

        assert!(matches!(err, GenAiError::UnrecognizedLabel(_)));
    }
}
