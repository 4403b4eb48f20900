use analysis_core::{Article, RelevanceTier, SentimentReading, Signal};
use serde::{Deserialize, Serialize};

use crate::error::{MLError, MLResult};
use crate::LlmConfig;

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Builds the per-article instruction sent to the model.
pub fn build_prompt(article: &Article) -> String {
    let text = format!(
        "{}. {}",
        article.title,
        article.description.as_deref().unwrap_or("")
    );
    format!(
        "You are a financial analyst. Analyze this news for stock impact.\n\n\
         News: {}\n\n\
         Respond with exactly this format:\n\
         SENTIMENT: [number from -1.0 to 1.0]\n\
         CONFIDENCE: [number from 0.0 to 1.0]\n\
         SIGNAL: [BUY/SELL/HOLD]\n\
         RELEVANCE: [HIGH/MEDIUM/LOW]\n\
         REASON: [one sentence explanation]",
        text.trim()
    )
}

/// Leading numeric token of `value`, e.g. "0.75 (moderately bullish)" -> 0.75.
///
/// Accepts an optional sign, then digits with at most one `.` that is followed by a
/// digit, so "0.8." reads as 0.8 and "0.5-0.7" as 0.5.
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return None;
    }
    value[..end].parse().ok()
}

/// Parse the labelled-line reply. SENTIMENT and SIGNAL are required.
pub fn parse_response(text: &str) -> MLResult<SentimentReading> {
    let mut sentiment = None;
    let mut confidence = None;
    let mut signal = None;
    let mut relevance = None;
    let mut reason = None;

    for line in text.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphabetic())
            .to_uppercase();
        let value = value.trim().trim_start_matches('*').trim();

        match label.as_str() {
            "SENTIMENT" => sentiment = sentiment.or_else(|| leading_number(value)),
            "CONFIDENCE" => confidence = confidence.or_else(|| leading_number(value)),
            "SIGNAL" => {
                if signal.is_none() {
                    signal = value
                        .split_whitespace()
                        .next()
                        .and_then(|word| word.parse::<Signal>().ok());
                }
            }
            "RELEVANCE" => {
                if relevance.is_none() {
                    relevance = Some(value.parse::<RelevanceTier>().unwrap_or_default());
                }
            }
            "REASON" if reason.is_none() && !value.is_empty() => reason = Some(value.to_string()),
            _ => {}
        }
    }

    let (Some(sentiment), Some(signal)) = (sentiment, signal) else {
        return Err(MLError::InvalidResponse(format!(
            "Could not parse response: {}",
            text.trim()
        )));
    };

    Ok(SentimentReading {
        sentiment: f64::clamp(sentiment, -1.0, 1.0),
        confidence: confidence.map(|c: f64| c.clamp(0.0, 1.0)),
        signal,
        reason: reason.unwrap_or_else(|| "No reason provided".to_string()),
        relevance,
    })
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmSentimentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmSentimentClient {
    pub fn new(config: LlmConfig) -> MLResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the raw reply text.
    pub async fn complete(&self, prompt: String) -> MLResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MLError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| MLError::InvalidResponse("Empty completion".to_string()))
    }

    /// Analyze one article end to end.
    pub async fn analyze(&self, article: &Article) -> MLResult<SentimentReading> {
        let reply = self.complete(build_prompt(article)).await?;
        let reading = parse_response(&reply)?;
        tracing::debug!(
            "{} -> {:.2} {} ({})",
            article.title,
            reading.sentiment,
            reading.signal,
            self.model
        );
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let reply = "SENTIMENT: 0.7\nCONFIDENCE: 0.85\nSIGNAL: BUY\nRELEVANCE: HIGH\nREASON: Record iPhone sales beat estimates.";
        let reading = parse_response(reply).unwrap();
        assert_eq!(reading.sentiment, 0.7);
        assert_eq!(reading.confidence, Some(0.85));
        assert_eq!(reading.signal, Signal::Buy);
        assert_eq!(reading.relevance, Some(RelevanceTier::High));
        assert_eq!(reading.reason, "Record iPhone sales beat estimates.");
    }

    #[test]
    fn test_parse_minimal_reply_with_markdown() {
        let reply = "Here is my analysis:\n**Sentiment:** -0.4\n**Signal:** sell.\n";
        let reading = parse_response(reply).unwrap();
        assert_eq!(reading.sentiment, -0.4);
        assert_eq!(reading.signal, Signal::Sell);
        assert_eq!(reading.confidence, None);
        assert_eq!(reading.relevance, None);
        assert_eq!(reading.reason, "No reason provided");
    }

    #[test]
    fn test_parse_clamps_and_defaults_relevance() {
        let reply = "SENTIMENT: 1.8\nCONFIDENCE: 1.2\nSIGNAL: HOLD\nRELEVANCE: SOMEWHAT\nREASON: Mixed.";
        let reading = parse_response(reply).unwrap();
        assert_eq!(reading.sentiment, 1.0);
        assert_eq!(reading.confidence, Some(1.0));
        assert_eq!(reading.relevance, Some(RelevanceTier::Medium));
    }

    #[test]
    fn test_parse_requires_sentiment_and_signal() {
        assert!(matches!(
            parse_response("SIGNAL: BUY\nREASON: no number"),
            Err(MLError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response("SENTIMENT: 0.3\nSIGNAL: MAYBE"),
            Err(MLError::InvalidResponse(_))
        ));
        assert!(parse_response("").is_err());
    }

    #[test]
    fn test_parse_number_followed_by_punctuation_or_range() {
        let reading = parse_response("SENTIMENT: 0.8.\nSIGNAL: BUY\nREASON: x").unwrap();
        assert_eq!(reading.sentiment, 0.8);

        let reply = "SENTIMENT: 0.5-0.7\nCONFIDENCE: .9, fairly sure\nSIGNAL: BUY";
        let reading = parse_response(reply).unwrap();
        assert_eq!(reading.sentiment, 0.5);
        assert_eq!(reading.confidence, Some(0.9));

        assert_eq!(leading_number("+0.3"), Some(0.3));
        assert_eq!(leading_number("-1"), Some(-1.0));
        assert_eq!(leading_number("-.25 bearish"), Some(-0.25));
        assert_eq!(leading_number("1.5.2"), Some(1.5));
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("n/a"), None);
    }

    #[test]
    fn test_reason_keeps_inner_colons() {
        let reply = "SENTIMENT: 0.2\nSIGNAL: HOLD\nREASON: Guidance: unchanged for Q3.";
        assert_eq!(parse_response(reply).unwrap().reason, "Guidance: unchanged for Q3.");
    }

    #[test]
    fn test_prompt_contains_article_text() {
        let article = Article {
            title: "Apple Reports Record iPhone Sales".to_string(),
            description: Some("Apple exceeded expectations".to_string()),
            source_name: "Reuters".to_string(),
            published_at: "2024-01-02T10:00:00Z".to_string(),
            url: None,
        };
        let prompt = build_prompt(&article);
        assert!(prompt.contains("News: Apple Reports Record iPhone Sales. Apple exceeded expectations"));
        assert!(prompt.contains("SIGNAL: [BUY/SELL/HOLD]"));
    }

    #[test]
    fn test_chat_response_shape() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" SENTIMENT: 0.1 "}}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(chat.choices[0].message.content.as_deref(), Some(" SENTIMENT: 0.1 "));
    }
}
