//! Natural-language filter interpreter
//!
//! Free text goes to the language model with a fixed instruction, the reply
//! is cut down to its JSON span, parsed, and passed through
//! [`FilterSet::validate`]. Exactly one model call is made per query; rate
//! limits are reported to the caller instead of retried.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::error::{CompanyError, Result};
use super::filters::FilterSet;
use crate::kernel::BaseAI;

const FILTER_PROMPT: &str = r#"You turn natural-language questions about companies into search filters.
Reply with a single JSON object using only these optional keys:
- name: company name or name keywords
- industry: the industry or sector
- country: a full country name (no abbreviations such as USA or UK); anything that is not a country goes in region
- region: a region, state or area
- size: one of "1-10", "11-50", "51-200", "201-500", "501-1000", "1001-5000", "5001-10000", "10001+"
- founded: the founding year as a number
- product: a product or service the company offers
- location: any other place mentioned

Example question: "Fastest growing AR companies in Silicon Valley"
Example reply: {"industry":"augmented reality","region":"silicon valley"}

Use double quotes for keys and strings, no trailing commas, no text outside the object.
Only include keys the question actually mentions."#;

#[derive(Debug, Clone, Copy)]
pub struct InterpreterConfig {
    /// Bound on the model call, separate from any client-level timeout.
    pub request_timeout: Duration,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Slice from the first `{` to the last `}` inclusive.
///
/// Returns `None` when either brace is missing or the last `}` comes before
/// the first `{`.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub struct FilterInterpreter {
    ai: Arc<dyn BaseAI>,
    config: InterpreterConfig,
}

impl FilterInterpreter {
    pub fn new(ai: Arc<dyn BaseAI>, config: InterpreterConfig) -> Self {
        Self { ai, config }
    }

    /// Interpret a free-text query into a validated filter set.
    pub async fn interpret(&self, query: &str) -> Result<FilterSet> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CompanyError::QueryParse("Search query is required".into()));
        }

        debug!(query = %query, "Interpreting search query");

        let reply = tokio::time::timeout(
            self.config.request_timeout,
            self.ai.complete(FILTER_PROMPT, query),
        )
        .await
        .map_err(|_| CompanyError::UpstreamUnavailable {
            rate_limited: false,
            message: format!(
                "no reply within {}s",
                self.config.request_timeout.as_secs()
            ),
        })?
        .map_err(CompanyError::from_interpreter)?;

        let filters = coerce_filters(&reply)?;
        debug!(filters = ?filters, "Interpreted search query");
        Ok(filters)
    }
}

fn coerce_filters(reply: &str) -> Result<FilterSet> {
    let original = reply.trim();
    let malformed = |extracted: Option<&str>, reason: &str| {
        debug!(reason = %reason, "Model response is not a usable filter object");
        CompanyError::MalformedResponse {
            original: original.to_string(),
            extracted: extracted.map(String::from),
        }
    };

    let span = extract_json_span(original).ok_or_else(|| malformed(None, "no JSON object"))?;

    let map = match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(malformed(Some(span), "not an object")),
        Err(e) => return Err(malformed(Some(span), &e.to_string())),
    };

    if map.is_empty() {
        return Err(malformed(Some(span), "empty object"));
    }

    let filters = FilterSet::validate(&map);
    if filters.is_empty() {
        return Err(malformed(Some(span), "no recognized fields"));
    }

    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{MockAI, MockReply};

    fn interpreter(ai: &MockAI) -> FilterInterpreter {
        FilterInterpreter::new(Arc::new(ai.clone()), InterpreterConfig::default())
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(
            extract_json_span(r#"Sure! {"industry":"fintech"} hope that helps"#),
            Some(r#"{"industry":"fintech"}"#)
        );
        assert_eq!(
            extract_json_span(r#"{"a":{"b":1}} and {"c":2}"#),
            Some(r#"{"a":{"b":1}} and {"c":2}"#)
        );
        assert_eq!(extract_json_span("no braces"), None);
        assert_eq!(extract_json_span("only { open"), None);
        assert_eq!(extract_json_span("} reversed {"), None);
        assert_eq!(extract_json_span("{}"), Some("{}"));
    }

    #[tokio::test]
    async fn test_empty_query_never_calls_model() {
        let ai = MockAI::new();

        for query in ["", "   ", "\n\t"] {
            let err = interpreter(&ai).interpret(query).await.unwrap_err();
            assert!(matches!(err, CompanyError::QueryParse(_)));
        }
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_preamble_and_trailer_are_stripped() {
        let ai = MockAI::new().with_response(r#"Sure! {"industry":"fintech"} hope that helps"#);

        let filters = interpreter(&ai).interpret("fintech companies").await.unwrap();

        assert_eq!(
            filters,
            FilterSet {
                industry: Some("fintech".into()),
                ..Default::default()
            }
        );
        assert_eq!(ai.call_count(), 1);
        assert!(ai.was_called_with("fintech companies"));
        assert_eq!(ai.calls()[0].system, FILTER_PROMPT);
    }

    #[tokio::test]
    async fn test_empty_object_is_malformed() {
        let ai = MockAI::new().with_response("{}");

        let err = interpreter(&ai).interpret("anything").await.unwrap_err();

        match err {
            CompanyError::MalformedResponse {
                original,
                extracted,
            } => {
                assert_eq!(original, "{}");
                assert_eq!(extracted.as_deref(), Some("{}"));
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_diagnostics() {
        let ai = MockAI::new().with_response(r#"Here: {"industry": fintech} done"#);

        let err = interpreter(&ai).interpret("fintech").await.unwrap_err();

        match err {
            CompanyError::MalformedResponse {
                original,
                extracted,
            } => {
                assert_eq!(original, r#"Here: {"industry": fintech} done"#);
                assert_eq!(extracted.as_deref(), Some(r#"{"industry": fintech}"#));
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reply_without_object_is_malformed() {
        let ai = MockAI::new().with_response("I could not find any filters.");

        let err = interpreter(&ai).interpret("hmm").await.unwrap_err();

        assert!(matches!(
            err,
            CompanyError::MalformedResponse {
                extracted: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_only_unknown_keys_is_malformed() {
        let ai = MockAI::new().with_response(r#"{"ceo":"someone","valuation":"high"}"#);

        let err = interpreter(&ai).interpret("who").await.unwrap_err();

        assert!(matches!(err, CompanyError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unknown_keys_dropped_and_year_coerced() {
        let ai = MockAI::new()
            .with_response(r#"{"country":" Germany ","founded":"2012","mood":"optimistic"}"#);

        let filters = interpreter(&ai).interpret("german startups from 2012").await.unwrap();

        assert_eq!(filters.country.as_deref(), Some("Germany"));
        assert_eq!(filters.founded, Some(2012));
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            serde_json::json!({"country": "Germany", "founded": 2012})
        );
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let ai = MockAI::new().with_rate_limit();

        let err = interpreter(&ai).interpret("banks").await.unwrap_err();

        assert!(matches!(
            err,
            CompanyError::UpstreamUnavailable {
                rate_limited: true,
                ..
            }
        ));
        assert_eq!(ai.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_is_configuration_error() {
        let ai = MockAI::new().with_reply(MockReply::Unauthorized);

        let err = interpreter(&ai).interpret("banks").await.unwrap_err();

        assert!(matches!(err, CompanyError::Configuration(_)));
        assert_eq!(ai.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_model_call_times_out() {
        let ai = MockAI::new()
            .with_response(r#"{"industry":"fintech"}"#)
            .with_delay(Duration::from_secs(120));
        let interpreter = FilterInterpreter::new(
            Arc::new(ai.clone()),
            InterpreterConfig {
                request_timeout: Duration::from_secs(5),
            },
        );

        let err = interpreter.interpret("fintech").await.unwrap_err();

        assert!(matches!(
            err,
            CompanyError::UpstreamUnavailable {
                rate_limited: false,
                ..
            }
        ));
    }
}
