//! Primary status source: a public outage-report page scraped per service.

use super::config::StatusConfig;
use super::error::SourceError;
use super::types::{Classification, RawStatusResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Words that signal an ongoing problem in the indicator sentence.
const DEGRADED_MARKERS: [&str; 3] = ["problema", "falha", "instabilidade"];

/// Phrases that negate the degraded markers ("... não indicam problemas ...").
const NEGATION_MARKERS: [&str; 2] = ["não indicam", "sem problemas"];

/// Fragments of anti-bot interstitials.
const CHALLENGE_MARKERS: [&str; 4] = ["cf-chl", "just a moment", "captcha", "access denied"];

/// A source of per-service outage verdicts.
///
/// Implementations never fail: an unreachable or inconclusive source yields
/// a [`Classification::Unknown`] result.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    /// Label recorded on statuses this source produced.
    fn label(&self) -> &str;

    async fn fetch_status(&self, service_key: &str) -> RawStatusResult;
}

/// Classify an indicator sentence.
///
/// Degraded only when a problem word appears without one of the negation
/// phrases; everything else is operational. The phrase lists are narrow and
/// Portuguese-specific.
pub fn classify_indicator(text: &str) -> Classification {
    let lower = text.to_lowercase();
    let mentions_problem = DEGRADED_MARKERS.iter().any(|m| lower.contains(m));
    let negated = NEGATION_MARKERS.iter().any(|m| lower.contains(m));
    if mentions_problem && !negated {
        Classification::Degraded
    } else {
        Classification::Operational
    }
}

/// Find the first sentence of the page text containing one of `markers`.
pub fn extract_indicator(html: &str, markers: &[String]) -> Option<String> {
    let text = html_to_text(html);
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();
    let found = sentences(&text)
        .find(|sentence| {
            let lower = sentence.to_lowercase();
            markers.iter().any(|m| lower.contains(m.as_str()))
        })
        .map(str::to_string);
    found
}

/// Split on `.`, `!` or `?` followed by whitespace or the end of the text.
///
/// A period inside a number ("1.250") does not end a sentence.
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            parts.push(&text[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
}

/// First number in the text, read as a report count.
///
/// Digit groups joined by `.` are one number ("1.250" is 1250).
pub fn report_count(text: &str) -> u32 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let mut digits = String::new();
    let mut chars = text[start..].chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch == '.' && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        } else {
            break;
        }
    }
    digits.parse().unwrap_or(0)
}

/// Visible text of an HTML document: tags, scripts and styles removed,
/// common entities decoded, whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `html`.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len() / 2);
    let mut i = 0;

    while i < html.len() {
        let rest = &lower[i..];
        let skip_block = if rest.starts_with("<script") {
            Some("</script>")
        } else if rest.starts_with("<style") {
            Some("</style>")
        } else {
            None
        };

        if let Some(close) = skip_block {
            match rest.find(close) {
                Some(end) => {
                    i += end + close.len();
                    out.push(' ');
                    continue;
                }
                None => break,
            }
        }

        if starts_tag(rest) {
            match rest.find('>') {
                Some(end) => {
                    i += end + 1;
                    out.push(' ');
                    continue;
                }
                None => break,
            }
        }

        match html[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    decode_entities(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<` opens markup only before a name, a closing slash, `!` or `?`;
/// anything else is a literal less-than sign in the text.
fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    const ENTITIES: [(&str, &str); 16] = [
        ("&nbsp;", " "),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&apos;", "'"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&atilde;", "ã"),
        ("&otilde;", "õ"),
        ("&ccedil;", "ç"),
        ("&aacute;", "á"),
        ("&eacute;", "é"),
        ("&iacute;", "í"),
        ("&oacute;", "ó"),
        ("&uacute;", "ú"),
        ("&ecirc;", "ê"),
        ("&ocirc;", "ô"),
    ];
    let mut decoded = text.to_string();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    // Last, so "&amp;lt;" stays "&lt;".
    decoded.replace("&amp;", "&")
}

fn looks_like_challenge(body: &str) -> bool {
    let lower = body.to_lowercase();
    CHALLENGE_MARKERS.iter().any(|m| lower.contains(m))
}

/// HTTP client for the primary outage-report site.
pub struct StatusSourceClient {
    client: Client,
    config: StatusConfig,
}

impl StatusSourceClient {
    /// Create a client with its own connection pool.
    pub fn new(config: StatusConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, config }
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(config: StatusConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Page URL for a service.
    pub fn url_for(&self, service_key: &str) -> String {
        self.config.url_template.replace("{service}", service_key)
    }

    async fn try_fetch(&self, service_key: &str) -> Result<RawStatusResult, SourceError> {
        let response = self
            .client
            .get(self.url_for(service_key))
            .header(USER_AGENT, &self.config.user_agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7")
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return Err(SourceError::Blocked(format!("HTTP {}", status.as_u16())));
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        let Some(indicator) = extract_indicator(&body, &self.config.indicator_markers) else {
            return Err(if looks_like_challenge(&body) {
                SourceError::Blocked("challenge page".to_string())
            } else {
                SourceError::NoIndicator
            });
        };

        Ok(RawStatusResult::new(classify_indicator(&indicator), indicator.clone())
            .with_reports(report_count(&indicator)))
    }

    fn classify_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.config.timeout_seconds)
        } else {
            SourceError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl StatusSource for StatusSourceClient {
    fn label(&self) -> &str {
        &self.config.source_label
    }

    async fn fetch_status(&self, service_key: &str) -> RawStatusResult {
        match self.try_fetch(service_key).await {
            Ok(result) => {
                tracing::debug!(
                    service = service_key,
                    state = ?result.state,
                    reports = result.report_signal,
                    "Primary source classified service"
                );
                result
            }
            Err(error) => {
                tracing::warn!(
                    service = service_key,
                    error = %error,
                    "Primary status source unavailable"
                );
                RawStatusResult::unknown(error.to_string())
            }
        }
    }
}
