use anyhow::Context as _;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub fn messages_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/v1/messages")
}

/// Send one user message and return the text of the first content block
pub async fn messages_text(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = serde_json::json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [{ "role": "user", "content": prompt }],
    });

    let response = client
        .post(endpoint)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("POST {endpoint}"))?;

    let status = response.status();
    let raw = response.text().await.context("read Messages API response body")?;
    if !status.is_success() {
        let message = parse_error_message(&raw).unwrap_or_else(|| raw.clone());
        anyhow::bail!("Messages API error ({status}): {message}");
    }

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("parse Messages API response")?;
    extract_text(&value)
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

fn extract_text(value: &serde_json::Value) -> anyhow::Result<String> {
    let content = value
        .get("content")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("missing `content` array in response"))?;

    let text = content
        .iter()
        .find(|block| block.get("type").and_then(|v| v.as_str()) == Some("text"))
        .and_then(|block| block.get("text"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if text.trim().is_empty() {
        anyhow::bail!("Messages API returned no text");
    }
    Ok(text.to_owned())
}
