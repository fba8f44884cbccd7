use chrono::{DateTime, Utc};
use std::env;
use tokio::fs;

use crate::config::Config;
use crate::types::UiError;

pub fn format_relative_time(iso_time: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(iso_time) {
        Ok(parsed) => {
            let duration = now.signed_duration_since(parsed.with_timezone(&Utc));
            if duration.num_seconds() < 60 {
                "just now".to_string()
            } else if duration.num_minutes() < 60 {
                format!("{} min ago", duration.num_minutes())
            } else if duration.num_hours() < 24 {
                format!("{} h ago", duration.num_hours())
            } else {
                format!("{} d ago", duration.num_days())
            }
        }
        Err(_) => iso_time.to_string(),
    }
}

pub async fn load_api_key(config: &Config) -> Result<String, UiError> {
    if let Ok(value) = env::var("SYNCTHING_API_KEY") {
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
    }

    let contents = fs::read_to_string(config.syncthing_config_xml_path()).await?;
    extract_api_key(&contents).ok_or(UiError::MissingApiKey)
}

pub fn candidate_base_urls(config: &Config) -> Vec<String> {
    let mut base_urls = Vec::new();
    if let Some(configured) = config.api_url.as_deref() {
        push_unique_url(&mut base_urls, configured);
    }
    if let Ok(custom) = env::var("SYNCTHING_API_URL") {
        push_unique_url(&mut base_urls, &custom);
    }
    push_unique_url(&mut base_urls, "https://127.0.0.1:8384");
    push_unique_url(&mut base_urls, "http://127.0.0.1:8384");
    base_urls
}

fn push_unique_url(list: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return;
    }
    if !list.iter().any(|existing| existing == trimmed) {
        list.push(trimmed.to_string());
    }
}

fn extract_api_key(contents: &str) -> Option<String> {
    let start_tag = "<apikey>";
    let end_tag = "</apikey>";
    let start = contents.find(start_tag)? + start_tag.len();
    let rest = &contents[start..];
    let end = rest.find(end_tag)?;
    let key = rest[..end].trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
