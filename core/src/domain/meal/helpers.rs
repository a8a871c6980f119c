use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::meal::entities::UserId;

const DEFAULT_FILENAME: &str = "meal.jpg";

static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").expect("image extension pattern is valid")
});

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`.
pub fn sanitize_filename(filename: Option<&str>) -> String {
    let name = filename
        .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f).trim())
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILENAME);

    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn user_prefix(user: &UserId) -> String {
    format!("{}/", user.as_str())
}

/// `{user}/{unix millis}-{filename}`
pub fn build_object_key(user: &UserId, filename: Option<&str>, now: DateTime<Utc>) -> String {
    format!(
        "{}{}-{}",
        user_prefix(user),
        now.timestamp_millis(),
        sanitize_filename(filename)
    )
}

pub fn is_image_key(object_key: &str) -> bool {
    IMAGE_EXTENSION.is_match(object_key)
}
