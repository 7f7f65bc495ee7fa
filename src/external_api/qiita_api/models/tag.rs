#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub followers_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub icon_url: String,
    pub id: String,
    pub items_count: u64,
}

/// `null` reads as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

impl Tag {
    #[cfg(test)]
    pub fn new(id: &str, followers_count: u64) -> Self {
        Self {
            followers_count,
            icon_url: String::new(),
            id: id.to_string(),
            items_count: 0,
        }
    }
}
