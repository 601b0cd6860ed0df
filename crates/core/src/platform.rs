//! Acquisition platforms and the de-duplicated platform set a campaign targets.

use serde::Serialize;

use crate::error::CoreError;

define_text_enum! {
    /// Channel a lead originated from.
    Platform("platform") {
        Meta = "meta",
        TikTok = "tiktok",
        Google = "google",
        Snapchat = "snapchat",
        Instagram = "instagram",
        WhatsApp = "whatsapp",
        Website = "website",
        DirectCall = "direct_call",
        Referral = "referral",
        Other = "other",
    }
}

impl Platform {
    /// Human-readable label used in leaderboards.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Meta => "Meta",
            Platform::TikTok => "TikTok",
            Platform::Google => "Google",
            Platform::Snapchat => "Snapchat",
            Platform::Instagram => "Instagram",
            Platform::WhatsApp => "WhatsApp",
            Platform::Website => "Website",
            Platform::DirectCall => "Direct Call",
            Platform::Referral => "Referral",
            Platform::Other => "Other",
        }
    }
}

/// Non-empty, order-preserving set of platforms.
///
/// Duplicates are dropped on construction; the first occurrence keeps its
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformSet(Vec<Platform>);

impl PlatformSet {
    pub fn new(platforms: Vec<Platform>) -> Result<Self, CoreError> {
        let mut unique = Vec::with_capacity(platforms.len());
        for platform in platforms {
            if !unique.contains(&platform) {
                unique.push(platform);
            }
        }
        if unique.is_empty() {
            return Err(CoreError::Validation(
                "A campaign must target at least one platform".to_string(),
            ));
        }
        Ok(Self(unique))
    }

    pub fn as_slice(&self) -> &[Platform] {
        &self.0
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.0.contains(&platform)
    }

    /// Spellings for binding to a `TEXT[]` column.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl TryFrom<Vec<String>> for PlatformSet {
    type Error = CoreError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        let platforms = values
            .iter()
            .map(|v| v.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(platforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped_in_order() {
        let set = PlatformSet::new(vec![
            Platform::TikTok,
            Platform::Meta,
            Platform::TikTok,
            Platform::Google,
            Platform::Meta,
        ])
        .unwrap();
        assert_eq!(
            set.as_slice(),
            &[Platform::TikTok, Platform::Meta, Platform::Google]
        );
    }

    #[test]
    fn empty_set_rejected() {
        let err = PlatformSet::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("at least one platform"));
    }

    #[test]
    fn decodes_from_stored_strings() {
        let set = PlatformSet::try_from(vec!["meta".to_string(), "direct_call".to_string()])
            .unwrap();
        assert!(set.contains(Platform::DirectCall));
        assert_eq!(set.to_strings(), vec!["meta", "direct_call"]);
    }

    #[test]
    fn unknown_stored_platform_rejected() {
        assert!(PlatformSet::try_from(vec!["myspace".to_string()]).is_err());
    }

    #[test]
    fn serializes_as_plain_list() {
        let set = PlatformSet::new(vec![Platform::Meta, Platform::TikTok]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["meta","tiktok"]"#);
    }
}
