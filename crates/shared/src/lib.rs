pub mod error;
pub mod transcript;

pub mod settings {
    use serde::{Deserialize, Serialize};

    /// Completion endpoint tier selected in the panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ModelTier {
        /// Lightweight default.
        Flash,
        /// Heavyweight tier for harder questions.
        Pro,
    }

    impl ModelTier {
        pub fn as_str(&self) -> &'static str {
            match self {
                ModelTier::Flash => "flash",
                ModelTier::Pro => "pro",
            }
        }

        /// Endpoint model name behind this tier.
        pub fn model_name(&self) -> &'static str {
            match self {
                ModelTier::Flash => "gemini-2.5-flash",
                ModelTier::Pro => "gemini-2.5-pro",
            }
        }

        pub fn parse(s: &str) -> Option<Self> {
            match s {
                "flash" => Some(ModelTier::Flash),
                "pro" => Some(ModelTier::Pro),
                _ => None,
            }
        }
    }

    impl Default for ModelTier {
        fn default() -> Self {
            ModelTier::Flash
        }
    }
}

pub mod page {
    use serde::{Deserialize, Serialize};

    /// Active document as reported by the host's tab query.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DocumentInfo {
        pub id: u32,
        pub url: String,
        pub title: String,
        pub fav_icon_url: Option<String>,
    }

    /// Snapshot of the document the conversation is contextualized against.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ActiveDocument {
        pub url: String,
        pub title: String,
        pub icon_url: Option<String>,
    }

    impl From<&DocumentInfo> for ActiveDocument {
        fn from(info: &DocumentInfo) -> Self {
            Self {
                url: info.url.clone(),
                title: info.title.clone(),
                icon_url: info.fav_icon_url.clone(),
            }
        }
    }
}
