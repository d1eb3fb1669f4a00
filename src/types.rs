//! Small shared types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a dispatch did with a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The call ran (or failed before reaching the network) and its outcome
    /// has been delivered.
    Sent,
    /// The call is waiting for authorization to finish.
    Queued,
}

/// Sizes accepted by `users/profile_image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileImageSize {
    /// 24x24
    Mini,
    /// 48x48
    #[default]
    Normal,
    /// 73x73
    Bigger,
}

impl ProfileImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mini => "mini",
            Self::Normal => "normal",
            Self::Bigger => "bigger",
        }
    }
}

impl fmt::Display for ProfileImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_image_size_wire_names() {
        assert_eq!(ProfileImageSize::Mini.to_string(), "mini");
        assert_eq!(ProfileImageSize::default().as_str(), "normal");
        let size: ProfileImageSize = serde_json::from_str("\"bigger\"").unwrap();
        assert_eq!(size, ProfileImageSize::Bigger);
    }
}
