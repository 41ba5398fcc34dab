use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A viewer's up/down signal on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// The literal stored under `post_{id}_vote`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Vote::Up),
            "down" => Ok(Vote::Down),
            other => Err(format!("unknown vote direction {:?}", other)),
        }
    }
}
