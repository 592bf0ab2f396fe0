//! Output layout for serialized queries.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How groups are separated when a query is serialized.
///
/// Both forms parse back to the same query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separator {
    /// `AND` on its own line with a blank line either side, for editing.
    #[default]
    BlankLines,
    /// `AND` inline, for handing the query to a search service.
    Inline,
}

impl Separator {
    /// Returns the literal text placed between groups.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlankLines => "\n\nAND\n\n",
            Self::Inline => " AND ",
        }
    }

    /// Returns the name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::BlankLines => "blank-lines",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blank-lines" => Ok(Self::BlankLines),
            "inline" => Ok(Self::Inline),
            other => Err(format!(
                "unknown separator '{other}' (expected 'blank-lines' or 'inline')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for sep in [Separator::BlankLines, Separator::Inline] {
            assert_eq!(sep.name().parse::<Separator>().unwrap(), sep);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "newline".parse::<Separator>().unwrap_err();
        assert!(err.contains("unknown separator"));
    }
}
