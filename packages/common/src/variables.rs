//! Merge-variable registry.
//!
//! The fixed set of `{{name}}` placeholders a composer may insert. The editor
//! validates against it and the preview renderer derives its default sample
//! values from it.

use crate::error::CommonError;
use crate::result::CommonResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeVariable {
    FirstName,
    Company,
    LastSeen,
}

impl MergeVariable {
    pub const ALL: [MergeVariable; 3] = [
        MergeVariable::FirstName,
        MergeVariable::Company,
        MergeVariable::LastSeen,
    ];

    /// Name as it appears inside the braces
    pub fn name(&self) -> &'static str {
        match self {
            MergeVariable::FirstName => "firstName",
            MergeVariable::Company => "company",
            MergeVariable::LastSeen => "lastSeen",
        }
    }

    /// Toolbar label
    pub fn label(&self) -> &'static str {
        match self {
            MergeVariable::FirstName => "First Name",
            MergeVariable::Company => "Company",
            MergeVariable::LastSeen => "Last Seen",
        }
    }

    /// Value shown in previews when no recipient data is supplied
    pub fn sample_value(&self) -> &'static str {
        match self {
            MergeVariable::FirstName => "John",
            MergeVariable::Company => "Acme Corp",
            MergeVariable::LastSeen => "2 days ago",
        }
    }

    /// The literal placeholder, e.g. `{{firstName}}`
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.name())
    }

    pub fn lookup(name: &str) -> Option<MergeVariable> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }

    /// Like `lookup`, failing with `UnknownVariable`
    pub fn resolve(name: &str) -> CommonResult<MergeVariable> {
        Self::lookup(name).ok_or_else(|| CommonError::UnknownVariable(name.to_string()))
    }
}

impl FromStr for MergeVariable {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl fmt::Display for MergeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text() {
        assert_eq!(MergeVariable::FirstName.token(), "{{firstName}}");
        assert_eq!(MergeVariable::LastSeen.token(), "{{lastSeen}}");
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!("company".parse::<MergeVariable>(), Ok(MergeVariable::Company));
        assert_eq!(
            "unknownThing".parse::<MergeVariable>(),
            Err(CommonError::UnknownVariable("unknownThing".to_string()))
        );
        // Names are case-sensitive
        assert!("FirstName".parse::<MergeVariable>().is_err());
    }

    #[test]
    fn test_serde_uses_token_names() {
        let json = serde_json::to_string(&MergeVariable::LastSeen).unwrap();
        assert_eq!(json, "\"lastSeen\"");
        let back: MergeVariable = serde_json::from_str("\"firstName\"").unwrap();
        assert_eq!(back, MergeVariable::FirstName);
    }
}
