use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// How the transform engine treats procedure types it has no recipe for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedurePolicy {
    /// Unknown procedures get the default sharpen-only recipe.
    #[default]
    Lenient,
    /// Unknown procedures are rejected as an invalid parameter.
    Strict,
}

impl FromStr for ProcedurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ProcedurePolicy::Lenient),
            "strict" => Ok(ProcedurePolicy::Strict),
            _ => Err(anyhow::anyhow!("Invalid procedure policy: {}", s)),
        }
    }
}

impl Display for ProcedurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcedurePolicy::Lenient => write!(f, "lenient"),
            ProcedurePolicy::Strict => write!(f, "strict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("Strict".parse::<ProcedurePolicy>().unwrap(), ProcedurePolicy::Strict);
        assert_eq!(" lenient ".parse::<ProcedurePolicy>().unwrap(), ProcedurePolicy::Lenient);
        assert!("loose".parse::<ProcedurePolicy>().is_err());
        assert_eq!(ProcedurePolicy::default(), ProcedurePolicy::Lenient);
    }
}
