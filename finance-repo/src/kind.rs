use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Whether money comes in or goes out. Shared by categories and transactions.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    #[serde(alias = "Ingreso")]
    Income,
    #[serde(alias = "Gasto")]
    Expense,
}

impl Kind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown kind {0:?}, expected Income or Expense")]
pub struct ParseKindError(pub String);

impl FromStr for Kind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Income" | "income" | "Ingreso" => Ok(Kind::Income),
            "Expense" | "expense" | "Gasto" => Ok(Kind::Expense),
            other => Err(ParseKindError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Kind;
    use std::str::FromStr;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!(Kind::from_str("Income"), Ok(Kind::Income));
        assert_eq!(Kind::from_str("Gasto"), Ok(Kind::Expense));
        assert!(Kind::from_str("Transfer").is_err());
    }

    #[test]
    fn deserializes_aliases() {
        let kind: Kind = serde_json::from_str("\"Ingreso\"").unwrap();
        assert_eq!(kind, Kind::Income);
        assert_eq!(serde_json::to_string(&Kind::Expense).unwrap(), "\"Expense\"");
    }
}
