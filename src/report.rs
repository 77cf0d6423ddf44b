use std::fmt;

/// Pipeline stage a diagnostic originates from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Symbols,
    Semantic,
    Optimization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symbols => write!(f, "symbols"),
            Self::Semantic => write!(f, "semantic"),
            Self::Optimization => write!(f, "optimization"),
        }
    }
}

/// One diagnostic. Passes append these and keep walking; they never
/// abort the traversal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Report {
    pub stage: Stage,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Report {
    pub fn error(stage: Stage, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            stage,
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.stage, self.line, self.column, self.message
        )
    }
}
