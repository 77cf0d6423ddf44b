use nljc::input::InputError;

pub enum DriverError {
    InputFileDoesNotExist(String),
    InputError(String),
    SemanticErrors(usize),
    IoError(String),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InputFileDoesNotExist(name) => write!(f, "File {name} does not exist"),
            Self::InputError(e) => write!(f, "input error: {e}"),
            Self::SemanticErrors(n) => write!(f, "compilation stopped with {n} error(s)"),
            Self::IoError(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::fmt::Debug for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::error::Error for DriverError {}

impl From<InputError> for DriverError {
    fn from(e: InputError) -> Self {
        Self::InputError(e.to_string())
    }
}

impl From<std::io::Error> for DriverError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}
