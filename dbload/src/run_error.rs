use crate::exit_codes::ExitCode;

#[derive(Debug)]
pub enum RunError {
    /// Configuration rejected before connecting; printed together with the usage line.
    Usage(clap::Error),
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::InvalidInput,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }

    pub fn print(&self) {
        match self {
            Self::Usage(err) => {
                let _ = err.print();
            }
            Self::RuntimeError(_) => eprintln!("{self}"),
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(e) => write!(f, "{e}"),
            Self::RuntimeError(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(e) => Some(e),
            Self::RuntimeError(e) => Some(e.as_ref()),
        }
    }
}

impl From<anyhow::Error> for RunError {
    fn from(err: anyhow::Error) -> Self {
        Self::RuntimeError(err)
    }
}
