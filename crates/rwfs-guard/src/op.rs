/// Lock mode an operation needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Shared: any number of holders at once.
    Read,
    /// Exclusive: no other reader or writer.
    Write,
}

/// The operations [`GuardedStore`](crate::GuardedStore) exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Delete,
    SetContent,
    Save,
}

impl Operation {
    pub fn access(self) -> Access {
        match self {
            Self::Get => Access::Read,
            Self::Delete | Self::SetContent | Self::Save => Access::Write,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Delete => write!(f, "delete"),
            Self::SetContent => write!(f, "set_content"),
            Self::Save => write!(f, "save"),
        }
    }
}
