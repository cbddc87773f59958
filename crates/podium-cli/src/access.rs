use std::fmt;

/// Who is driving the CLI. Only editors may change the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Viewer,
    Editor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ManageTeams,
    ManageCategories,
    ManageEvents,
    RecordResults,
    Publish,
    ViewDrafts,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManageTeams => write!(f, "manage teams"),
            Self::ManageCategories => write!(f, "manage categories"),
            Self::ManageEvents => write!(f, "manage events"),
            Self::RecordResults => write!(f, "record results"),
            Self::Publish => write!(f, "publish scores"),
            Self::ViewDrafts => write!(f, "view unpublished scores"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Session {
    pub role: Role,
}

impl Session {
    pub fn new(editor: bool) -> Self {
        let role = if editor { Role::Editor } else { Role::Viewer };
        Self { role }
    }

    pub fn is_editor(&self) -> bool {
        self.role == Role::Editor
    }

    pub fn authorize(&self, action: Action) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.is_editor(),
            "editor access required to {action} (pass --editor or set editor = true)"
        );
        Ok(())
    }
}
