//! Turn a finished [`Index`] into filesystem actions and apply them.
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ApplyError, FsError};
use crate::fs::{DIR_MODE, Filesystem};
use crate::index::Index;
use crate::state::State;

/// A single filesystem change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Create a directory.
    Mkdir,
    /// Remove the existing entry (always a symlink).
    Remove,
    /// Create a symlink with the given text.
    Symlink {
        /// Link text.
        dest: PathBuf,
    },
}

impl Action {
    /// Apply the action at `path`.
    ///
    /// # Errors
    ///
    /// Returns the failing filesystem call with its path.
    pub fn execute(&self, fs: &dyn Filesystem, path: &Path) -> Result<(), FsError> {
        match self {
            Self::Mkdir => fs
                .mkdir(path, DIR_MODE)
                .map_err(|e| FsError::new("mkdir", path, e)),
            Self::Remove => fs.remove(path).map_err(|e| FsError::new("remove", path, e)),
            Self::Symlink { dest } => fs
                .symlink(dest, path)
                .map_err(|e| FsError::new("symlink", path, e)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mkdir => f.write_str("mkdir"),
            Self::Remove => f.write_str("remove"),
            Self::Symlink { dest } => write!(f, "symlink -> {}", dest.display()),
        }
    }
}

/// Ordered actions that move one target path from its current to its
/// planned state.
///
/// # Examples
///
/// ```
/// use linkfarm::plan::{Action, Task};
/// use linkfarm::state::{FileType, State};
///
/// let task = Task::new(&State::symlink("../a", FileType::Dir), &State::Dir);
/// assert_eq!(task.actions(), &[Action::Remove, Action::Mkdir]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Task {
    actions: Vec<Action>,
}

impl Task {
    /// Diff `current` against `planned`.
    #[must_use]
    pub fn new(current: &State, planned: &State) -> Self {
        let mut actions = Vec::with_capacity(2);
        if matches!(current, State::Symlink { .. }) {
            actions.push(Action::Remove);
        }
        match planned {
            State::Dir => actions.push(Action::Mkdir),
            State::Symlink { dest, .. } => actions.push(Action::Symlink { dest: dest.clone() }),
            State::None | State::File | State::Other => {}
        }
        Self { actions }
    }

    /// Actions in application order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Apply every action at `path`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failed action. Earlier actions are not rolled back.
    pub fn execute(&self, fs: &dyn Filesystem, path: &Path) -> Result<(), (Action, FsError)> {
        for action in &self.actions {
            tracing::info!(target: "linkfarm::apply", "{}: {action}", path.display());
            action
                .execute(fs, path)
                .map_err(|e| (action.clone(), e))?;
        }
        Ok(())
    }
}

/// Every change needed to bring the target to its planned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    target: PathBuf,
    tasks: BTreeMap<PathBuf, Task>,
}

impl Plan {
    /// Build a plan from every changed entry of `index`.
    ///
    /// Tasks are keyed by their path relative to `target`; entries whose
    /// current and planned states agree are left out.
    #[must_use]
    pub fn new(target: &Path, index: &Index) -> Self {
        let tasks = index
            .iter()
            .filter(|(_, spec)| spec.is_changed())
            .map(|(path, spec)| {
                let item = path.strip_prefix(target).unwrap_or(path).to_path_buf();
                (item, Task::new(&spec.current, &spec.planned))
            })
            .collect();
        Self {
            target: target.to_path_buf(),
            tasks,
        }
    }

    /// Target directory.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Tasks keyed by item path, in application order.
    #[must_use]
    pub const fn tasks(&self) -> &BTreeMap<PathBuf, Task> {
        &self.tasks
    }

    /// Whether the target is already in its planned state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Total number of actions over all tasks.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.tasks.values().map(|t| t.actions.len()).sum()
    }

    /// Apply every task in item order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the item and action that failed. Tasks already applied stay
    /// applied.
    pub fn execute(&self, fs: &dyn Filesystem) -> Result<(), ApplyError> {
        for (item, task) in &self.tasks {
            task.execute(fs, &self.target.join(item))
                .map_err(|(action, source)| ApplyError {
                    item: item.clone(),
                    action,
                    source,
                })?;
        }
        Ok(())
    }

    /// Render the plan as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be represented as UTF-8.
    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
