//! Decide what a target path should become for one package item.
use std::path::PathBuf;

use super::Planner;
use crate::error::{Conflict, ConflictKind, PlanError};
use crate::paths::{SourceItem, TargetItem};
use crate::state::{FileType, State};

/// Outcome of installing one item: the new planned state plus whether the
/// walk should descend into the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Record the state and keep walking (into the item, if a directory).
    Continue(State),
    /// Record the state; the item's subtree is already represented by it.
    SkipSubtree(State),
}

impl Decision {
    /// Continue for non-directories, skip the subtree for directories.
    fn placed(state: State, item_type: FileType) -> Self {
        if item_type == FileType::Dir {
            Self::SkipSubtree(state)
        } else {
            Self::Continue(state)
        }
    }

    /// The planned state to record.
    #[must_use]
    pub const fn state(&self) -> &State {
        match self {
            Self::Continue(state) | Self::SkipSubtree(state) => state,
        }
    }

    /// Consume the decision, keeping the planned state.
    #[must_use]
    pub fn into_state(self) -> State {
        match self {
            Self::Continue(state) | Self::SkipSubtree(state) => state,
        }
    }
}

/// What the placement rules say, before any merge is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    Place(Decision),
    /// The target is a directory link to absorb; carries its resolved destination.
    Merge(PathBuf),
    Conflict(ConflictKind),
}

/// Apply the placement rules to `item` over the planned state of `target`.
pub(crate) fn decide(item: &SourceItem, target: &TargetItem) -> Verdict {
    let item_is_dir = item.file_type == FileType::Dir;
    let item_as_dest = target.path.relative_to(&item.path.full());

    match &target.state {
        State::None => Verdict::Place(Decision::placed(
            State::symlink(item_as_dest, item.file_type),
            item.file_type,
        )),
        State::File => Verdict::Conflict(ConflictKind::FileInTheWay),
        State::Dir if item_is_dir => Verdict::Place(Decision::Continue(State::Dir)),
        State::Dir => Verdict::Conflict(ConflictKind::DirectoryExpected),
        State::Other => Verdict::Conflict(ConflictKind::UnknownType),
        State::Symlink { dest, .. } if *dest == item_as_dest => {
            Verdict::Place(Decision::placed(target.state.clone(), item.file_type))
        }
        State::Symlink { dest_type, .. } if *dest_type != FileType::Dir => {
            Verdict::Conflict(ConflictKind::LinkToNonDirectory)
        }
        State::Symlink { .. } if !item_is_dir => {
            Verdict::Conflict(ConflictKind::NonDirectoryOverLink)
        }
        State::Symlink { dest, .. } => Verdict::Merge(target.path.resolve(dest)),
    }
}

impl Planner<'_> {
    /// Decide the new planned state for `target`, merging an existing
    /// directory link first when the rules call for it.
    pub(super) fn install(
        &mut self,
        item: &SourceItem,
        target: &TargetItem,
    ) -> Result<Decision, PlanError> {
        match decide(item, target) {
            Verdict::Place(decision) => Ok(decision),
            Verdict::Merge(dest) => {
                self.merge(&dest, &target.path)?;
                Ok(Decision::Continue(State::Dir))
            }
            Verdict::Conflict(kind) => Err(Conflict {
                item: item.path.full(),
                item_type: item.file_type,
                target: target.path.full(),
                target_state: target.state.clone(),
                kind,
            }
            .into()),
        }
    }
}
