//! Collaborators a file patch item reads from: the repository it queries and
//! the root controller that hands out the repository and the host context.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::diff::{DiffLine, FilePatch};
use crate::events::Emitter;
use crate::pane::ElementId;
use crate::uri::StagingStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    pub staged: bool,
    /// Only meaningful with `staged`: diff against the commit being amended.
    pub amending: bool,
}

pub trait Repository {
    fn is_partially_staged<'a>(&'a self, file_path: &'a str) -> LocalBoxFuture<'a, Result<bool>>;

    fn file_patch_for_path<'a>(
        &'a self,
        file_path: &'a str,
        options: PatchOptions,
    ) -> LocalBoxFuture<'a, Result<FilePatch>>;
}

/// Process-wide controller owned by the host. Items only read from it.
pub trait RootController {
    fn repository(&self) -> Option<Rc<dyn Repository>>;
    fn context(&self) -> RootContext;
}

pub trait CommandDispatch {
    /// Returns false when no handler is registered for `command`.
    fn dispatch(&self, command: &str) -> bool;
}

pub trait TooltipService {
    fn show(&self, target: ElementId, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchboardEvent {
    DidFinishRepositoryRefresh,
    DidSelectFilePatch {
        file_path: String,
        staging_status: StagingStatus,
    },
    DidDiscardLines {
        file_path: String,
    },
}

pub type Switchboard = Rc<Emitter<SwitchboardEvent>>;

type PathAction = Rc<dyn Fn(&str)>;
type PatchPathAction = Rc<dyn Fn(&str, &StagingStatus)>;

/// Callbacks the root controller exposes for mutating workspace state.
#[derive(Clone)]
pub struct WorkspaceActions {
    pub repo_refresh: Rc<dyn Fn()>,
    pub surface_file: PathAction,
    pub dive_into_file_patch: PatchPathAction,
    pub quietly_select_item: PatchPathAction,
    pub open_files: Rc<dyn Fn(&[String])>,
    pub discard_lines: Rc<dyn Fn(&FilePatch, &[DiffLine])>,
    pub undo_last_discard: PathAction,
}

impl WorkspaceActions {
    /// Actions that only log what was requested.
    pub fn logged() -> Self {
        Self {
            repo_refresh: Rc::new(|| debug!("repository refresh requested")),
            surface_file: Rc::new(|path: &str| debug!("surface file requested for {path}")),
            dive_into_file_patch: Rc::new(|path: &str, status: &StagingStatus| {
                debug!("dive into {status} patch requested for {path}")
            }),
            quietly_select_item: Rc::new(|path: &str, status: &StagingStatus| {
                debug!("quiet selection of {status} item requested for {path}")
            }),
            open_files: Rc::new(|paths: &[String]| {
                debug!("open requested for {} files", paths.len())
            }),
            discard_lines: Rc::new(|patch: &FilePatch, lines: &[DiffLine]| {
                debug!(
                    "discard of {} lines requested for {}",
                    lines.len(),
                    patch.file_path
                )
            }),
            undo_last_discard: Rc::new(|path: &str| {
                debug!("undo last discard requested for {path}")
            }),
        }
    }
}

struct LoggedCommands;

impl CommandDispatch for LoggedCommands {
    fn dispatch(&self, command: &str) -> bool {
        debug!("dispatching command {command}");
        false
    }
}

struct LoggedTooltips;

impl TooltipService for LoggedTooltips {
    fn show(&self, target: ElementId, text: &str) {
        debug!("tooltip on {target}: {text}");
    }
}

/// Read-only host context forwarded to the view layer.
#[derive(Clone)]
pub struct RootContext {
    pub active_working_directory: Option<PathBuf>,
    pub commands: Rc<dyn CommandDispatch>,
    pub tooltips: Rc<dyn TooltipService>,
    pub switchboard: Switchboard,
    pub actions: WorkspaceActions,
}

impl RootContext {
    /// Context with logging stand-ins for every host service.
    pub fn standalone(active_working_directory: Option<PathBuf>) -> Self {
        Self {
            active_working_directory,
            commands: Rc::new(LoggedCommands),
            tooltips: Rc::new(LoggedTooltips),
            switchboard: Rc::new(Emitter::new()),
            actions: WorkspaceActions::logged(),
        }
    }
}

pub struct WorkspaceRoot {
    repository: RefCell<Option<Rc<dyn Repository>>>,
    context: RootContext,
}

impl WorkspaceRoot {
    pub fn new(context: RootContext) -> Self {
        Self {
            repository: RefCell::new(None),
            context,
        }
    }

    pub fn with_repository(context: RootContext, repository: Rc<dyn Repository>) -> Self {
        let root = Self::new(context);
        root.set_repository(Some(repository));
        root
    }

    pub fn set_repository(&self, repository: Option<Rc<dyn Repository>>) {
        *self.repository.borrow_mut() = repository;
    }
}

impl RootController for WorkspaceRoot {
    fn repository(&self) -> Option<Rc<dyn Repository>> {
        self.repository.borrow().clone()
    }

    fn context(&self) -> RootContext {
        self.context.clone()
    }
}
