//! The file patch pane item: a staged or unstaged diff of one file.
//!
//! Construction is synchronous and never fails. It allocates the item's
//! element and spawns the assembly, which queries the repository, builds
//! [`FilePatchProps`] and hands them to the presenter for mounting. The
//! assembly runs once; failures are reported through [`FilePatchItem::assembly`]
//! and leave the element empty.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::FutureExt as _;
use futures::future::{self, LocalBoxFuture, Shared};
use futures::task::{LocalSpawn, LocalSpawnExt as _};
use tracing::{debug, error, info, warn};

use crate::diff::FilePatch;
use crate::events::{Emitter, Subscription};
use crate::pane::{PaneElement, PaneItem, PatchPresenter, SerializedItem};
use crate::root::{PatchOptions, Repository, RootContext, RootController};
use crate::uri::{FilePatchDescriptor, StagingStatus, parse_file_patch_uri};

pub const FILE_PATCH_DESERIALIZER: &str = "FilePatchItem";

pub type AssemblyTask = Shared<LocalBoxFuture<'static, Result<(), AssemblyError>>>;

/// Everything an item needs from its host, passed in explicitly.
#[derive(Clone)]
pub struct ItemDeps {
    pub root: Rc<dyn RootController>,
    pub presenter: Rc<dyn PatchPresenter>,
    pub spawner: Rc<dyn LocalSpawn>,
}

/// Props handed to the view layer once assembly completes.
pub struct FilePatchProps {
    pub file_patch: FilePatch,
    pub staging_status: StagingStatus,
    pub is_amending: bool,
    pub is_partially_staged: bool,
    pub repository: Rc<dyn Repository>,
    pub line_number: Option<u32>,
    pub activate: bool,
    pub context: RootContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Assembling,
    Ready,
    Failed,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEvent {
    DidDestroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryQuery {
    PartialStaging,
    FilePatch,
}

impl fmt::Display for RepositoryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartialStaging => f.write_str("partial staging state"),
            Self::FilePatch => f.write_str("file patch"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AssemblyError {
    #[error("no repository is available to load {file_path}")]
    RepositoryUnavailable { file_path: String },
    #[error("failed to load {query} for {file_path}: {error:#}")]
    Query {
        query: RepositoryQuery,
        file_path: String,
        error: Rc<anyhow::Error>,
    },
    #[error("failed to mount file patch view for {file_path}: {error:#}")]
    Mount {
        file_path: String,
        error: Rc<anyhow::Error>,
    },
    #[error("failed to schedule assembly for {file_path}: {message}")]
    Spawn { file_path: String, message: String },
}

enum ItemState {
    Assembling,
    Ready(Rc<FilePatchProps>),
    Failed(AssemblyError),
    Destroyed,
}

struct ItemInner {
    epoch: Cell<usize>,
    state: RefCell<ItemState>,
    element: Rc<PaneElement>,
    emitter: Emitter<ItemEvent>,
}

pub struct FilePatchItem {
    uri: String,
    descriptor: FilePatchDescriptor,
    title: String,
    inner: Rc<ItemInner>,
    assembly: AssemblyTask,
}

impl FilePatchItem {
    /// Builds an item when `uri` is a file patch locator.
    pub fn opener(uri: &str, deps: &ItemDeps) -> Option<Self> {
        let descriptor = parse_file_patch_uri(uri)?;
        Some(Self::create(descriptor, uri, deps))
    }

    pub fn create(
        descriptor: FilePatchDescriptor,
        uri: impl Into<String>,
        deps: &ItemDeps,
    ) -> Self {
        let uri = uri.into();
        let title = title_for(&descriptor);
        let inner = Rc::new(ItemInner {
            epoch: Cell::new(0),
            state: RefCell::new(ItemState::Assembling),
            element: Rc::new(PaneElement::new()),
            emitter: Emitter::new(),
        });
        debug!("opening {title} from {uri}");

        let mut assembly = assemble(
            Rc::downgrade(&inner),
            inner.epoch.get(),
            descriptor.clone(),
            deps.root.clone(),
            deps.presenter.clone(),
        )
        .boxed_local()
        .shared();

        if let Err(err) = deps.spawner.spawn_local(assembly.clone().map(|_| ())) {
            let err = AssemblyError::Spawn {
                file_path: descriptor.file_path.clone(),
                message: err.to_string(),
            };
            error!("{err}");
            *inner.state.borrow_mut() = ItemState::Failed(err.clone());
            assembly = future::ready(Err(err)).boxed_local().shared();
        }

        Self {
            uri,
            descriptor,
            title,
            inner,
            assembly,
        }
    }

    pub fn descriptor(&self) -> &FilePatchDescriptor {
        &self.descriptor
    }

    /// Resolves when assembly finishes. Awaiting it never restarts the work.
    pub fn assembly(&self) -> AssemblyTask {
        self.assembly.clone()
    }

    pub fn state(&self) -> AssemblyState {
        match &*self.inner.state.borrow() {
            ItemState::Assembling => AssemblyState::Assembling,
            ItemState::Ready(_) => AssemblyState::Ready,
            ItemState::Failed(_) => AssemblyState::Failed,
            ItemState::Destroyed => AssemblyState::Destroyed,
        }
    }

    pub fn props(&self) -> Option<Rc<FilePatchProps>> {
        match &*self.inner.state.borrow() {
            ItemState::Ready(props) => Some(props.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<AssemblyError> {
        match &*self.inner.state.borrow() {
            ItemState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    pub fn on_did_destroy(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.emitter.subscribe(move |event| match event {
            ItemEvent::DidDestroy => callback(),
        })
    }

    fn next_epoch(&self) -> usize {
        let epoch = self.inner.epoch.get().saturating_add(1);
        self.inner.epoch.set(epoch);
        epoch
    }
}

impl PaneItem for FilePatchItem {
    fn element(&self) -> Rc<PaneElement> {
        self.inner.element.clone()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn serialize(&self) -> SerializedItem {
        SerializedItem {
            uri: self.uri.clone(),
            deserializer: FILE_PATCH_DESERIALIZER.to_string(),
        }
    }

    fn destroy(&self) {
        let previous = self.inner.state.replace(ItemState::Destroyed);
        if matches!(previous, ItemState::Destroyed) {
            warn!("{} was already destroyed", self.title);
            return;
        }

        // Any assembly still in flight sees a newer epoch and skips the mount.
        self.next_epoch();
        self.inner.emitter.emit(&ItemEvent::DidDestroy);
        self.inner.emitter.dispose();
        if !self.inner.element.unmount() {
            debug!("{} destroyed before anything was mounted", self.title);
        }
    }
}

pub fn title_for(descriptor: &FilePatchDescriptor) -> String {
    let prefix = if descriptor.staging_status.is_staged() {
        "Staged"
    } else {
        "Unstaged"
    };
    format!("{prefix} Changes: {}", descriptor.file_path)
}

async fn assemble(
    inner: Weak<ItemInner>,
    epoch: usize,
    descriptor: FilePatchDescriptor,
    root: Rc<dyn RootController>,
    presenter: Rc<dyn PatchPresenter>,
) -> Result<(), AssemblyError> {
    let result = load_props(&descriptor, root.as_ref()).await;

    let Some(inner) = inner.upgrade() else {
        debug!(
            "item for {} was dropped before assembly finished",
            descriptor.file_path
        );
        return Ok(());
    };
    if epoch != inner.epoch.get() {
        debug!(
            "discarding stale assembly for {} ({} patch)",
            descriptor.file_path, descriptor.staging_status
        );
        return Ok(());
    }

    let props = match result {
        Ok(props) => Rc::new(props),
        Err(err) => {
            error!("{err}");
            *inner.state.borrow_mut() = ItemState::Failed(err.clone());
            return Err(err);
        }
    };

    *inner.state.borrow_mut() = ItemState::Ready(props.clone());
    match presenter.mount(&inner.element, props) {
        Ok(view) => {
            inner.element.mount(view);
            info!(
                "mounted {} patch for {} into {}",
                descriptor.staging_status,
                descriptor.file_path,
                inner.element.id()
            );
            Ok(())
        }
        Err(error) => {
            let err = AssemblyError::Mount {
                file_path: descriptor.file_path.clone(),
                error: Rc::new(error),
            };
            error!("{err}");
            *inner.state.borrow_mut() = ItemState::Failed(err.clone());
            Err(err)
        }
    }
}

async fn load_props(
    descriptor: &FilePatchDescriptor,
    root: &dyn RootController,
) -> Result<FilePatchProps, AssemblyError> {
    let file_path = descriptor.file_path.as_str();
    let repository = root
        .repository()
        .ok_or_else(|| AssemblyError::RepositoryUnavailable {
            file_path: file_path.to_string(),
        })?;

    let staged = descriptor.staging_status.is_staged();
    let options = PatchOptions {
        staged,
        amending: staged && descriptor.amending,
    };

    let partially_staged = async {
        repository
            .is_partially_staged(file_path)
            .await
            .map_err(|error| query_error(RepositoryQuery::PartialStaging, file_path, error))
    };
    let file_patch = async {
        repository
            .file_patch_for_path(file_path, options)
            .await
            .map_err(|error| query_error(RepositoryQuery::FilePatch, file_path, error))
    };
    let (is_partially_staged, file_patch) = futures::try_join!(partially_staged, file_patch)?;

    Ok(FilePatchProps {
        file_patch,
        staging_status: descriptor.staging_status.clone(),
        is_amending: descriptor.amending,
        is_partially_staged,
        repository,
        line_number: descriptor.line_number,
        activate: descriptor.activate,
        context: root.context(),
    })
}

fn query_error(query: RepositoryQuery, file_path: &str, error: anyhow::Error) -> AssemblyError {
    AssemblyError::Query {
        query,
        file_path: file_path.to_string(),
        error: Rc::new(error),
    }
}
