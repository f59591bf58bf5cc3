use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::item::FilePatchProps;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// What the host's pane system needs from any item it displays.
pub trait PaneItem {
    fn element(&self) -> Rc<PaneElement>;
    fn title(&self) -> &str;
    fn uri(&self) -> &str;
    fn serialize(&self) -> SerializedItem;
    fn destroy(&self);
}

/// Session record the host persists for an item and hands back on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedItem {
    pub uri: String,
    pub deserializer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element-{}", self.0)
    }
}

/// A mounted view. The owning element unmounts it at the latest when the
/// element itself is dropped.
pub trait MountedView {
    fn unmount(self: Box<Self>);
}

/// The view layer: turns assembled props into something shown in an element.
pub trait PatchPresenter {
    fn mount(
        &self,
        element: &PaneElement,
        props: Rc<FilePatchProps>,
    ) -> Result<Box<dyn MountedView>>;
}

/// Display surface owned by exactly one pane item.
pub struct PaneElement {
    id: ElementId,
    mounted: RefCell<Option<Box<dyn MountedView>>>,
}

impl PaneElement {
    pub fn new() -> Self {
        Self {
            id: ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed)),
            mounted: RefCell::new(None),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.borrow().is_none()
    }

    /// Replaces whatever was mounted before, unmounting it first.
    pub fn mount(&self, view: Box<dyn MountedView>) {
        let previous = self.mounted.replace(Some(view));
        if let Some(previous) = previous {
            previous.unmount();
        }
    }

    /// Returns false when nothing was mounted.
    pub fn unmount(&self) -> bool {
        let mounted = self.mounted.borrow_mut().take();
        match mounted {
            Some(view) => {
                view.unmount();
                true
            }
            None => false,
        }
    }
}

impl Drop for PaneElement {
    fn drop(&mut self) {
        if let Some(view) = self.mounted.get_mut().take() {
            view.unmount();
        }
    }
}

impl Default for PaneElement {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PaneElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneElement")
            .field("id", &self.id)
            .field("mounted", &!self.is_empty())
            .finish()
    }
}
