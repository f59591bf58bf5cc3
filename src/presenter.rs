use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;

use crate::diff::{DiffLine, DiffLineKind, FilePatch};
use crate::item::FilePatchProps;
use crate::pane::{ElementId, MountedView, PaneElement, PatchPresenter};

type RenderedViews = Rc<RefCell<BTreeMap<ElementId, Vec<String>>>>;

/// Presenter that renders a file patch as plain text lines, one buffer per
/// mounted element.
#[derive(Clone, Default)]
pub struct TextPresenter {
    views: RenderedViews,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self, element: ElementId) -> Option<Vec<String>> {
        self.views.borrow().get(&element).cloned()
    }

    pub fn mounted_count(&self) -> usize {
        self.views.borrow().len()
    }
}

impl PatchPresenter for TextPresenter {
    fn mount(
        &self,
        element: &PaneElement,
        props: Rc<FilePatchProps>,
    ) -> Result<Box<dyn MountedView>> {
        let lines = render_lines(&props);
        self.views.borrow_mut().insert(element.id(), lines);
        Ok(Box::new(TextView {
            element: element.id(),
            views: self.views.clone(),
        }))
    }
}

struct TextView {
    element: ElementId,
    views: RenderedViews,
}

impl MountedView for TextView {
    fn unmount(self: Box<Self>) {
        self.views.borrow_mut().remove(&self.element);
    }
}

pub fn render_lines(props: &FilePatchProps) -> Vec<String> {
    let patch = &props.file_patch;
    let mut lines = vec![summary_line(props)];

    if patch.is_empty() {
        lines.push("No diff for this file.".to_string());
        return lines;
    }

    let focused_hunk = props
        .line_number
        .and_then(|line_number| patch.hunk_index_for_line(line_number));
    for (hunk_ix, hunk) in patch.hunks.iter().enumerate() {
        let marker = if focused_hunk == Some(hunk_ix) { ">" } else { " " };
        lines.push(format!("{marker} {}", hunk.header));
        lines.extend(hunk.lines.iter().map(render_line));
    }

    lines
}

fn summary_line(props: &FilePatchProps) -> String {
    let patch: &FilePatch = &props.file_patch;
    let mut summary = format!(
        "{} ({}, {} changed lines)",
        patch.file_path,
        props.staging_status,
        patch.changed_line_count()
    );
    if props.is_amending && props.staging_status.is_staged() {
        summary.push_str(" [amending]");
    }
    if props.is_partially_staged {
        summary.push_str(" [partially staged]");
    }
    summary
}

fn render_line(line: &DiffLine) -> String {
    let marker = match line.kind {
        DiffLineKind::Context => ' ',
        DiffLineKind::Added => '+',
        DiffLineKind::Removed => '-',
    };
    format!(
        "{:>5} {:>5} {marker}{}",
        line_number(line.old_line),
        line_number(line.new_line),
        line.text
    )
}

fn line_number(line: Option<u32>) -> String {
    line.map(|line| line.to_string()).unwrap_or_default()
}
