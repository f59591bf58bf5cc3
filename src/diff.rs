#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Context,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub text: String,
}

impl DiffLine {
    fn new(
        kind: DiffLineKind,
        old_line: Option<u32>,
        new_line: Option<u32>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            old_line,
            new_line,
            text: text.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self.kind, DiffLineKind::Context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub header: String,
    pub old_start: u32,
    pub new_start: u32,
    pub lines: Vec<DiffLine>,
}

/// Diff data for one file, as handed to the view layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub file_path: String,
    pub header: Vec<String>,
    pub hunks: Vec<DiffHunk>,
}

impl FilePatch {
    pub fn parse(file_path: impl Into<String>, patch: &str) -> Self {
        let mut file_patch = Self {
            file_path: file_path.into(),
            ..Self::default()
        };
        if patch.trim().is_empty() {
            return file_patch;
        }

        let lines = patch.lines().collect::<Vec<_>>();
        let mut ix = 0_usize;

        while ix < lines.len() {
            let line = lines[ix];
            ix += 1;

            if !line.starts_with("@@") {
                if file_patch.hunks.is_empty() {
                    file_patch.header.push(line.to_string());
                }
                continue;
            }

            let (old_start, new_start) = parse_hunk_header(line).unwrap_or((0, 0));
            let mut old_line = old_start;
            let mut new_line = new_start;
            let mut hunk_lines = Vec::new();

            while ix < lines.len() {
                let hunk_line = lines[ix];
                if hunk_line.starts_with("@@") || hunk_line.starts_with("diff --git") {
                    break;
                }
                ix += 1;

                let Some(marker) = hunk_line.chars().next() else {
                    continue;
                };
                let text = &hunk_line[marker.len_utf8()..];
                match marker {
                    ' ' => {
                        hunk_lines.push(DiffLine::new(
                            DiffLineKind::Context,
                            Some(old_line),
                            Some(new_line),
                            text,
                        ));
                        old_line = old_line.saturating_add(1);
                        new_line = new_line.saturating_add(1);
                    }
                    '-' => {
                        hunk_lines.push(DiffLine::new(
                            DiffLineKind::Removed,
                            Some(old_line),
                            None,
                            text,
                        ));
                        old_line = old_line.saturating_add(1);
                    }
                    '+' => {
                        hunk_lines.push(DiffLine::new(
                            DiffLineKind::Added,
                            None,
                            Some(new_line),
                            text,
                        ));
                        new_line = new_line.saturating_add(1);
                    }
                    // "\ No newline at end of file" and friends.
                    _ => {}
                }
            }

            file_patch.hunks.push(DiffHunk {
                header: line.to_string(),
                old_start,
                new_start,
                lines: hunk_lines,
            });
        }

        file_patch
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn changed_line_count(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|hunk| hunk.lines.iter())
            .filter(|line| line.is_change())
            .count()
    }

    /// Index of the hunk that best matches a new-side line number hint: the
    /// hunk containing it, else the last hunk starting before it.
    pub fn hunk_index_for_line(&self, line_number: u32) -> Option<usize> {
        let containing = self.hunks.iter().position(|hunk| {
            hunk.lines
                .iter()
                .any(|line| line.new_line == Some(line_number))
        });
        containing.or_else(|| {
            self.hunks
                .iter()
                .rposition(|hunk| hunk.new_start <= line_number)
        })
    }
}

fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
    let left_marker = line.find('-')?;
    let right_marker = line.find('+')?;

    let left_part = line[left_marker + 1..].split_whitespace().next()?;
    let right_part = line[right_marker + 1..].split_whitespace().next()?;

    Some((parse_range_start(left_part)?, parse_range_start(right_part)?))
}

fn parse_range_start(range: &str) -> Option<u32> {
    range.split(',').next()?.parse::<u32>().ok()
}
