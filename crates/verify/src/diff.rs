//! Line-oriented text diff
//!
//! A longest-common-subsequence diff with unified-style hunks. Kept in-tree
//! because the output only feeds human-readable drift reports; no byte-exact
//! compatibility with external diff tools is promised.

/// Lines of context kept around each change when building hunks
const CONTEXT: usize = 3;

/// A computed diff between two texts
#[derive(Debug, Clone)]
pub struct TextDiff {
    pub hunks: Vec<DiffHunk>,
}

/// One hunk of changes with surrounding context
#[derive(Debug, Clone)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// A single diff line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Remove,
    Add,
}

impl TextDiff {
    /// Compute the diff between two texts
    #[must_use]
    pub fn compute(old: &str, new: &str) -> Self {
        let old_lines: Vec<&str> = old.lines().collect();
        let new_lines: Vec<&str> = new.lines().collect();

        let ops = edit_script(&old_lines, &new_lines);
        let hunks = build_hunks(&old_lines, &new_lines, &ops);
        Self { hunks }
    }

    /// True when any line was added or removed
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.hunks.iter().any(|h| {
            h.lines
                .iter()
                .any(|l| matches!(l, DiffLine::Added(_) | DiffLine::Removed(_)))
        })
    }

    /// Format as a unified diff body (`@@` headers plus prefixed lines)
    #[must_use]
    pub fn format_unified(&self) -> String {
        use std::fmt::Write as _;

        let mut output = String::new();
        for hunk in &self.hunks {
            let _ = writeln!(
                output,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );

            for line in &hunk.lines {
                match line {
                    DiffLine::Context(s) => {
                        let _ = writeln!(output, " {s}");
                    }
                    DiffLine::Added(s) => {
                        let _ = writeln!(output, "+{s}");
                    }
                    DiffLine::Removed(s) => {
                        let _ = writeln!(output, "-{s}");
                    }
                }
            }
        }

        output
    }
}

/// Line-by-line edit script via a longest-common-subsequence table
fn edit_script(old: &[&str], new: &[&str]) -> Vec<Op> {
    let n = old.len();
    let m = new.len();

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Op::Remove);
            i += 1;
        } else {
            ops.push(Op::Add);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat(Op::Remove).take(n - i));
    ops.extend(std::iter::repeat(Op::Add).take(m - j));
    ops
}

/// Group the edit script into hunks, merging changes whose context would
/// overlap
fn build_hunks(old: &[&str], new: &[&str], ops: &[Op]) -> Vec<DiffHunk> {
    // (old index, new index) before each op is applied
    let mut positions = Vec::with_capacity(ops.len());
    let (mut oi, mut nj) = (0usize, 0usize);
    for op in ops {
        positions.push((oi, nj));
        match op {
            Op::Equal => {
                oi += 1;
                nj += 1;
            }
            Op::Remove => oi += 1,
            Op::Add => nj += 1,
        }
    }

    let mut hunks = Vec::new();
    let mut k = 0;

    while k < ops.len() {
        if ops[k] == Op::Equal {
            k += 1;
            continue;
        }

        // Extend the cluster while equal runs between changes fit inside
        // two context windows
        let mut last_change = k;
        let mut scan = k + 1;
        while scan < ops.len() {
            if ops[scan] != Op::Equal {
                last_change = scan;
                scan += 1;
                continue;
            }
            let run_start = scan;
            while scan < ops.len() && ops[scan] == Op::Equal {
                scan += 1;
            }
            if scan < ops.len() && scan - run_start <= 2 * CONTEXT {
                continue;
            }
            break;
        }

        // Clusters are separated by more than 2*CONTEXT equal ops, so the
        // windows below never overlap a neighboring hunk
        let lead = leading_equals(ops, k).min(CONTEXT);
        let slice_start = k - lead;
        let trail = trailing_equals(ops, last_change + 1).min(CONTEXT);
        let slice_end = last_change + 1 + trail;

        hunks.push(make_hunk(
            old,
            new,
            &ops[slice_start..slice_end],
            &positions[slice_start..slice_end],
        ));
        k = slice_end;
    }

    hunks
}

fn leading_equals(ops: &[Op], end: usize) -> usize {
    ops[..end].iter().rev().take_while(|op| **op == Op::Equal).count()
}

fn trailing_equals(ops: &[Op], start: usize) -> usize {
    ops[start..].iter().take_while(|op| **op == Op::Equal).count()
}

fn make_hunk(old: &[&str], new: &[&str], ops: &[Op], positions: &[(usize, usize)]) -> DiffHunk {
    let (old_first, new_first) = positions[0];
    let mut lines = Vec::with_capacity(ops.len());
    let mut old_count = 0;
    let mut new_count = 0;

    for (op, (oi, nj)) in ops.iter().zip(positions) {
        match op {
            Op::Equal => {
                lines.push(DiffLine::Context(old[*oi].to_string()));
                old_count += 1;
                new_count += 1;
            }
            Op::Remove => {
                lines.push(DiffLine::Removed(old[*oi].to_string()));
                old_count += 1;
            }
            Op::Add => {
                lines.push(DiffLine::Added(new[*nj].to_string()));
                new_count += 1;
            }
        }
    }

    // Unified convention: an empty side reports its start as the line
    // before the hunk
    let old_start = if old_count == 0 { old_first } else { old_first + 1 };
    let new_start = if new_count == 0 { new_first } else { new_first + 1 };

    DiffHunk {
        old_start,
        old_count,
        new_start,
        new_count,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_hunks() {
        let diff = TextDiff::compute("a\nb\nc\n", "a\nb\nc\n");
        assert!(diff.hunks.is_empty());
        assert!(!diff.has_changes());
        assert_eq!(diff.format_unified(), "");
    }

    #[test]
    fn test_single_line_change() {
        let diff = TextDiff::compute("a\nb\nc\n", "a\nx\nc\n");
        assert!(diff.has_changes());
        assert_eq!(diff.hunks.len(), 1);

        let unified = diff.format_unified();
        assert!(unified.contains("@@ -1,3 +1,3 @@"));
        assert!(unified.contains("-b"));
        assert!(unified.contains("+x"));
        assert!(unified.contains(" a"));
        assert!(unified.contains(" c"));
    }

    #[test]
    fn test_insertion_does_not_cascade() {
        // An inserted line must not mark every following line as changed
        let old = "one\ntwo\nthree\nfour\n";
        let new = "one\ninserted\ntwo\nthree\nfour\n";
        let diff = TextDiff::compute(old, new);

        let added: Vec<_> = diff
            .hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .collect();
        let removed: Vec<_> = diff
            .hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .collect();

        assert_eq!(added.len(), 1);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_distant_changes_get_separate_hunks() {
        let old: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let mut changed: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        changed[2] = "changed near top".to_string();
        changed[27] = "changed near bottom".to_string();
        let new = changed.join("\n") + "\n";

        let diff = TextDiff::compute(&old, &new);
        assert_eq!(diff.hunks.len(), 2);
    }

    #[test]
    fn test_nearby_changes_share_a_hunk() {
        let old = "a\nb\nc\nd\ne\n";
        let new = "a\nB\nc\nD\ne\n";
        let diff = TextDiff::compute(old, new);
        assert_eq!(diff.hunks.len(), 1);
    }

    #[test]
    fn test_empty_old_side() {
        let diff = TextDiff::compute("", "a\nb\n");
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.old_count, 0);
        assert_eq!(hunk.old_start, 0);
        assert_eq!(hunk.new_start, 1);
        assert_eq!(hunk.new_count, 2);
    }

    #[test]
    fn test_empty_new_side() {
        let diff = TextDiff::compute("a\n", "");
        let unified = diff.format_unified();
        assert!(unified.contains("-a"));
        assert!(!unified.contains("+a"));
    }

    #[test]
    fn test_context_window_is_limited() {
        let old: String = (0..20).map(|i| format!("ctx {i}\n")).collect();
        let mut lines: Vec<String> = (0..20).map(|i| format!("ctx {i}")).collect();
        lines[10] = "edited".to_string();
        let new = lines.join("\n") + "\n";

        let diff = TextDiff::compute(&old, &new);
        assert_eq!(diff.hunks.len(), 1);
        // 3 context before + removed + added + 3 context after
        assert_eq!(diff.hunks[0].lines.len(), 8);
        assert_eq!(diff.hunks[0].old_start, 8);
    }
}
