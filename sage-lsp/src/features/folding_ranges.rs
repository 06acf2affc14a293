//! Folding ranges derived from indentation and a few line-shape heuristics.

use lsp_types::FoldingRangeKind;

/// A foldable region; start and end are line numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct SageFoldingRange {
    pub start_line: u32,
    pub end_line: u32,
    pub kind: FoldingRangeKind,
}

/// Line prefixes that open an indentation-delimited block.
const BLOCK_HEADERS: &[&str] = &[
    "def ",
    "async def ",
    "class ",
    "if ",
    "elif ",
    "else:",
    "for ",
    "while ",
    "try:",
    "except",
    "finally:",
    "with ",
];

/// Computes folding ranges for the document.
///
/// Blocks are tracked on a stack keyed by indentation and closed at the first
/// line that dedents to or below their header. Comment runs fold as comments,
/// and an unbalanced triple quote folds to the line holding its closer.
pub fn folding_ranges<S: AsRef<str>>(lines: &[S]) -> Vec<SageFoldingRange> {
    let mut ranges = Vec::new();
    let mut block_stack: Vec<(usize, usize)> = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.as_ref();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        // Comment lines neither open nor close indentation blocks.
        if !trimmed.starts_with('#') {
            while let Some(&(start_line, block_indent)) = block_stack.last() {
                if indent > block_indent {
                    break;
                }
                block_stack.pop();
                if i - start_line > 1 {
                    ranges.push(SageFoldingRange {
                        start_line: start_line as u32,
                        end_line: (i - 1) as u32,
                        kind: FoldingRangeKind::Region,
                    });
                }
            }
        }

        if BLOCK_HEADERS.iter().any(|header| trimmed.starts_with(header)) {
            block_stack.push((i, indent));
        } else if trimmed.starts_with('#') {
            if comment_run_starts_here(lines, i) {
                let end = comment_run_end(lines, i);
                if end > i {
                    ranges.push(SageFoldingRange {
                        start_line: i as u32,
                        end_line: end as u32,
                        kind: FoldingRangeKind::Comment,
                    });
                }
            }
        } else if let Some(quote) = block_quote_opened(trimmed) {
            for (j, follower) in lines.iter().enumerate().skip(i + 1) {
                if follower.as_ref().contains(quote) {
                    ranges.push(SageFoldingRange {
                        start_line: i as u32,
                        end_line: j as u32,
                        kind: FoldingRangeKind::Region,
                    });
                    break;
                }
            }
        }
    }

    // Blocks still open at end of document close on the last line.
    let last_line = lines.len().saturating_sub(1);
    while let Some((start_line, _)) = block_stack.pop() {
        if last_line > start_line + 1 {
            ranges.push(SageFoldingRange {
                start_line: start_line as u32,
                end_line: last_line as u32,
                kind: FoldingRangeKind::Region,
            });
        }
    }

    ranges
}

fn is_comment_line<S: AsRef<str>>(lines: &[S], i: usize) -> bool {
    lines
        .get(i)
        .map(|line| line.as_ref().trim().starts_with('#'))
        .unwrap_or(false)
}

/// A comment run folds once, from its first line.
fn comment_run_starts_here<S: AsRef<str>>(lines: &[S], i: usize) -> bool {
    (i == 0 || !is_comment_line(lines, i - 1)) && is_comment_line(lines, i + 1)
}

fn comment_run_end<S: AsRef<str>>(lines: &[S], start: usize) -> usize {
    let mut end = start;
    while is_comment_line(lines, end + 1) {
        end += 1;
    }
    end
}

/// Returns the quote kind when the line opens a triple-quoted string without
/// closing it.
fn block_quote_opened(trimmed: &str) -> Option<&'static str> {
    for quote in ["\"\"\"", "'''"] {
        if trimmed.contains(quote) {
            return (trimmed.matches(quote).count() == 1).then_some(quote);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<&str> {
        source.lines().collect()
    }

    #[test]
    fn function_block_folds_to_its_last_body_line() {
        let source = "def f():\n    a = 1\n    b = 2\nx = 3";
        let ranges = folding_ranges(&lines(source));
        assert_eq!(
            ranges,
            vec![SageFoldingRange {
                start_line: 0,
                end_line: 2,
                kind: FoldingRangeKind::Region
            }]
        );
    }

    #[test]
    fn nested_blocks_fold_independently() {
        let source = "class C:\n    def m(self):\n        a = 1\n        b = 2\n    n = 0\nx = 1";
        let ranges = folding_ranges(&lines(source));
        assert!(ranges.contains(&SageFoldingRange {
            start_line: 1,
            end_line: 3,
            kind: FoldingRangeKind::Region
        }));
        assert!(ranges.contains(&SageFoldingRange {
            start_line: 0,
            end_line: 4,
            kind: FoldingRangeKind::Region
        }));
    }

    #[test]
    fn block_open_at_end_of_document_closes_on_last_line() {
        let source = "for i in range(3):\n    a = i\n    b = i";
        let ranges = folding_ranges(&lines(source));
        assert_eq!(
            ranges,
            vec![SageFoldingRange {
                start_line: 0,
                end_line: 2,
                kind: FoldingRangeKind::Region
            }]
        );
    }

    #[test]
    fn empty_block_produces_no_fold() {
        let source = "if x:\ny = 1";
        let ranges = folding_ranges(&lines(source));
        assert!(ranges.is_empty());
    }

    #[test]
    fn comment_runs_fold_once_as_comments() {
        let source = "# one\n# two\n# three\nx = 1";
        let ranges = folding_ranges(&lines(source));
        assert_eq!(
            ranges,
            vec![SageFoldingRange {
                start_line: 0,
                end_line: 2,
                kind: FoldingRangeKind::Comment
            }]
        );
    }

    #[test]
    fn single_comment_line_does_not_fold() {
        let ranges = folding_ranges(&lines("# alone\nx = 1"));
        assert!(ranges.is_empty());
    }

    #[test]
    fn unclosed_triple_quote_folds_to_closer() {
        let source = "doc = \"\"\"start\nmiddle\nend\"\"\"\nx = 1";
        let ranges = folding_ranges(&lines(source));
        assert_eq!(
            ranges,
            vec![SageFoldingRange {
                start_line: 0,
                end_line: 2,
                kind: FoldingRangeKind::Region
            }]
        );
    }

    #[test]
    fn comment_lines_do_not_close_blocks() {
        let source = "def f():\n    a = 1\n# note\n    b = 2\nx = 1";
        let ranges = folding_ranges(&lines(source));
        assert_eq!(
            ranges,
            vec![SageFoldingRange {
                start_line: 0,
                end_line: 3,
                kind: FoldingRangeKind::Region
            }]
        );
    }
}
