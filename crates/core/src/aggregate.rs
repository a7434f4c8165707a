//! Result aggregator: turns candidates and their bodies into ordered
//! [`DefinitionRecord`]s with parent links, then checks the structural
//! invariants of the finished list.

use crate::error::ScanError;
use crate::matcher::{collapse_whitespace, Candidate};
use crate::metadata;
use crate::profile::SourceProfile;
use crate::scrub::MaskedText;
use crate::span::{LineIndex, Span};
use crate::types::{DefinitionKind, DefinitionRecord};

/// Build records in source order. `bodies` is parallel to `candidates`.
pub fn build_records(
    source: &[u8],
    masked: &MaskedText,
    index: &LineIndex,
    profile: &SourceProfile,
    candidates: &[Candidate],
    bodies: &[Option<Span>],
) -> Vec<DefinitionRecord> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&i| candidates[i].signature_start);

    let mut records: Vec<DefinitionRecord> = Vec::with_capacity(candidates.len());
    // records whose body may still contain later signatures
    let mut open: Vec<usize> = Vec::new();

    for i in order {
        let candidate = &candidates[i];
        let body = bodies.get(i).copied().flatten();
        let start = candidate.signature_start;

        while let Some(&top) = open.last() {
            let contains = records[top].body_span.is_some_and(|b| b.start <= start && start < b.end);
            if contains {
                break;
            }
            open.pop();
        }

        let parent = open.last().copied();
        let depth = parent.map_or(0, |p| records[p].depth + 1);
        let kind = match (candidate.kind, parent) {
            (DefinitionKind::Function, Some(p)) if records[p].kind.holds_members() => {
                DefinitionKind::Method
            }
            (kind, _) => kind,
        };

        let signature_span = Span::new(start, candidate.signature_end, index);
        let end_line = body
            .map(|b| b.end_line(index))
            .unwrap_or(0)
            .max(signature_span.end_line(index));
        let meta = metadata::extract(source, masked, index, profile, candidate, body);

        records.push(DefinitionRecord {
            kind,
            name: candidate.name.clone(),
            signature_span,
            body_span: body,
            depth,
            parent,
            start_line: signature_span.line,
            end_line,
            signature: collapse_whitespace(&source[start..candidate.signature_end]),
            parameters: meta.parameters,
            decorators: meta.decorators,
            doc: meta.doc,
            doc_tags: meta.doc_tags,
        });

        if body.is_some_and(|b| !b.is_empty()) {
            open.push(records.len() - 1);
        }
    }

    records
}

/// Structural checks on a finished scan. A failure here is a scanner bug,
/// never a property of the input.
pub fn validate(
    records: &[DefinitionRecord],
    source_len: usize,
    masked_len: usize,
) -> Result<(), ScanError> {
    if masked_len != source_len {
        return Err(ScanError::InvariantViolation {
            invariant: "masked_length",
            detail: format!("masked text is {masked_len} bytes, source is {source_len}"),
        });
    }

    for (i, record) in records.iter().enumerate() {
        let spans = std::iter::once(record.signature_span).chain(record.body_span);
        for span in spans {
            if span.start > span.end || span.end > source_len {
                return Err(ScanError::InvariantViolation {
                    invariant: "span_in_bounds",
                    detail: format!(
                        "record {i} ('{}') has span {}..{} outside 0..{source_len}",
                        record.name, span.start, span.end
                    ),
                });
            }
        }

        if let Some(parent) = record.parent {
            if parent >= i {
                return Err(ScanError::InvariantViolation {
                    invariant: "parent_precedes_child",
                    detail: format!("record {i} ('{}') has parent {parent}", record.name),
                });
            }
            if record.depth <= records[parent].depth {
                return Err(ScanError::InvariantViolation {
                    invariant: "depth_increases",
                    detail: format!(
                        "record {i} ('{}') has depth {} under parent depth {}",
                        record.name, record.depth, records[parent].depth
                    ),
                });
            }
        } else if record.depth != 0 {
            return Err(ScanError::InvariantViolation {
                invariant: "depth_increases",
                detail: format!("top-level record {i} ('{}') has depth {}", record.name, record.depth),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::resolve_bodies;
    use crate::config::ProfileTunables;
    use crate::diagnostics::Diagnostics;
    use crate::matcher::find_candidates;
    use crate::profile::{ProfileId, ProfileSet};
    use crate::scrub::mask;

    fn records(src: &str, id: ProfileId) -> Vec<DefinitionRecord> {
        let profile = ProfileSet::builtin().get(id);
        let tunables = ProfileTunables::default();
        let index = LineIndex::new(src.as_bytes());
        let mut diags = Diagnostics::new();
        let masked = mask(src.as_bytes(), &profile.lexical, &index, &mut diags);
        let found = find_candidates(&masked, &index, profile, tunables, &mut diags);
        let bodies =
            resolve_bodies(masked.as_bytes(), &index, profile.block_style, tunables, &found, &mut diags);
        let out = build_records(src.as_bytes(), &masked, &index, profile, &found, &bodies);
        validate(&out, src.len(), masked.len()).expect("invariants hold");
        out
    }

    #[test]
    fn test_parents_depths_and_method_promotion() {
        let src = "class Outer:\n    def a(self):\n        def inner():\n            pass\n    class Inner:\n        def b(self):\n            pass\ndef free():\n    pass\n";
        let out = records(src, ProfileId::Python);
        let summary: Vec<(&str, DefinitionKind, usize, Option<usize>)> =
            out.iter().map(|r| (r.name.as_str(), r.kind, r.depth, r.parent)).collect();
        assert_eq!(
            summary,
            vec![
                ("Outer", DefinitionKind::Class, 0, None),
                ("a", DefinitionKind::Method, 1, Some(0)),
                ("inner", DefinitionKind::Function, 2, Some(1)),
                ("Inner", DefinitionKind::Class, 1, Some(0)),
                ("b", DefinitionKind::Method, 2, Some(3)),
                ("free", DefinitionKind::Function, 0, None),
            ]
        );
    }

    #[test]
    fn test_lines_and_signature_text() {
        let src = "impl Point {\n    pub fn new(x: i32,\n               y: i32) -> Self {\n        Point { x, y }\n    }\n}\n";
        let out = records(src, ProfileId::Rust);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].start_line, out[0].end_line), (1, 6));
        assert_eq!((out[1].start_line, out[1].end_line), (2, 5));
        assert_eq!(out[1].kind, DefinitionKind::Method);
        assert_eq!(out[1].signature, "pub fn new(x: i32, y: i32) -> Self");
        assert_eq!(out[1].parameters.as_deref(), Some("x: i32, y: i32"));
    }

    #[test]
    fn test_siblings_after_closed_body_are_top_level() {
        let src = "fn a() {\n}\nfn b() {\n    fn c() {}\n}\n";
        let out = records(src, ProfileId::Rust);
        let parents: Vec<Option<usize>> = out.iter().map(|r| r.parent).collect();
        assert_eq!(parents, vec![None, None, Some(1)]);
    }

    #[test]
    fn test_validate_rejects_broken_links() {
        let src = "fn a() {}\n";
        let mut out = records(src, ProfileId::Rust);
        out[0].parent = Some(0);
        out[0].depth = 1;
        assert!(matches!(
            validate(&out, src.len(), src.len()),
            Err(ScanError::InvariantViolation { invariant: "parent_precedes_child", .. })
        ));
        assert!(matches!(
            validate(&[], 3, 2),
            Err(ScanError::InvariantViolation { invariant: "masked_length", .. })
        ));
    }
}
