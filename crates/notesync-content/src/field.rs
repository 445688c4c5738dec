//! Field descriptors shared by note parsers and renderers
//!
//! Each descriptor names a record key, its label in the note, how the value
//! is encoded, and what to render when the record has nothing to show. The
//! parser and the renderer both walk these tables, so a field cannot be
//! written one way and read another.

use serde_json::Value;

use crate::markdown::{inline_list, parse_json_list, scalar_text, split_delimited, strip_backticks};
use crate::normalize::{is_placeholder, normalize_str};

/// How a field is encoded in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The record identifier. Rendered, never parsed back.
    Identifier,
    /// Single-line text.
    Text,
    /// Single-line text wrapped in backticks.
    Code,
    /// Integer. Unparseable input keeps the default.
    Integer,
    /// Inline JSON array, with a comma-separated fallback when parsing.
    InlineList,
    /// Free text rendered as one bullet per line and joined back on parse.
    Prose,
    /// A list rendered as one bullet per item.
    Bullets,
}

impl FieldKind {
    /// The value a freshly created record carries for this kind.
    pub fn default_value(self) -> Value {
        match self {
            Self::Integer => Value::from(0),
            Self::InlineList | Self::Bullets => Value::Array(Vec::new()),
            Self::Identifier | Self::Text | Self::Code | Self::Prose => {
                Value::String(String::new())
            }
        }
    }
}

/// Describes one field of a record and its place in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Record key; dotted for fields nested inside a group.
    pub path: &'static str,
    /// Key or bucket label used in the note.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Lines rendered when the record value is empty.
    pub placeholder: &'static [&'static str],
}

impl FieldDescriptor {
    const fn new(
        path: &'static str,
        label: &'static str,
        kind: FieldKind,
        placeholder: &'static [&'static str],
    ) -> Self {
        Self {
            path,
            label,
            kind,
            placeholder,
        }
    }
}

impl FieldDescriptor {
    /// Render a single-line value for a key/value bullet.
    ///
    /// Empty values fall back to the first placeholder line.
    pub fn render_inline(&self, value: Option<&Value>) -> String {
        let fallback = self.placeholder.first().copied().unwrap_or_default();
        match self.kind {
            FieldKind::InlineList => match value {
                Some(Value::Array(items)) => format!("`{}`", inline_list(items)),
                _ => "`[]`".to_string(),
            },
            FieldKind::Code => {
                let text = scalar_text(value);
                if text.is_empty() {
                    format!("`{fallback}`")
                } else {
                    format!("`{text}`")
                }
            }
            _ => {
                let text = match value {
                    Some(Value::Array(items)) => inline_list(items),
                    other => scalar_text(other),
                };
                if text.is_empty() {
                    fallback.to_string()
                } else {
                    text
                }
            }
        }
    }

    /// Render the bullet lines of a bucket, without the `- ` marker.
    ///
    /// Prose yields one line per non-blank line of text, or nothing when the
    /// whole text is a placeholder; lists yield one line per non-placeholder
    /// item. Either falls back to the placeholder lines when nothing is left.
    pub fn render_lines(&self, value: Option<&Value>) -> Vec<String> {
        let lines: Vec<String> = match (self.kind, value) {
            (FieldKind::Prose, Some(Value::String(text))) if normalize_str(text).is_empty() => {
                Vec::new()
            }
            (FieldKind::Prose, Some(Value::String(text))) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            (_, Some(Value::Array(items))) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .filter(|item| !is_placeholder(item))
                .collect(),
            _ => Vec::new(),
        };
        if lines.is_empty() {
            self.placeholder.iter().map(|line| line.to_string()).collect()
        } else {
            lines
        }
    }

    /// Parse a single-line value. `None` leaves the field untouched.
    ///
    /// Lists go through a strict JSON attempt, then a comma split; an empty
    /// value is an empty list. Integers that do not parse are ignored.
    pub fn parse_inline(&self, raw: &str) -> Option<Value> {
        match self.kind {
            FieldKind::InlineList | FieldKind::Bullets => {
                if let Some(items) = parse_json_list(raw) {
                    return Some(Value::Array(items));
                }
                let text = strip_backticks(raw);
                if text.is_empty() {
                    return Some(Value::Array(Vec::new()));
                }
                if is_placeholder(text) {
                    return None;
                }
                Some(Value::Array(split_delimited(text)))
            }
            FieldKind::Integer => {
                let text = strip_backticks(raw);
                if is_placeholder(text) {
                    return None;
                }
                match text.parse::<i64>() {
                    Ok(n) => Some(Value::from(n)),
                    Err(_) => {
                        tracing::debug!(field = self.path, value = text, "ignoring non-integer value");
                        None
                    }
                }
            }
            FieldKind::Identifier | FieldKind::Text | FieldKind::Code | FieldKind::Prose => {
                let text = strip_backticks(raw);
                if is_placeholder(text) {
                    None
                } else {
                    Some(Value::String(text.to_string()))
                }
            }
        }
    }

    /// Collect bucket bullet items into a value.
    ///
    /// Placeholder items are dropped. Prose joins the rest with newlines and
    /// is `None` when nothing remains; lists are always produced.
    pub fn collect_lines(&self, items: &[String]) -> Option<Value> {
        let kept: Vec<&str> = items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !is_placeholder(item))
            .collect();
        match self.kind {
            FieldKind::Prose if kept.is_empty() => None,
            FieldKind::Prose => Some(Value::String(kept.join("\n"))),
            _ => Some(Value::Array(
                kept.into_iter().map(|item| Value::String(item.to_string())).collect(),
            )),
        }
    }
}

/// A heading of a note and what lives under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBody {
    /// Key/value bullets for the listed fields.
    Fields(&'static [FieldDescriptor]),
    /// A single bucket field.
    Bucket(FieldDescriptor),
    /// Free-form guidance for the reader; not tracked.
    Guidance(&'static [&'static str]),
}

/// A heading of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub body: SectionBody,
}

const SCALAR_PLACEHOLDER: &[&str] = &["…"];

/// Meta fields of a paper note, in render order.
pub const PAPER_META: &[FieldDescriptor] = &[
    FieldDescriptor::new("paper_id", "paper_id", FieldKind::Identifier, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("title", "title", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("year", "year", FieldKind::Integer, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("authors", "authors", FieldKind::InlineList, &[]),
    FieldDescriptor::new("tags", "tags", FieldKind::InlineList, &[]),
    FieldDescriptor::new("pdf_path", "pdf_path", FieldKind::Code, &["…/<file>.pdf"]),
    FieldDescriptor::new("url", "url", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("code_url", "code_url", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("used_in_tasks", "used_in_tasks", FieldKind::InlineList, &[]),
];

/// Sections of a paper note, in render order.
pub const PAPER_SECTIONS: &[Section] = &[
    Section {
        heading: "## 0. Meta",
        body: SectionBody::Fields(PAPER_META),
    },
    Section {
        heading: "## 1. Abstract",
        body: SectionBody::Guidance(&[
            "Paragraph-by-paragraph summary. Keep numbers, metrics, baselines and scope exactly as stated.",
            "",
            "> **Note:** introduce each key term once with its original wording.",
        ]),
    },
    Section {
        heading: "## 2. Introduction",
        body: SectionBody::Guidance(&[
            "How the work positions itself against related work. Do not add inferences the paper does not make.",
        ]),
    },
    Section {
        heading: "## 3. Methodology",
        body: SectionBody::Guidance(&[
            "Details first: notation, shapes, loss terms, training and inference procedure.",
            "",
            "> **Note:** for every key symbol record meaning, shape, range and unit when the paper gives them.",
        ]),
    },
    Section {
        heading: "## 4. Experiments",
        body: SectionBody::Guidance(&[
            "What was run and why it supports the claims (claim -> evidence).",
        ]),
    },
    Section {
        heading: "## 5. Problem (paper)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "problem",
            "Problem",
            FieldKind::Prose,
            &["… (the problem the paper addresses)"],
        )),
    },
    Section {
        heading: "## 6. Method (paper)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "method",
            "Method",
            FieldKind::Prose,
            &["… (the core idea and how it is realised)"],
        )),
    },
    Section {
        heading: "## 7. Key claims (paper)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "key_claims",
            "Key claims",
            FieldKind::Bullets,
            &["claim-1: … (evidence: …)", "claim-2: …"],
        )),
    },
    Section {
        heading: "## 8. Limitations (paper)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "limitations",
            "Limitations",
            FieldKind::Bullets,
            &["… (stated or observed limitations)"],
        )),
    },
    Section {
        heading: "## 9. Open questions (reading)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "open_questions",
            "Open questions",
            FieldKind::Bullets,
            &["… (questions raised while reading)"],
        )),
    },
    Section {
        heading: "## 10. What we can reuse (our project)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "what_we_can_reuse",
            "What we can reuse",
            FieldKind::Bullets,
            &["… (components worth borrowing)"],
        )),
    },
    Section {
        heading: "## 11. Hypotheses we can test (our project)",
        body: SectionBody::Bucket(FieldDescriptor::new(
            "hypotheses",
            "Hypotheses we can test",
            FieldKind::Bullets,
            &["H1: … (variable: …; protocol: …; metric: …; falsify if: …)"],
        )),
    },
];

/// Every paper field, meta first, then buckets in section order.
pub fn paper_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    PAPER_SECTIONS.iter().flat_map(|section| match &section.body {
        SectionBody::Fields(fields) => fields.iter().collect::<Vec<_>>(),
        SectionBody::Bucket(field) => vec![field],
        SectionBody::Guidance(_) => Vec::new(),
    })
}

const TASK_META: &[FieldDescriptor] = &[
    FieldDescriptor::new("task_id", "task_id", FieldKind::Identifier, &[]),
    FieldDescriptor::new("stage", "stage", FieldKind::Text, &["… (1-validation)"]),
    FieldDescriptor::new("created_at", "created_at", FieldKind::Text, &["… (YYYY-MM-DD)"]),
    FieldDescriptor::new("source.paper_id", "paper_id", FieldKind::Code, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("source.url", "url", FieldKind::Code, SCALAR_PLACEHOLDER),
];

const TASK_BACKGROUND: &[FieldDescriptor] = &[
    FieldDescriptor::new(
        "source.desc",
        "source_desc",
        FieldKind::Text,
        &["… (e.g. a paper issue, a conversation, an intuition)"],
    ),
    FieldDescriptor::new("background.why_now", "why_now", FieldKind::Text, SCALAR_PLACEHOLDER),
];

const TASK_HYPOTHESIS: &[FieldDescriptor] = &[FieldDescriptor::new(
    "hypothesis",
    "hypothesis",
    FieldKind::Text,
    SCALAR_PLACEHOLDER,
)];

const TASK_DESIGN: &[FieldDescriptor] = &[
    FieldDescriptor::new("design.variables", "variables", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("design.baseline", "baseline", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new(
        "design.data_split",
        "data_split",
        FieldKind::Text,
        &["… (follow the evaluation protocol)"],
    ),
    FieldDescriptor::new("design.metrics", "metrics", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("design.budget", "budget", FieldKind::Text, &["… (time / compute)"]),
];

const TASK_ACCEPTANCE: &[FieldDescriptor] = &[
    FieldDescriptor::new("acceptance.pass", "pass", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new(
        "acceptance.fail_but_useful",
        "fail_but_useful",
        FieldKind::Text,
        &["… (what would still guide the next step)"],
    ),
];

const TASK_ARTIFACTS: &[FieldDescriptor] = &[
    FieldDescriptor::new("changes", "changes", FieldKind::InlineList, &[]),
    FieldDescriptor::new("inputs", "inputs", FieldKind::InlineList, &[]),
    FieldDescriptor::new("outputs", "outputs", FieldKind::InlineList, &[]),
];

const TASK_WRITE_BACK: &[FieldDescriptor] = &[
    FieldDescriptor::new("result_summary", "result_summary", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("decision", "decision", FieldKind::Text, SCALAR_PLACEHOLDER),
    FieldDescriptor::new("next_tasks", "next_tasks", FieldKind::InlineList, &[]),
];

/// Sections of a task note, in render order.
pub const TASK_SECTIONS: &[Section] = &[
    Section {
        heading: "## 0. Meta.",
        body: SectionBody::Fields(TASK_META),
    },
    Section {
        heading: "## 1. Background and source.",
        body: SectionBody::Fields(TASK_BACKGROUND),
    },
    Section {
        heading: "## 2. Hypothesis.",
        body: SectionBody::Fields(TASK_HYPOTHESIS),
    },
    Section {
        heading: "## 3. Design.",
        body: SectionBody::Fields(TASK_DESIGN),
    },
    Section {
        heading: "## 4. Acceptance.",
        body: SectionBody::Fields(TASK_ACCEPTANCE),
    },
    Section {
        heading: "## 5. Artifacts.",
        body: SectionBody::Fields(TASK_ARTIFACTS),
    },
    Section {
        heading: "## 6. Write-back.",
        body: SectionBody::Fields(TASK_WRITE_BACK),
    },
];

/// Every task field in section order.
pub fn task_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    TASK_SECTIONS.iter().flat_map(|section| match &section.body {
        SectionBody::Fields(fields) => fields.iter().collect::<Vec<_>>(),
        SectionBody::Bucket(field) => vec![field],
        SectionBody::Guidance(_) => Vec::new(),
    })
}

/// Look up a task field by its note label.
pub fn task_field_by_label(label: &str) -> Option<&'static FieldDescriptor> {
    task_fields().find(|field| field.label == label)
}
