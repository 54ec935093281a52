//! Decision trees returned by checks run in debug mode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one step of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// A matching relation was found.
    Matched,
    /// No matching relation.
    NotMatched,
    /// The relation exists but depends on policy evaluation.
    EvalPolicy,
    /// A decision this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Decision {
    /// Returns the plain-text marker for the decision.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Matched => "✔",
            Self::NotMatched => "✖",
            Self::EvalPolicy => "?",
            Self::Unknown => "·",
        }
    }
}

/// The subject/relation/resource a node evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckNode {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Relation being checked.
    pub relation: String,
    /// The subject.
    pub subject: NodeSubject,
}

/// Subject reference as it appears in decision trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSubject {
    /// Subject type.
    pub resource_type: String,
    /// Subject id.
    pub resource_id: String,
    /// Relation on the subject, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// One node of a decision tree, with its sub-checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// What this node checked.
    pub check: CheckNode,
    /// Policy attached to the matched relation, if any.
    #[serde(default)]
    pub policy: Option<String>,
    /// Outcome of this node.
    pub decision: Decision,
    /// Time spent in this node, in nanoseconds.
    #[serde(default)]
    pub processing_time: u64,
    /// Sub-checks (indirect matches through other relations).
    #[serde(default)]
    pub children: Vec<DecisionTree>,
}

impl DecisionTree {
    /// Renders the tree, one node per line, using `marker` for decisions.
    ///
    /// Each line reads `<marker> type:id#relation@subject[ - policy] (<n>ms)`.
    pub fn render_with<F>(&self, marker: F) -> String
    where
        F: Fn(Decision) -> String,
    {
        let mut out = String::new();
        out.push_str(&self.line(&marker));
        self.render_children(&mut out, "", &marker);
        out
    }

    fn render_children<F>(&self, out: &mut String, prefix: &str, marker: &F)
    where
        F: Fn(Decision) -> String,
    {
        let count = self.children.len();
        for (index, child) in self.children.iter().enumerate() {
            let last = index + 1 == count;
            out.push('\n');
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&child.line(marker));

            let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
            child.render_children(out, &nested, marker);
        }
    }

    fn line<F>(&self, marker: &F) -> String
    where
        F: Fn(Decision) -> String,
    {
        let check = &self.check;
        let mut text = format!(
            "{}:{}#{}@{}:{}",
            check.resource_type,
            check.resource_id,
            check.relation,
            check.subject.resource_type,
            check.subject.resource_id
        );
        if let Some(relation) = check.subject.relation.as_deref().filter(|r| !r.is_empty()) {
            text.push('#');
            text.push_str(relation);
        }
        if let Some(policy) = self.policy.as_deref().filter(|p| !p.is_empty()) {
            text.push_str(" - ");
            text.push_str(policy);
        }

        format!(
            "{} {} ({}ms)",
            marker(self.decision),
            text,
            self.processing_time / 1_000_000
        )
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|d| d.symbol().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DecisionTree {
        serde_json::from_value(json!({
            "check": {
                "resource_type": "document",
                "resource_id": "xyz",
                "relation": "viewer",
                "subject": {"resource_type": "user", "resource_id": "john"}
            },
            "decision": "matched",
            "processing_time": 4_500_000,
            "children": [
                {
                    "check": {
                        "resource_type": "document",
                        "resource_id": "xyz",
                        "relation": "owner",
                        "subject": {"resource_type": "user", "resource_id": "john"}
                    },
                    "decision": "not_matched",
                    "processing_time": 1_000_000,
                    "children": []
                },
                {
                    "check": {
                        "resource_type": "document",
                        "resource_id": "xyz",
                        "relation": "editor",
                        "subject": {"resource_type": "group", "resource_id": "eng", "relation": "member"}
                    },
                    "policy": "region == 'eu'",
                    "decision": "eval_policy",
                    "processing_time": 2_999_999,
                    "children": [
                        {
                            "check": {
                                "resource_type": "group",
                                "resource_id": "eng",
                                "relation": "member",
                                "subject": {"resource_type": "user", "resource_id": "john"}
                            },
                            "decision": "matched",
                            "processing_time": 0
                        }
                    ]
                }
            ]
        }))
        .expect("valid tree")
    }

    #[test]
    fn renders_markers_branches_and_timings() {
        let expected = "\
✔ document:xyz#viewer@user:john (4ms)
├── ✖ document:xyz#owner@user:john (1ms)
└── ? document:xyz#editor@group:eng#member - region == 'eu' (2ms)
    └── ✔ group:eng#member@user:john (0ms)";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn nested_children_of_non_last_nodes_keep_the_rail() {
        let mut tree = sample();
        let grandchild = tree.children[1].children[0].clone();
        tree.children[0].children.push(grandchild);

        let rendered = tree.to_string();
        assert!(rendered.contains("\n│   └── ✔ group:eng#member@user:john (0ms)"));
    }

    #[test]
    fn custom_marker_is_used() {
        let rendered = sample().render_with(|d| format!("<{d:?}>"));
        assert!(rendered.starts_with("<Matched> document:xyz#viewer@user:john"));
        assert!(rendered.contains("<EvalPolicy>"));
    }

    #[test]
    fn unknown_decision_is_tolerated() {
        let node: DecisionTree = serde_json::from_value(json!({
            "check": {
                "resource_type": "a",
                "resource_id": "1",
                "relation": "r",
                "subject": {"resource_type": "b", "resource_id": "2"}
            },
            "decision": "something_new"
        }))
        .unwrap();
        assert_eq!(node.decision, Decision::Unknown);
        assert_eq!(node.to_string(), "· a:1#r@b:2 (0ms)");
    }
}
