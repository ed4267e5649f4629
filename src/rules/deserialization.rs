//! Unsafe deserialization rule.
//!
//! Flags `Deserialize` calls on formatters known to allow arbitrary type
//! instantiation, e.g. `new BinaryFormatter().Deserialize(stream)`.
//!
//! There is no symbol resolution: a call matches a construction when the
//! call's receiver text contains the constructed type's name, and every
//! construction in the file is considered.

use super::text::mentions;
use super::{Check, Rule};
use crate::syntax::csharp::kinds;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};

const UNSAFE_DESERIALIZATION: Check = Check {
    id: "DESER-001",
    severity: Severity::Critical,
    cwe: "CWE-502",
    summary: "Deserialization with an unsafe formatter",
};

const CHECKS: &[Check] = &[UNSAFE_DESERIALIZATION];

pub struct DeserializationRule {
    unsafe_types: &'static [&'static str],
    unsafe_methods: &'static [&'static str],
}

impl DeserializationRule {
    pub fn new() -> Self {
        Self {
            unsafe_types: &[
                "BinaryFormatter",
                "SoapFormatter",
                "NetDataContractSerializer",
                "LosFormatter",
                "ObjectStateFormatter",
            ],
            unsafe_methods: &["Deserialize"],
        }
    }
}

impl Default for DeserializationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for DeserializationRule {
    fn id(&self) -> &'static str {
        "deserialization"
    }

    fn title(&self) -> &'static str {
        "Unsafe deserialization"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Deserialization
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        for call in root.descendants_of_kind(kinds::INVOCATION_EXPRESSION) {
            let Some(access) = call.callee() else {
                continue;
            };
            let Some((receiver, method)) = access.member_parts() else {
                continue;
            };
            if !self.unsafe_methods.contains(&method.text()) {
                continue;
            }

            for creation in root.descendants_of_kind(kinds::OBJECT_CREATION_EXPRESSION) {
                let Some(type_name) = creation.constructed_type() else {
                    continue;
                };
                if self.unsafe_types.contains(&type_name) && mentions(receiver.text(), type_name) {
                    diagnostics.push(UNSAFE_DESERIALIZATION.report(
                        access,
                        format!(
                            "Potential deserialization vulnerability: {}.{}() is used; \
                            replace it with a safer serialization mechanism such as System.Text.Json",
                            receiver.text(),
                            method.text()
                        ),
                    ));
                }
            }
        }
    }
}
