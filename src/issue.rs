//! C7: the append-only diagnostic list (spec §4.5, §4.6).
//!
//! Messages are drawn from a fixed catalogue of `&'static str` constants —
//! never built with `format!` from input data — so equality tests over
//! issue lists are exact and input-independent in shape.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub command_index: u32,
    pub resource_id: Option<u16>,
}

/// Stable diagnostic codes (spec §4.5).
pub mod codes {
    pub const MISSING_RESOURCE: &str = "E001";
    pub const STATE_VIOLATION: &str = "E002";
    pub const MEMORY_BOUNDS: &str = "E004";
    pub const DUPLICATE_ID: &str = "E005";
    pub const INVALID_DESCRIPTOR: &str = "E006";
    pub const PASS_MISMATCH: &str = "E007";
    pub const NESTED_PASS: &str = "E008";
    pub const ZERO_COUNT: &str = "W003";
    pub const NULL_POINTER: &str = "W004";
    pub const SUSPICIOUS_DESCRIPTOR: &str = "W006";
}

/// The fixed message catalogue, grouped by the code that emits each one.
pub mod messages {
    pub const MISSING_RESOURCE: &str = "command references an unregistered resource identifier";
    pub const DRAW_OUTSIDE_RENDER_PASS: &str = "draw issued outside an open render pass";
    pub const DISPATCH_OUTSIDE_COMPUTE_PASS: &str = "dispatch issued outside an open compute pass";
    pub const DRAW_WITHOUT_PIPELINE: &str = "draw issued with no pipeline bound";
    pub const DISPATCH_WITHOUT_PIPELINE: &str = "dispatch issued with no pipeline bound";
    pub const PIPELINE_KIND_MISMATCH: &str = "bound pipeline kind does not match the open pass kind";
    pub const MEMORY_BOUNDS: &str = "ptr + len overflows or exceeds the configured WASM memory size";
    pub const DUPLICATE_ID: &str = "resource identifier was already registered for this kind";
    pub const BUFFER_SIZE_ZERO: &str = "buffer size must be non-zero";
    pub const BUFFER_USAGE_ZERO: &str = "buffer usage must be non-zero";
    pub const BUFFER_USAGE_INVALID_COMBINATION: &str =
        "buffer usage combination is not permitted (MAP_READ/MAP_WRITE companion rules)";
    pub const BUFFER_MISSING_VERTEX_USAGE: &str = "buffer is bound as a vertex buffer but lacks VERTEX usage";
    pub const BUFFER_MISSING_INDEX_USAGE: &str = "buffer is bound as an index buffer but lacks INDEX usage";
    pub const BUFFER_MISSING_COPY_DST_USAGE: &str = "buffer is a write/copy destination but lacks COPY_DST usage";
    pub const BUFFER_MISSING_COPY_SRC_USAGE: &str = "buffer is a copy source but lacks COPY_SRC usage";
    pub const COPY_SAME_BUFFER: &str = "copy source and destination buffer identifiers must differ";
    pub const TEXTURE_USAGE_ZERO: &str = "texture usage must be non-zero";
    pub const TEXTURE_USAGE_INVALID_BITS: &str = "texture usage has bits outside the defined usage mask";
    pub const TEXTURE_SAMPLE_COUNT_INVALID: &str = "texture sample_count must be 1 or 4";
    pub const TEXTURE_1D_INVALID: &str = "1D texture must have height=1, depth=1, sample_count=1, and a non depth-stencil format";
    pub const TEXTURE_3D_INVALID: &str = "3D texture must have sample_count=1";
    pub const TEXTURE_MSAA_INVALID: &str =
        "MSAA texture must have mip_level_count=1, depth=1, no STORAGE_BINDING, and RENDER_ATTACHMENT set";
    pub const PASS_NOT_OPEN: &str = "end_pass with no open pass";
    pub const PASS_NOT_CLOSED: &str = "stream ended with a pass still open";
    pub const BUFFER_SIZE_LIMIT_EXCEEDED: &str = "buffer size exceeds the configured maximum";
    pub const WORKGROUP_COUNT_EXCEEDED: &str = "dispatch workgroup count exceeds the configured maximum per dimension";
    pub const NESTED_PASS: &str = "begin_* issued while a pass is already open";
    pub const ZERO_COUNT: &str = "draw or dispatch issued with a zero dimension";
    pub const NULL_POINTER: &str = "ptr is null (0) with a non-zero len";
    pub const UNIFORM_BUFFER_MISALIGNED: &str = "uniform buffer size is not 16-byte aligned";
    pub const STORAGE_BUFFER_MISALIGNED: &str = "storage buffer size is not 4-byte aligned";
    pub const SUSPICIOUS_DESCRIPTOR: &str = "descriptor blob is unusually large";
    pub const TEXTURE_DIMENSION_EXCEEDED: &str = "texture dimension exceeds the configured maximum for its kind";
}

/// Append-only ordered collection of diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueList(Vec<Issue>);

impl IssueList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.0.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut issues = IssueList::new();
        issues.push(Issue {
            code: codes::DUPLICATE_ID,
            severity: Severity::Error,
            message: messages::DUPLICATE_ID,
            command_index: 1,
            resource_id: Some(1),
        });
        issues.push(Issue {
            code: codes::ZERO_COUNT,
            severity: Severity::Warning,
            message: messages::ZERO_COUNT,
            command_index: 2,
            resource_id: None,
        });
        assert_eq!(issues.error_count(), 1);
        assert_eq!(issues.warning_count(), 1);
        assert!(issues.has_errors());
    }
}
