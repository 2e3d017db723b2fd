//! C6: the command dispatcher, and C10: the read-only query surface.
//!
//! [`Validator`] is the single stateful machine the whole crate revolves
//! around: it owns the resource registry (C4), the pass/pipeline state
//! machine (C5), and the append-only issue list (C7). `validate` never
//! returns early on a bad command — per spec §7 the explicit contract is
//! to enumerate as many problems as a single pass can find.

use crate::command::{
    BufferUsage, Command, MemRef, Opcode, Params, TextureUsage, CANVAS_SENTINEL,
};
use crate::descriptor::{self, TextureDescriptor, TextureDimension};
use crate::issue::{codes, messages, Issue, IssueList, Severity};
use crate::limits::{Limits, SUSPICIOUS_DESCRIPTOR_BYTES};
use crate::registry::{
    BufferRecord, Insert, PipelineKind, PipelineRecord, Registry, ResourceCounts, SimpleRecord,
    TextureRecord,
};
use crate::state::{BoundPipeline, BoundSlots, PassState};
use std::collections::HashSet;

/// The in-line checks at creation/dispatch time always use
/// [`Limits::default`] — the boundary behavior spec §4.5 pins exactly.
/// `validate_parameter_values` below is the separate analysis that lets a
/// caller re-check the already-populated registry against its own
/// [`Limits`].
fn default_limits() -> Limits {
    Limits::default()
}

pub struct Validator {
    pub(crate) registry: Registry,
    pub(crate) pass_state: PassState,
    pub(crate) bound_pipeline: BoundPipeline,
    pub(crate) slots: BoundSlots,
    pub(crate) issues: IssueList,
    pub(crate) draw_count: u32,
    pub(crate) dispatch_count: u32,
    /// Number of times `begin_render_pass` / `begin_compute_pass`
    /// successfully opened a pass (spec §4.7 needs "was a pass ever
    /// opened", not just the current `pass_state`).
    pub(crate) render_pass_count: u32,
    pub(crate) compute_pass_count: u32,
    /// Buffer ids that were ever the *destination* of a write-style
    /// command, regardless of whether that command otherwise validated —
    /// feeds the C8 "uniform buffer never written" missing-operation rule.
    pub(crate) buffers_written: HashSet<u16>,
    /// Bind group ids that were ever bound via `set_bind_group` — feeds
    /// the C8 "bind group with no slot ever set" warning.
    pub(crate) bind_groups_bound: HashSet<u16>,
    /// Whether `set_vertex_buffer` was ever issued, regardless of pass
    /// boundaries clearing the live slot array — feeds the
    /// `fullscreen_quad` pattern (spec §4.7).
    pub(crate) vertex_buffer_ever_bound: bool,
    wasm_memory_size: Option<u32>,
    wasm_memory: Option<Vec<u8>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            pass_state: PassState::None,
            bound_pipeline: BoundPipeline::default(),
            slots: BoundSlots::default(),
            issues: IssueList::new(),
            draw_count: 0,
            dispatch_count: 0,
            render_pass_count: 0,
            compute_pass_count: 0,
            buffers_written: HashSet::new(),
            bind_groups_bound: HashSet::new(),
            vertex_buffer_ever_bound: false,
            wasm_memory_size: None,
            wasm_memory: None,
        }
    }

    /// Opt in to `E004 memory_bounds` checks against a configured linear
    /// memory size. Without this, overflow checks still run but the
    /// size-exceeded half of the check is elided (spec §4.5).
    pub fn set_wasm_memory_size(&mut self, size: u32) {
        debug_assert!(size > 0);
        self.wasm_memory_size = Some(size);
    }

    /// Supply a read-only snapshot of WASM linear memory so descriptor
    /// bytes (`{desc_ptr, desc_len}`) can actually be decoded (C3). Without
    /// it, descriptor-level texture creation rules are skipped, per spec
    /// §4.5 "only when the descriptor is parsed".
    pub fn set_wasm_memory(&mut self, memory: Vec<u8>) {
        self.wasm_memory = Some(memory);
    }

    pub fn has_errors(&self) -> bool {
        self.issues.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.issues.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.warning_count()
    }

    pub fn get_resource_counts(&self) -> ResourceCounts {
        self.registry.counts()
    }

    pub fn issues(&self) -> &IssueList {
        &self.issues
    }

    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    pub fn dispatch_count(&self) -> u32 {
        self.dispatch_count
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn render_pass_count(&self) -> u32 {
        self.render_pass_count
    }

    pub(crate) fn compute_pass_count(&self) -> u32 {
        self.compute_pass_count
    }

    pub(crate) fn has_bound_vertex_buffer(&self) -> bool {
        self.vertex_buffer_ever_bound
    }

    pub(crate) fn bind_groups_bound(&self) -> &HashSet<u16> {
        &self.bind_groups_bound
    }

    pub(crate) fn buffers_written(&self) -> &HashSet<u16> {
        &self.buffers_written
    }

    /// A second, independent pass over the already-populated registry: the
    /// caller supplies a (possibly customized) [`Limits`] dictionary and
    /// gets back issues for buffer/texture sizes and alignment that exceed
    /// it. Unlike `validate`, this never mutates `self` and its output is
    /// never folded into the main issue list — spec §4.5/§8 leaves this as
    /// a separate, repeatable query surface.
    pub fn validate_parameter_values(&self, limits: Option<Limits>) -> Vec<Issue> {
        let limits = limits.unwrap_or_default();
        let mut out = Vec::new();

        let mut buffers: Vec<_> = self.registry.buffers.iter().collect();
        buffers.sort_unstable_by_key(|(id, _)| **id);
        for (id, buffer) in buffers {
            if buffer.size > limits.max_buffer_size {
                out.push(Issue {
                    code: codes::PASS_MISMATCH,
                    severity: Severity::Error,
                    message: messages::BUFFER_SIZE_LIMIT_EXCEEDED,
                    command_index: buffer.created_at,
                    resource_id: Some(*id),
                });
            }
            let bits = BufferUsage::from_bits_truncate(buffer.usage);
            if bits.contains(BufferUsage::UNIFORM) && buffer.size % limits.min_uniform_buffer_offset_alignment != 0 {
                out.push(Issue {
                    code: codes::NULL_POINTER,
                    severity: Severity::Warning,
                    message: messages::UNIFORM_BUFFER_MISALIGNED,
                    command_index: buffer.created_at,
                    resource_id: Some(*id),
                });
            }
            if bits.contains(BufferUsage::STORAGE) && buffer.size % limits.min_storage_buffer_offset_alignment != 0 {
                out.push(Issue {
                    code: codes::NULL_POINTER,
                    severity: Severity::Warning,
                    message: messages::STORAGE_BUFFER_MISALIGNED,
                    command_index: buffer.created_at,
                    resource_id: Some(*id),
                });
            }
        }

        let mut textures: Vec<_> = self.registry.textures.iter().collect();
        textures.sort_unstable_by_key(|(id, _)| **id);
        for (id, texture) in textures {
            let max_dim = match texture.dimension {
                TextureDimension::D1 => limits.max_texture_dimension_1d,
                TextureDimension::D2 => limits.max_texture_dimension_2d,
                TextureDimension::D3 => limits.max_texture_dimension_3d,
            };
            let over = texture.width > max_dim
                || texture.height > max_dim
                || (texture.dimension == TextureDimension::D3 && texture.depth > max_dim);
            if over {
                out.push(Issue {
                    code: codes::PASS_MISMATCH,
                    severity: Severity::Error,
                    message: messages::TEXTURE_DIMENSION_EXCEEDED,
                    command_index: texture.created_at,
                    resource_id: Some(*id),
                });
            }
        }

        out
    }

    /// C8: diagnose a single user-visible symptom against this validator's
    /// final state.
    pub fn diagnose_symptom(&self, symptom: crate::diagnosis::Symptom) -> crate::diagnosis::SymptomReport {
        crate::diagnosis::diagnose_symptom(self, symptom)
    }

    /// C8: operations the stream implies but never performed.
    pub fn detect_missing_operations(&self) -> Vec<crate::diagnosis::MissingOperation> {
        crate::diagnosis::detect_missing_operations(self)
    }

    /// C8: recognizable authoring idioms inferred from the final registry.
    pub fn detect_patterns(&self) -> Vec<crate::diagnosis::PatternMatch> {
        crate::diagnosis::detect_patterns(self)
    }

    /// C8: ranked likely causes, merging issues, missing operations, and
    /// pattern-aware adjustments.
    pub fn analyze_likely_causes(&self) -> Vec<crate::diagnosis::CauseRecord> {
        crate::diagnosis::analyze_likely_causes(self)
    }

    /// Run every command through the dispatcher in order, then check for a
    /// pass left open at stream end (spec §4.5).
    pub fn validate(&mut self, commands: &[Command]) {
        log::debug!("validating {} commands", commands.len());
        for command in commands {
            self.dispatch(command);
        }
        if self.pass_state != PassState::None {
            self.push_error(
                codes::PASS_MISMATCH,
                messages::PASS_NOT_CLOSED,
                commands.len() as u32,
                None,
            );
        }
    }

    fn push_error(&mut self, code: &'static str, message: &'static str, idx: u32, resource_id: Option<u16>) {
        self.issues.push(Issue {
            code,
            severity: Severity::Error,
            message,
            command_index: idx,
            resource_id,
        });
    }

    fn push_warning(&mut self, code: &'static str, message: &'static str, idx: u32, resource_id: Option<u16>) {
        self.issues.push(Issue {
            code,
            severity: Severity::Warning,
            message,
            command_index: idx,
            resource_id,
        });
    }

    fn check_missing(&mut self, id: u16, present: bool, idx: u32) -> bool {
        if !present {
            self.push_error(codes::MISSING_RESOURCE, messages::MISSING_RESOURCE, idx, Some(id));
        }
        present
    }

    fn is_sentinel(id: u16) -> bool {
        id == CANVAS_SENTINEL
    }

    /// E004/W004 over a `{ptr, len}` reference (spec §4.5).
    fn check_mem_ref(&mut self, r: MemRef, idx: u32) {
        match r.ptr.checked_add(r.len) {
            None => self.push_error(codes::MEMORY_BOUNDS, messages::MEMORY_BOUNDS, idx, None),
            Some(end) => {
                if let Some(size) = self.wasm_memory_size {
                    if end > size {
                        self.push_error(codes::MEMORY_BOUNDS, messages::MEMORY_BOUNDS, idx, None);
                    }
                }
            }
        }
        if r.ptr == 0 && r.len > 0 {
            self.push_warning(codes::NULL_POINTER, messages::NULL_POINTER, idx, None);
        }
    }

    fn check_suspicious_descriptor(&mut self, len: u32, idx: u32) {
        if len > SUSPICIOUS_DESCRIPTOR_BYTES {
            self.push_warning(codes::SUSPICIOUS_DESCRIPTOR, messages::SUSPICIOUS_DESCRIPTOR, idx, None);
        }
    }

    fn buffer_has_usage(&self, id: u16, bit: BufferUsage) -> Option<bool> {
        self.registry
            .buffers
            .get(&id)
            .map(|b| BufferUsage::from_bits_truncate(b.usage).contains(bit))
    }

    fn check_buffer_usage(&mut self, id: u16, bit: BufferUsage, message: &'static str, idx: u32) {
        if let Some(false) = self.buffer_has_usage(id, bit) {
            self.push_error(codes::INVALID_DESCRIPTOR, message, idx, Some(id));
        }
    }

    fn dispatch(&mut self, command: &Command) {
        let idx = command.index;
        match (&command.opcode, &command.params) {
            (Opcode::CreateBuffer, Params::CreateBuffer { id, size, usage }) => {
                self.on_create_buffer(idx, *id, *size, *usage)
            }
            (
                Opcode::CreateTexture
                | Opcode::CreateSampler
                | Opcode::CreateBindGroupLayout
                | Opcode::CreatePipelineLayout
                | Opcode::CreateQuerySet
                | Opcode::CreateRenderBundle
                | Opcode::CreateRenderPipeline
                | Opcode::CreateComputePipeline
                | Opcode::CreateImageBitmap,
                Params::CreateResource { id, desc },
            ) => self.on_create_resource(idx, command.opcode, *id, *desc),
            (Opcode::CreateShader, Params::CreateShader { id, code }) => {
                self.on_create_shader(idx, *id, *code)
            }
            (Opcode::CreateBindGroup, Params::CreateBindGroup { id, entries, .. }) => {
                self.on_create_bind_group(idx, *id, *entries)
            }
            (Opcode::CreateTextureView, Params::CreateTextureView { id, texture_id, desc }) => {
                self.on_create_texture_view(idx, *id, *texture_id, *desc)
            }
            (Opcode::BeginRenderPass, Params::BeginRenderPass { color_id, depth_id, .. }) => {
                self.on_begin_render_pass(idx, *color_id, *depth_id)
            }
            (Opcode::BeginComputePass, Params::Empty) => self.on_begin_compute_pass(idx),
            (Opcode::EndPass, Params::Empty) => self.on_end_pass(idx),
            (Opcode::Submit, Params::Empty) => self.on_submit(),
            (Opcode::End, Params::Empty) => {}
            (Opcode::SetPipeline, Params::SetPipeline { id }) => self.on_set_pipeline(idx, *id),
            (Opcode::SetBindGroup, Params::SetSlot { slot, id }) => {
                self.on_set_bind_group(idx, *slot, *id)
            }
            (Opcode::SetVertexBuffer, Params::SetSlot { slot, id }) => {
                self.on_set_vertex_buffer(idx, *slot, *id)
            }
            (Opcode::SetIndexBuffer, Params::SetIndexBuffer { id, .. }) => {
                self.on_set_index_buffer(idx, *id)
            }
            (Opcode::Draw, Params::Draw { vertex_count, instance_count, .. }) => {
                self.on_draw(idx, *vertex_count, *instance_count)
            }
            (Opcode::DrawIndexed, Params::DrawIndexed { index_count, instance_count, .. }) => {
                self.on_draw_indexed(idx, *index_count, *instance_count)
            }
            (Opcode::Dispatch, Params::Dispatch { x, y, z }) => self.on_dispatch(idx, *x, *y, *z),
            (Opcode::ExecuteBundles, Params::ExecuteBundles { .. }) => {}
            (Opcode::WriteBuffer, Params::WriteBuffer { id, data, .. }) => {
                self.on_write_buffer(idx, *id, *data)
            }
            (Opcode::WriteTimeUniform, Params::WriteTimeUniform { id, .. }) => {
                self.on_write_time_uniform(idx, *id)
            }
            (
                Opcode::CopyBufferToBuffer,
                Params::CopyBufferToBuffer { src_id, dst_id, .. },
            ) => self.on_copy_buffer_to_buffer(idx, *src_id, *dst_id),
            (
                Opcode::CopyTextureToTexture,
                Params::CopyTextureToTexture { src_id, dst_id, .. },
            ) => self.on_copy_texture_to_texture(idx, *src_id, *dst_id),
            (
                Opcode::CopyExternalImageToTexture,
                Params::CopyExternalImageToTexture { bitmap_id, texture_id, .. },
            ) => self.on_copy_external_image_to_texture(idx, *bitmap_id, *texture_id),
            (
                Opcode::WriteBufferFromWasm,
                Params::WriteBufferFromWasm { buffer_id, wasm, .. },
            ) => self.on_write_buffer_from_wasm(idx, *buffer_id, *wasm),
            (Opcode::InitWasmModule, Params::InitWasmModule { module_id, data }) => {
                self.on_init_wasm_module(idx, *module_id, *data)
            }
            (Opcode::CallWasmFunc, Params::CallWasmFunc { module_id, func, args, .. }) => {
                self.on_call_wasm_func(idx, *module_id, *func, *args)
            }
            (Opcode::CreateTypedArray, Params::CreateTypedArray { id, .. }) => {
                self.on_create_typed_array(idx, *id)
            }
            (Opcode::FillRandom | Opcode::FillConstant, Params::Fill { array_id, .. }) => {
                self.on_fill(idx, *array_id)
            }
            (Opcode::FillExpression, Params::FillExpression { array_id, expr_ptr, expr_len, .. }) => {
                self.on_fill_expression(idx, *array_id, *expr_ptr, *expr_len)
            }
            (
                Opcode::WriteBufferFromArray,
                Params::WriteBufferFromArray { buffer_id, array_id, .. },
            ) => self.on_write_buffer_from_array(idx, *buffer_id, *array_id),
            _ => unreachable!("parser never pairs an opcode with a mismatched Params variant"),
        }
    }

    fn on_create_buffer(&mut self, idx: u32, id: u16, size: u32, usage: u8) {
        match Registry::insert(&mut self.registry.buffers, id, BufferRecord { size, usage, created_at: idx }) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                return;
            }
            Insert::CapacityExceeded => {
                log::warn!("buffer registry at capacity, dropping create_buffer(id={id})");
                return;
            }
            Insert::Created => {}
        }

        let bits = BufferUsage::from_bits_truncate(usage);
        if bits.is_empty() {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::BUFFER_USAGE_ZERO, idx, Some(id));
        } else {
            if bits.contains(BufferUsage::MAP_READ) {
                let extra = bits - (BufferUsage::MAP_READ | BufferUsage::COPY_DST);
                if !extra.is_empty() {
                    self.push_error(codes::INVALID_DESCRIPTOR, messages::BUFFER_USAGE_INVALID_COMBINATION, idx, Some(id));
                }
            }
            if bits.contains(BufferUsage::MAP_WRITE) {
                let extra = bits - (BufferUsage::MAP_WRITE | BufferUsage::COPY_SRC);
                if !extra.is_empty() {
                    self.push_error(codes::INVALID_DESCRIPTOR, messages::BUFFER_USAGE_INVALID_COMBINATION, idx, Some(id));
                }
            }
            if bits.contains(BufferUsage::MAP_READ) && bits.contains(BufferUsage::MAP_WRITE) {
                self.push_error(codes::INVALID_DESCRIPTOR, messages::BUFFER_USAGE_INVALID_COMBINATION, idx, Some(id));
            }
        }

        if size == 0 {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::BUFFER_SIZE_ZERO, idx, Some(id));
        } else if size > default_limits().max_buffer_size {
            self.push_error(codes::PASS_MISMATCH, messages::BUFFER_SIZE_LIMIT_EXCEEDED, idx, Some(id));
        }

        if bits.contains(BufferUsage::UNIFORM) && size % 16 != 0 {
            self.push_warning(codes::NULL_POINTER, messages::UNIFORM_BUFFER_MISALIGNED, idx, Some(id));
        }
        if bits.contains(BufferUsage::STORAGE) && size % 4 != 0 {
            self.push_warning(codes::NULL_POINTER, messages::STORAGE_BUFFER_MISALIGNED, idx, Some(id));
        }
    }

    fn on_create_resource(&mut self, idx: u32, opcode: Opcode, id: u16, desc: MemRef) {
        match opcode {
            Opcode::CreateBindGroupLayout
            | Opcode::CreatePipelineLayout
            | Opcode::CreateQuerySet
            | Opcode::CreateRenderBundle => {
                // Intentionally untracked (spec §9 Open Questions): no
                // registry entry, so no duplicate-id concept, but the
                // descriptor reference is still checked.
                self.check_mem_ref(desc, idx);
                self.check_suspicious_descriptor(desc.len, idx);
            }
            Opcode::CreateTexture => self.on_create_texture(idx, id, desc),
            Opcode::CreateSampler => {
                match Registry::insert(&mut self.registry.samplers, id, SimpleRecord { created_at: idx }) {
                    Insert::Duplicate => {
                        self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                    }
                    Insert::CapacityExceeded => {
                        log::warn!("sampler registry at capacity, dropping create_sampler(id={id})");
                    }
                    Insert::Created => {
                        self.check_mem_ref(desc, idx);
                        self.check_suspicious_descriptor(desc.len, idx);
                    }
                }
            }
            Opcode::CreateRenderPipeline => {
                match Registry::insert(
                    &mut self.registry.render_pipelines,
                    id,
                    PipelineRecord { kind: PipelineKind::Render, created_at: idx },
                ) {
                    Insert::Duplicate => {
                        self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                    }
                    Insert::CapacityExceeded => {
                        log::warn!("render pipeline registry at capacity, dropping create_render_pipeline(id={id})");
                    }
                    Insert::Created => {
                        self.check_mem_ref(desc, idx);
                        self.check_suspicious_descriptor(desc.len, idx);
                    }
                }
            }
            Opcode::CreateComputePipeline => {
                match Registry::insert(
                    &mut self.registry.compute_pipelines,
                    id,
                    PipelineRecord { kind: PipelineKind::Compute, created_at: idx },
                ) {
                    Insert::Duplicate => {
                        self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                    }
                    Insert::CapacityExceeded => {
                        log::warn!("compute pipeline registry at capacity, dropping create_compute_pipeline(id={id})");
                    }
                    Insert::Created => {
                        self.check_mem_ref(desc, idx);
                        self.check_suspicious_descriptor(desc.len, idx);
                    }
                }
            }
            Opcode::CreateImageBitmap => {
                match Registry::insert(&mut self.registry.image_bitmaps, id, SimpleRecord { created_at: idx }) {
                    Insert::Duplicate => {
                        self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                    }
                    Insert::CapacityExceeded => {
                        log::warn!("image bitmap registry at capacity, dropping create_image_bitmap(id={id})");
                    }
                    Insert::Created => {
                        self.check_mem_ref(desc, idx);
                        self.check_suspicious_descriptor(desc.len, idx);
                    }
                }
            }
            _ => unreachable!("only the create_resource tie-break group reaches here"),
        }
    }

    fn on_create_texture(&mut self, idx: u32, id: u16, desc: MemRef) {
        let parsed: Option<TextureDescriptor> = self
            .wasm_memory
            .as_ref()
            .map(|mem| descriptor::parse_texture_descriptor(mem, desc.ptr, desc.len));
        let d = parsed.unwrap_or_default();

        match Registry::insert(
            &mut self.registry.textures,
            id,
            TextureRecord {
                width: d.width,
                height: d.height,
                depth: d.depth,
                format: d.format,
                usage: d.usage,
                sample_count: d.sample_count,
                mip_level_count: d.mip_level_count,
                dimension: d.dimension,
                created_at: idx,
            },
        ) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
                return;
            }
            Insert::CapacityExceeded => {
                log::warn!("texture registry at capacity, dropping create_texture(id={id})");
                return;
            }
            Insert::Created => {}
        }

        self.check_mem_ref(desc, idx);
        self.check_suspicious_descriptor(desc.len, idx);

        // Descriptor-level rules only apply when the descriptor was
        // actually decoded (spec §4.5: "only when the descriptor is
        // parsed").
        if parsed.is_none() {
            return;
        }

        let bits = TextureUsage::from_bits_truncate(d.usage);
        if bits.is_empty() {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_USAGE_ZERO, idx, Some(id));
        } else if TextureUsage::from_bits(d.usage).is_none() {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_USAGE_INVALID_BITS, idx, Some(id));
        }

        if d.sample_count != 1 && d.sample_count != 4 {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_SAMPLE_COUNT_INVALID, idx, Some(id));
        }

        match d.dimension {
            TextureDimension::D1 => {
                let is_depth_stencil = (0x10..=0x1F).contains(&d.format);
                if d.height != 1 || d.depth != 1 || d.sample_count != 1 || is_depth_stencil {
                    self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_1D_INVALID, idx, Some(id));
                }
            }
            TextureDimension::D3 => {
                if d.sample_count != 1 {
                    self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_3D_INVALID, idx, Some(id));
                }
            }
            TextureDimension::D2 => {}
        }

        if d.sample_count > 1 {
            let invalid_msaa = d.mip_level_count != 1
                || d.depth != 1
                || bits.contains(TextureUsage::STORAGE_BINDING)
                || !bits.contains(TextureUsage::RENDER_ATTACHMENT);
            if invalid_msaa {
                self.push_error(codes::INVALID_DESCRIPTOR, messages::TEXTURE_MSAA_INVALID, idx, Some(id));
            }
        }
    }

    fn on_create_shader(&mut self, idx: u32, id: u16, code: MemRef) {
        match Registry::insert(&mut self.registry.shaders, id, SimpleRecord { created_at: idx }) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
            }
            Insert::CapacityExceeded => {
                log::warn!("shader registry at capacity, dropping create_shader(id={id})");
            }
            Insert::Created => {
                self.check_mem_ref(code, idx);
            }
        }
    }

    fn on_create_bind_group(&mut self, idx: u32, id: u16, entries: MemRef) {
        match Registry::insert(&mut self.registry.bind_groups, id, SimpleRecord { created_at: idx }) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
            }
            Insert::CapacityExceeded => {
                log::warn!("bind group registry at capacity, dropping create_bind_group(id={id})");
            }
            Insert::Created => {
                self.check_mem_ref(entries, idx);
                self.check_suspicious_descriptor(entries.len, idx);
            }
        }
    }

    fn on_create_texture_view(&mut self, idx: u32, id: u16, texture_id: u16, desc: MemRef) {
        if !Self::is_sentinel(texture_id) {
            let present = self.registry.textures.contains_key(&texture_id);
            self.check_missing(texture_id, present, idx);
        }
        match Registry::insert(&mut self.registry.texture_views, id, SimpleRecord { created_at: idx }) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
            }
            Insert::CapacityExceeded => {
                log::warn!("texture view registry at capacity, dropping create_texture_view(id={id})");
            }
            Insert::Created => {
                self.check_mem_ref(desc, idx);
                self.check_suspicious_descriptor(desc.len, idx);
            }
        }
    }

    fn on_begin_render_pass(&mut self, idx: u32, color_id: u16, depth_id: u16) {
        if !Self::is_sentinel(color_id) {
            let present = self.registry.textures.contains_key(&color_id);
            self.check_missing(color_id, present, idx);
        }
        if !Self::is_sentinel(depth_id) {
            let present = self.registry.textures.contains_key(&depth_id);
            self.check_missing(depth_id, present, idx);
        }

        if self.pass_state != PassState::None {
            self.push_error(codes::NESTED_PASS, messages::NESTED_PASS, idx, None);
        } else {
            self.pass_state = PassState::Render;
            self.render_pass_count += 1;
            self.bound_pipeline = BoundPipeline::default();
            self.slots.clear();
        }
    }

    fn on_begin_compute_pass(&mut self, idx: u32) {
        if self.pass_state != PassState::None {
            self.push_error(codes::NESTED_PASS, messages::NESTED_PASS, idx, None);
        } else {
            self.pass_state = PassState::Compute;
            self.compute_pass_count += 1;
            self.bound_pipeline = BoundPipeline::default();
            self.slots.clear();
        }
    }

    fn on_end_pass(&mut self, idx: u32) {
        if self.pass_state == PassState::None {
            self.push_error(codes::PASS_MISMATCH, messages::PASS_NOT_OPEN, idx, None);
        } else {
            self.pass_state = PassState::None;
            self.bound_pipeline = BoundPipeline::default();
            self.slots.clear();
        }
    }

    fn on_submit(&mut self) {
        self.bound_pipeline = BoundPipeline::default();
        self.slots.clear();
    }

    fn on_set_pipeline(&mut self, idx: u32, id: u16) {
        let render = self.registry.render_pipelines.get(&id).copied();
        let compute = self.registry.compute_pipelines.get(&id).copied();

        let kind = match (render, compute) {
            (Some(_), _) => PipelineKind::Render,
            (None, Some(_)) => PipelineKind::Compute,
            (None, None) => {
                self.push_error(codes::MISSING_RESOURCE, messages::MISSING_RESOURCE, idx, Some(id));
                return;
            }
        };

        let expected_pass = match kind {
            PipelineKind::Render => PassState::Render,
            PipelineKind::Compute => PassState::Compute,
        };
        if self.pass_state != expected_pass {
            self.push_error(codes::STATE_VIOLATION, messages::PIPELINE_KIND_MISMATCH, idx, Some(id));
        }

        self.bound_pipeline = BoundPipeline { id: Some(id), kind: Some(kind) };
    }

    fn on_set_bind_group(&mut self, idx: u32, slot: u8, id: u16) {
        let present = self.registry.bind_groups.contains_key(&id);
        self.check_missing(id, present, idx);
        self.bind_groups_bound.insert(id);
        if let Some(entry) = self.slots.bind_groups.get_mut(slot as usize) {
            *entry = Some(id);
        } else {
            log::warn!("ignoring set_bind_group with out-of-range slot {slot}");
        }
    }

    fn on_set_vertex_buffer(&mut self, idx: u32, slot: u8, id: u16) {
        let present = self.registry.buffers.contains_key(&id);
        let ok = self.check_missing(id, present, idx);
        if ok {
            self.check_buffer_usage(id, BufferUsage::VERTEX, messages::BUFFER_MISSING_VERTEX_USAGE, idx);
        }
        self.vertex_buffer_ever_bound = true;
        if let Some(entry) = self.slots.vertex_buffers.get_mut(slot as usize) {
            *entry = Some(id);
        } else {
            log::warn!("ignoring set_vertex_buffer with out-of-range slot {slot}");
        }
    }

    fn on_set_index_buffer(&mut self, idx: u32, id: u16) {
        let present = self.registry.buffers.contains_key(&id);
        let ok = self.check_missing(id, present, idx);
        if ok {
            self.check_buffer_usage(id, BufferUsage::INDEX, messages::BUFFER_MISSING_INDEX_USAGE, idx);
        }
    }

    fn on_draw(&mut self, idx: u32, vertex_count: u32, instance_count: u32) {
        self.draw_count += 1;
        if !self.state_ok_for_draw(idx) {
            return;
        }
        if vertex_count == 0 || instance_count == 0 {
            self.push_warning(codes::ZERO_COUNT, messages::ZERO_COUNT, idx, None);
        }
    }

    fn on_draw_indexed(&mut self, idx: u32, index_count: u32, instance_count: u32) {
        self.draw_count += 1;
        if !self.state_ok_for_draw(idx) {
            return;
        }
        if index_count == 0 || instance_count == 0 {
            self.push_warning(codes::ZERO_COUNT, messages::ZERO_COUNT, idx, None);
        }
    }

    fn state_ok_for_draw(&mut self, idx: u32) -> bool {
        if self.pass_state != PassState::Render {
            self.push_error(codes::STATE_VIOLATION, messages::DRAW_OUTSIDE_RENDER_PASS, idx, None);
            return false;
        }
        if self.bound_pipeline.id.is_none() {
            self.push_error(codes::STATE_VIOLATION, messages::DRAW_WITHOUT_PIPELINE, idx, None);
            return false;
        }
        true
    }

    fn on_dispatch(&mut self, idx: u32, x: u32, y: u32, z: u32) {
        self.dispatch_count += 1;

        let state_ok = if self.pass_state != PassState::Compute {
            self.push_error(codes::STATE_VIOLATION, messages::DISPATCH_OUTSIDE_COMPUTE_PASS, idx, None);
            false
        } else if self.bound_pipeline.id.is_none() {
            self.push_error(codes::STATE_VIOLATION, messages::DISPATCH_WITHOUT_PIPELINE, idx, None);
            false
        } else {
            true
        };

        if !state_ok {
            return;
        }

        if x == 0 || y == 0 || z == 0 {
            self.push_warning(codes::ZERO_COUNT, messages::ZERO_COUNT, idx, None);
        }

        let max_workgroups = default_limits().max_compute_workgroups_per_dimension;
        if x > max_workgroups {
            self.push_error(codes::PASS_MISMATCH, messages::WORKGROUP_COUNT_EXCEEDED, idx, None);
        }
        if y > max_workgroups {
            self.push_error(codes::PASS_MISMATCH, messages::WORKGROUP_COUNT_EXCEEDED, idx, None);
        }
        if z > max_workgroups {
            self.push_error(codes::PASS_MISMATCH, messages::WORKGROUP_COUNT_EXCEEDED, idx, None);
        }
    }

    fn on_write_buffer(&mut self, idx: u32, id: u16, data: MemRef) {
        let present = self.registry.buffers.contains_key(&id);
        let ok = self.check_missing(id, present, idx);
        if ok {
            self.check_buffer_usage(id, BufferUsage::COPY_DST, messages::BUFFER_MISSING_COPY_DST_USAGE, idx);
        }
        self.buffers_written.insert(id);
        self.check_mem_ref(data, idx);
    }

    fn on_write_time_uniform(&mut self, idx: u32, id: u16) {
        let present = self.registry.buffers.contains_key(&id);
        let ok = self.check_missing(id, present, idx);
        if ok {
            self.check_buffer_usage(id, BufferUsage::COPY_DST, messages::BUFFER_MISSING_COPY_DST_USAGE, idx);
        }
        self.buffers_written.insert(id);
    }

    fn on_copy_buffer_to_buffer(&mut self, idx: u32, src_id: u16, dst_id: u16) {
        let dst_present = self.registry.buffers.contains_key(&dst_id);
        if self.check_missing(dst_id, dst_present, idx) {
            self.check_buffer_usage(dst_id, BufferUsage::COPY_DST, messages::BUFFER_MISSING_COPY_DST_USAGE, idx);
        }
        self.buffers_written.insert(dst_id);
        let src_present = self.registry.buffers.contains_key(&src_id);
        if self.check_missing(src_id, src_present, idx) {
            self.check_buffer_usage(src_id, BufferUsage::COPY_SRC, messages::BUFFER_MISSING_COPY_SRC_USAGE, idx);
        }
        if src_id == dst_id {
            self.push_error(codes::INVALID_DESCRIPTOR, messages::COPY_SAME_BUFFER, idx, Some(src_id));
        }
    }

    fn on_copy_texture_to_texture(&mut self, idx: u32, src_id: u16, dst_id: u16) {
        if !Self::is_sentinel(dst_id) {
            let present = self.registry.textures.contains_key(&dst_id);
            self.check_missing(dst_id, present, idx);
        }
        if !Self::is_sentinel(src_id) {
            let present = self.registry.textures.contains_key(&src_id);
            self.check_missing(src_id, present, idx);
        }
    }

    fn on_copy_external_image_to_texture(&mut self, idx: u32, bitmap_id: u16, texture_id: u16) {
        let present = self.registry.image_bitmaps.contains_key(&bitmap_id);
        self.check_missing(bitmap_id, present, idx);
        if !Self::is_sentinel(texture_id) {
            let present = self.registry.textures.contains_key(&texture_id);
            self.check_missing(texture_id, present, idx);
        }
    }

    fn on_write_buffer_from_wasm(&mut self, idx: u32, buffer_id: u16, wasm: MemRef) {
        let present = self.registry.buffers.contains_key(&buffer_id);
        let ok = self.check_missing(buffer_id, present, idx);
        if ok {
            self.check_buffer_usage(buffer_id, BufferUsage::COPY_DST, messages::BUFFER_MISSING_COPY_DST_USAGE, idx);
        }
        self.buffers_written.insert(buffer_id);
        self.check_mem_ref(wasm, idx);
    }

    fn on_init_wasm_module(&mut self, idx: u32, module_id: u16, data: MemRef) {
        match Registry::insert(&mut self.registry.wasm_modules, module_id, SimpleRecord { created_at: idx }) {
            Insert::Duplicate => {
                self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(module_id));
            }
            Insert::CapacityExceeded => {
                log::warn!("wasm module registry at capacity, dropping init_wasm_module(id={module_id})");
            }
            Insert::Created => {
                self.check_mem_ref(data, idx);
            }
        }
    }

    fn on_call_wasm_func(&mut self, idx: u32, module_id: u16, func: MemRef, args: MemRef) {
        let present = self.registry.wasm_modules.contains_key(&module_id);
        self.check_missing(module_id, present, idx);
        self.check_mem_ref(func, idx);
        self.check_mem_ref(args, idx);
    }

    fn on_create_typed_array(&mut self, idx: u32, id: u16) {
        if Registry::insert(&mut self.registry.typed_arrays, id, SimpleRecord { created_at: idx }) == Insert::Duplicate {
            self.push_error(codes::DUPLICATE_ID, messages::DUPLICATE_ID, idx, Some(id));
        }
    }

    fn on_fill(&mut self, idx: u32, array_id: u16) {
        let present = self.registry.typed_arrays.contains_key(&array_id);
        self.check_missing(array_id, present, idx);
    }

    fn on_fill_expression(&mut self, idx: u32, array_id: u16, expr_ptr: u32, expr_len: u16) {
        let present = self.registry.typed_arrays.contains_key(&array_id);
        self.check_missing(array_id, present, idx);
        self.check_mem_ref(MemRef { ptr: expr_ptr, len: expr_len as u32 }, idx);
    }

    fn on_write_buffer_from_array(&mut self, idx: u32, buffer_id: u16, array_id: u16) {
        let present = self.registry.buffers.contains_key(&buffer_id);
        let ok = self.check_missing(buffer_id, present, idx);
        if ok {
            self.check_buffer_usage(buffer_id, BufferUsage::COPY_DST, messages::BUFFER_MISSING_COPY_DST_USAGE, idx);
        }
        self.buffers_written.insert(buffer_id);
        let array_present = self.registry.typed_arrays.contains_key(&array_id);
        self.check_missing(array_id, array_present, idx);
    }
}
