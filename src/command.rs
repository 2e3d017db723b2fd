//! The typed command model (spec §3, §6): one [`Opcode`] per wire tag, one
//! [`Params`] variant per distinct payload shape.

use bitflags::bitflags;

/// Identifier sentinel denoting the implicit canvas/swapchain surface.
/// Never a real registry key.
pub const CANVAS_SENTINEL: u16 = 0xFFFF;

bitflags! {
    /// Buffer usage bits, exactly as defined by WebGPU (spec §4.5).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u8 {
        const MAP_READ  = 0x01;
        const MAP_WRITE = 0x02;
        const COPY_SRC  = 0x04;
        const COPY_DST  = 0x08;
        const INDEX     = 0x10;
        const VERTEX    = 0x20;
        const UNIFORM   = 0x40;
        const STORAGE   = 0x80;
    }
}

bitflags! {
    /// Texture usage bits (spec §4.5).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u8 {
        const COPY_SRC          = 0x01;
        const COPY_DST          = 0x02;
        const TEXTURE_BINDING   = 0x04;
        const STORAGE_BINDING   = 0x08;
        const RENDER_ATTACHMENT = 0x10;
    }
}

/// The closed opcode enumeration, one variant per wire tag in spec §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    CreateBuffer = 0,
    CreateTexture = 1,
    CreateSampler = 2,
    CreateBindGroupLayout = 3,
    CreatePipelineLayout = 4,
    CreateQuerySet = 5,
    CreateRenderBundle = 6,
    CreateRenderPipeline = 7,
    CreateComputePipeline = 8,
    CreateImageBitmap = 9,
    CreateShader = 10,
    CreateBindGroup = 11,
    CreateTextureView = 12,
    BeginRenderPass = 13,
    BeginComputePass = 14,
    EndPass = 15,
    Submit = 16,
    End = 17,
    SetPipeline = 18,
    SetBindGroup = 19,
    SetVertexBuffer = 20,
    SetIndexBuffer = 21,
    Draw = 22,
    DrawIndexed = 23,
    Dispatch = 24,
    ExecuteBundles = 25,
    WriteBuffer = 26,
    WriteTimeUniform = 27,
    CopyBufferToBuffer = 28,
    CopyTextureToTexture = 29,
    CopyExternalImageToTexture = 30,
    WriteBufferFromWasm = 31,
    InitWasmModule = 32,
    CallWasmFunc = 33,
    CreateTypedArray = 34,
    FillRandom = 35,
    FillConstant = 36,
    FillExpression = 37,
    WriteBufferFromArray = 38,
}

impl Opcode {
    /// Decode a wire opcode tag; `None` for a tag outside the closed set.
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        use Opcode::*;
        Some(match tag {
            0 => CreateBuffer,
            1 => CreateTexture,
            2 => CreateSampler,
            3 => CreateBindGroupLayout,
            4 => CreatePipelineLayout,
            5 => CreateQuerySet,
            6 => CreateRenderBundle,
            7 => CreateRenderPipeline,
            8 => CreateComputePipeline,
            9 => CreateImageBitmap,
            10 => CreateShader,
            11 => CreateBindGroup,
            12 => CreateTextureView,
            13 => BeginRenderPass,
            14 => BeginComputePass,
            15 => EndPass,
            16 => Submit,
            17 => End,
            18 => SetPipeline,
            19 => SetBindGroup,
            20 => SetVertexBuffer,
            21 => SetIndexBuffer,
            22 => Draw,
            23 => DrawIndexed,
            24 => Dispatch,
            25 => ExecuteBundles,
            26 => WriteBuffer,
            27 => WriteTimeUniform,
            28 => CopyBufferToBuffer,
            29 => CopyTextureToTexture,
            30 => CopyExternalImageToTexture,
            31 => WriteBufferFromWasm,
            32 => InitWasmModule,
            33 => CallWasmFunc,
            34 => CreateTypedArray,
            35 => FillRandom,
            36 => FillConstant,
            37 => FillExpression,
            38 => WriteBufferFromArray,
            _ => return None,
        })
    }

    /// Fixed payload size in bytes, tag excluded. `None` for the two
    /// variable-length opcodes (`execute_bundles`, whose size depends on a
    /// leading count byte, is handled separately by the parser; it is
    /// listed here as its minimum one-byte header).
    pub(crate) fn fixed_payload_len(self) -> usize {
        use Opcode::*;
        match self {
            CreateBuffer => 7,
            CreateTexture | CreateSampler | CreateBindGroupLayout | CreatePipelineLayout
            | CreateQuerySet | CreateRenderBundle | CreateRenderPipeline
            | CreateComputePipeline | CreateImageBitmap => 10,
            CreateShader => 10,
            CreateBindGroup => 12,
            CreateTextureView => 12,
            BeginRenderPass => 6,
            BeginComputePass | EndPass | Submit | End => 0,
            SetPipeline => 2,
            SetBindGroup | SetVertexBuffer => 3,
            SetIndexBuffer => 3,
            Draw => 16,
            DrawIndexed => 20,
            Dispatch => 12,
            ExecuteBundles => 1,
            WriteBuffer => 14,
            WriteTimeUniform => 8,
            CopyBufferToBuffer => 16,
            CopyTextureToTexture => 8,
            CopyExternalImageToTexture => 9,
            WriteBufferFromWasm => 14,
            InitWasmModule => 10,
            CallWasmFunc => 20,
            CreateTypedArray => 7,
            FillRandom | FillConstant => 15,
            FillExpression => 17,
            WriteBufferFromArray => 8,
        }
    }
}

/// A `{ptr, len}` reference into WASM linear memory, shared by every
/// command that carries one (spec §4.5 "Bounds checking (E004)").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRef {
    pub ptr: u32,
    pub len: u32,
}

/// The decoded payload, one variant per distinct wire shape (spec §4.2's
/// "tie-break" groups all share the `CreateResource` variant; the
/// dispatcher tells them apart via the owning [`Command`]'s `opcode`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Params {
    Empty,
    CreateBuffer {
        id: u16,
        size: u32,
        usage: u8,
    },
    /// Shared by every `create_*` opcode using the 10-byte
    /// `{id, desc_ptr, desc_len}` shape.
    CreateResource {
        id: u16,
        desc: MemRef,
    },
    CreateShader {
        id: u16,
        code: MemRef,
    },
    CreateBindGroup {
        id: u16,
        layout_id: u16,
        entries: MemRef,
    },
    CreateTextureView {
        id: u16,
        texture_id: u16,
        desc: MemRef,
    },
    BeginRenderPass {
        color_id: u16,
        load_op: u8,
        store_op: u8,
        depth_id: u16,
    },
    SetPipeline {
        id: u16,
    },
    /// Shared by `set_bind_group` and `set_vertex_buffer`.
    SetSlot {
        slot: u8,
        id: u16,
    },
    SetIndexBuffer {
        id: u16,
        format: u8,
    },
    Draw {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: u32,
        first_instance: u32,
    },
    Dispatch {
        x: u32,
        y: u32,
        z: u32,
    },
    ExecuteBundles {
        bundle_ids: Vec<u16>,
    },
    WriteBuffer {
        id: u16,
        offset: u32,
        data: MemRef,
    },
    WriteTimeUniform {
        id: u16,
        offset: u32,
        size: u16,
    },
    CopyBufferToBuffer {
        src_id: u16,
        src_offset: u32,
        dst_id: u16,
        dst_offset: u32,
        size: u32,
    },
    CopyTextureToTexture {
        src_id: u16,
        dst_id: u16,
        width: u16,
        height: u16,
    },
    CopyExternalImageToTexture {
        bitmap_id: u16,
        texture_id: u16,
        mip_level: u8,
        origin_x: u16,
        origin_y: u16,
    },
    WriteBufferFromWasm {
        buffer_id: u16,
        buffer_offset: u32,
        wasm: MemRef,
    },
    InitWasmModule {
        module_id: u16,
        data: MemRef,
    },
    CallWasmFunc {
        call_id: u16,
        module_id: u16,
        func: MemRef,
        args: MemRef,
    },
    CreateTypedArray {
        id: u16,
        array_type: u8,
        size: u32,
    },
    /// Shared by `fill_random` and `fill_constant`.
    Fill {
        array_id: u16,
        offset: u32,
        count: u32,
        stride: u8,
        data_ptr: u32,
    },
    FillExpression {
        array_id: u16,
        offset: u32,
        count: u32,
        stride: u8,
        expr_ptr: u32,
        expr_len: u16,
    },
    WriteBufferFromArray {
        buffer_id: u16,
        buffer_offset: u32,
        array_id: u16,
    },
}

/// An immutable, ordinal-indexed command (spec §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub index: u32,
    pub opcode: Opcode,
    pub params: Params,
}
