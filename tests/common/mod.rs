//! Shared byte-stream builder for the integration tests. Mirrors the
//! wire layouts in spec §6 / `src/command.rs` one opcode at a time so a
//! scenario reads as a sequence of calls rather than hand-assembled bytes.

use gpu_trace_validator::command::Opcode;

const HEADER_LEN: usize = 8;

pub struct StreamBuilder {
    body: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn op(&mut self, opcode: Opcode) -> &mut Self {
        self.body.push(opcode as u8);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.body.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.body.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u8(&mut self, v: u8) -> &mut Self {
        self.body.push(v);
        self
    }

    pub fn create_buffer(mut self, id: u16, size: u32, usage: u8) -> Self {
        self.op(Opcode::CreateBuffer).u16(id).u32(size).u8(usage);
        self
    }

    pub fn create_resource(mut self, opcode: Opcode, id: u16, desc_ptr: u32, desc_len: u32) -> Self {
        self.op(opcode).u16(id).u32(desc_ptr).u32(desc_len);
        self
    }

    pub fn create_shader(mut self, id: u16, code_ptr: u32, code_len: u32) -> Self {
        self.op(Opcode::CreateShader).u16(id).u32(code_ptr).u32(code_len);
        self
    }

    pub fn create_bind_group(mut self, id: u16, layout_id: u16, entries_ptr: u32, entries_len: u32) -> Self {
        self.op(Opcode::CreateBindGroup).u16(id).u16(layout_id).u32(entries_ptr).u32(entries_len);
        self
    }

    pub fn create_texture_view(mut self, id: u16, texture_id: u16, desc_ptr: u32, desc_len: u32) -> Self {
        self.op(Opcode::CreateTextureView).u16(id).u16(texture_id).u32(desc_ptr).u32(desc_len);
        self
    }

    pub fn begin_render_pass(mut self, color_id: u16, load_op: u8, store_op: u8, depth_id: u16) -> Self {
        self.op(Opcode::BeginRenderPass).u16(color_id).u8(load_op).u8(store_op).u16(depth_id);
        self
    }

    pub fn begin_compute_pass(mut self) -> Self {
        self.op(Opcode::BeginComputePass);
        self
    }

    pub fn end_pass(mut self) -> Self {
        self.op(Opcode::EndPass);
        self
    }

    pub fn submit(mut self) -> Self {
        self.op(Opcode::Submit);
        self
    }

    pub fn end(mut self) -> Self {
        self.op(Opcode::End);
        self
    }

    pub fn set_pipeline(mut self, id: u16) -> Self {
        self.op(Opcode::SetPipeline).u16(id);
        self
    }

    pub fn set_bind_group(mut self, slot: u8, id: u16) -> Self {
        self.op(Opcode::SetBindGroup).u8(slot).u16(id);
        self
    }

    pub fn set_vertex_buffer(mut self, slot: u8, id: u16) -> Self {
        self.op(Opcode::SetVertexBuffer).u8(slot).u16(id);
        self
    }

    pub fn set_index_buffer(mut self, id: u16, format: u8) -> Self {
        self.op(Opcode::SetIndexBuffer).u16(id).u8(format);
        self
    }

    pub fn draw(mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> Self {
        self.op(Opcode::Draw).u32(vertex_count).u32(instance_count).u32(first_vertex).u32(first_instance);
        self
    }

    pub fn draw_indexed(
        mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: u32,
        first_instance: u32,
    ) -> Self {
        self.op(Opcode::DrawIndexed)
            .u32(index_count)
            .u32(instance_count)
            .u32(first_index)
            .u32(base_vertex)
            .u32(first_instance);
        self
    }

    pub fn dispatch(mut self, x: u32, y: u32, z: u32) -> Self {
        self.op(Opcode::Dispatch).u32(x).u32(y).u32(z);
        self
    }

    pub fn execute_bundles(mut self, ids: &[u16]) -> Self {
        self.op(Opcode::ExecuteBundles).u8(ids.len() as u8);
        for id in ids {
            self.u16(*id);
        }
        self
    }

    pub fn write_buffer(mut self, id: u16, offset: u32, data_ptr: u32, data_len: u32) -> Self {
        self.op(Opcode::WriteBuffer).u16(id).u32(offset).u32(data_ptr).u32(data_len);
        self
    }

    pub fn write_time_uniform(mut self, id: u16, offset: u32, size: u16) -> Self {
        self.op(Opcode::WriteTimeUniform).u16(id).u32(offset).u16(size);
        self
    }

    pub fn copy_buffer_to_buffer(mut self, src_id: u16, src_offset: u32, dst_id: u16, dst_offset: u32, size: u32) -> Self {
        self.op(Opcode::CopyBufferToBuffer).u16(src_id).u32(src_offset).u16(dst_id).u32(dst_offset).u32(size);
        self
    }

    pub fn copy_texture_to_texture(mut self, src_id: u16, dst_id: u16, width: u16, height: u16) -> Self {
        self.op(Opcode::CopyTextureToTexture).u16(src_id).u16(dst_id).u16(width).u16(height);
        self
    }

    pub fn copy_external_image_to_texture(
        mut self,
        bitmap_id: u16,
        texture_id: u16,
        mip_level: u8,
        origin_x: u16,
        origin_y: u16,
    ) -> Self {
        self.op(Opcode::CopyExternalImageToTexture)
            .u16(bitmap_id)
            .u16(texture_id)
            .u8(mip_level)
            .u16(origin_x)
            .u16(origin_y);
        self
    }

    pub fn write_buffer_from_wasm(mut self, buffer_id: u16, buffer_offset: u32, wasm_ptr: u32, size: u32) -> Self {
        self.op(Opcode::WriteBufferFromWasm).u16(buffer_id).u32(buffer_offset).u32(wasm_ptr).u32(size);
        self
    }

    pub fn init_wasm_module(mut self, module_id: u16, data_ptr: u32, data_len: u32) -> Self {
        self.op(Opcode::InitWasmModule).u16(module_id).u32(data_ptr).u32(data_len);
        self
    }

    pub fn call_wasm_func(
        mut self,
        call_id: u16,
        module_id: u16,
        func_ptr: u32,
        func_len: u32,
        args_ptr: u32,
        args_len: u32,
    ) -> Self {
        self.op(Opcode::CallWasmFunc)
            .u16(call_id)
            .u16(module_id)
            .u32(func_ptr)
            .u32(func_len)
            .u32(args_ptr)
            .u32(args_len);
        self
    }

    pub fn create_typed_array(mut self, id: u16, array_type: u8, size: u32) -> Self {
        self.op(Opcode::CreateTypedArray).u16(id).u8(array_type).u32(size);
        self
    }

    pub fn fill(mut self, opcode: Opcode, array_id: u16, offset: u32, count: u32, stride: u8, data_ptr: u32) -> Self {
        self.op(opcode).u16(array_id).u32(offset).u32(count).u8(stride).u32(data_ptr);
        self
    }

    pub fn fill_expression(
        mut self,
        array_id: u16,
        offset: u32,
        count: u32,
        stride: u8,
        expr_ptr: u32,
        expr_len: u16,
    ) -> Self {
        self.op(Opcode::FillExpression)
            .u16(array_id)
            .u32(offset)
            .u32(count)
            .u8(stride)
            .u32(expr_ptr)
            .u16(expr_len);
        self
    }

    pub fn write_buffer_from_array(mut self, buffer_id: u16, buffer_offset: u32, array_id: u16) -> Self {
        self.op(Opcode::WriteBufferFromArray).u16(buffer_id).u32(buffer_offset).u16(array_id);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let total_len = (HEADER_LEN + self.body.len()) as u32;
        let mut out = Vec::with_capacity(total_len as usize);
        out.extend_from_slice(&total_len.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}
