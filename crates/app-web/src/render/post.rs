use super::helpers;
use super::targets::{RenderTargets, HDR_FORMAT};
use crate::constants::{BLOOM_STRENGTH, BLOOM_THRESHOLD, EXPOSURE};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    texel: [f32; 2],
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    exposure: f32,
    _pad: f32,
}

/// Uniform buffers, one per pass so each keeps its own blur direction
/// until the encoder is submitted.
struct PassUniforms {
    bright: wgpu::Buffer,
    blur_h: wgpu::Buffer,
    blur_v: wgpu::Buffer,
    composite: wgpu::Buffer,
}

/// Bind groups that reference the current render targets.
struct PassBindGroups {
    bright: wgpu::BindGroup,    // hdr -> bloom_a
    blur_h: wgpu::BindGroup,    // bloom_a -> bloom_b
    blur_v: wgpu::BindGroup,    // bloom_b -> bloom_a
    composite: wgpu::BindGroup, // hdr + bloom_a -> swapchain
    bloom: wgpu::BindGroup,
}

/// Bright pass, separable blur and composite.
pub(crate) struct PostChain {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    uniforms: PassUniforms,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: PassBindGroups,
}

impl PostChain {
    pub(crate) fn new(
        device: &wgpu::Device,
        swap_format: wgpu::TextureFormat,
        targets: &RenderTargets,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(app_core::POST_WGSL.into()),
        });
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                helpers::texture_entry(0),
                helpers::sampler_entry(1),
                helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[helpers::texture_entry(0), helpers::sampler_entry(1)],
        });
        let uniform = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let uniforms = PassUniforms {
            bright: uniform("post_bright"),
            blur_h: uniform("post_blur_h"),
            blur_v: uniform("post_blur_v"),
            composite: uniform("post_composite"),
        };

        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            "bright_pipeline",
            &pl_single,
            &shader,
            "fs_bright",
            HDR_FORMAT,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            "blur_pipeline",
            &pl_single,
            &shader,
            "fs_blur",
            HDR_FORMAT,
            None,
        );
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            "composite_pipeline",
            &pl_composite,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let sampler = helpers::linear_sampler(device, "post_sampler");
        let groups = build_groups(device, &bgl0, &bgl1, &sampler, &uniforms, targets);

        Self {
            bgl0,
            bgl1,
            sampler,
            uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            groups,
        }
    }

    /// Rebind after the render targets were recreated.
    pub(crate) fn rebind(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.groups = build_groups(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            &self.uniforms,
            targets,
        );
    }

    pub(crate) fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        swap_view: &wgpu::TextureView,
    ) {
        let base = PostUniforms {
            texel: targets.bloom_texel(),
            blur_dir: [0.0, 0.0],
            bloom_strength: BLOOM_STRENGTH,
            threshold: BLOOM_THRESHOLD,
            exposure: EXPOSURE,
            _pad: 0.0,
        };
        let write = |buffer: &wgpu::Buffer, blur_dir: [f32; 2]| {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&PostUniforms { blur_dir, ..base }));
        };
        write(&self.uniforms.bright, [0.0, 0.0]);
        write(&self.uniforms.blur_h, [1.0, 0.0]);
        write(&self.uniforms.blur_v, [0.0, 1.0]);
        write(&self.uniforms.composite, [0.0, 0.0]);

        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &self.groups.bright,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &self.groups.blur_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &self.groups.blur_v,
            None,
        );
        blit(
            encoder,
            "composite",
            swap_view,
            &self.composite_pipeline,
            &self.groups.composite,
            Some(&self.groups.bloom),
        );
    }
}

fn source_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}

fn build_groups(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    uniforms: &PassUniforms,
    targets: &RenderTargets,
) -> PassBindGroups {
    let bloom = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout: bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    PassBindGroups {
        bright: source_group(
            device,
            "bg_bright",
            bgl0,
            &targets.hdr_view,
            sampler,
            &uniforms.bright,
        ),
        blur_h: source_group(
            device,
            "bg_blur_h",
            bgl0,
            &targets.bloom_a_view,
            sampler,
            &uniforms.blur_h,
        ),
        blur_v: source_group(
            device,
            "bg_blur_v",
            bgl0,
            &targets.bloom_b_view,
            sampler,
            &uniforms.blur_v,
        ),
        composite: source_group(
            device,
            "bg_composite",
            bgl0,
            &targets.hdr_view,
            sampler,
            &uniforms.composite,
        ),
        bloom,
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
