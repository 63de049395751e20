use super::helpers;
use super::targets::{DEPTH_FORMAT, HDR_FORMAT};
use crate::constants::MEDIA_TEXTURE_FORMAT;
use crate::media::MediaElement;
use app_core::constants::{MEDIA_BORDER_COLOR, MEDIA_TINT};
use app_core::{Camera, MediaGallery};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PlaneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    size: [f32; 4],
    tint: [f32; 4],
    border_color: [f32; 4],
}

/// Scale below which a plane is considered hidden and not drawn.
const HIDDEN_SCALE: f32 = 1e-3;

struct PlaneGpu {
    uniforms: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    /// Whether `texture` holds decoded content.
    filled: bool,
    visible: bool,
}

/// Framed, depth-writing quads for the media ring.
pub(crate) struct PlanePass {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vb: wgpu::Buffer,
    planes: Vec<PlaneGpu>,
}

impl PlanePass {
    pub(crate) fn new(device: &wgpu::Device, count: usize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("media_shader"),
            source: wgpu::ShaderSource::Wgsl(app_core::MEDIA_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("media_bgl"),
            entries: &[
                helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                helpers::texture_entry(1),
                helpers::sampler_entry(2),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("media_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("media_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[helpers::quad_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let sampler = helpers::linear_sampler(device, "media_sampler");
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("media_quad_vb"),
            contents: bytemuck::cast_slice(&helpers::QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mut pass = Self {
            pipeline,
            bgl,
            sampler,
            quad_vb,
            planes: Vec::with_capacity(count),
        };
        for i in 0..count {
            let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("media_uniforms"),
                size: std::mem::size_of::<PlaneUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let texture = pass.create_texture(device, i, 1, 1);
            let bind_group = pass.bind(device, &uniforms, &texture);
            pass.planes.push(PlaneGpu {
                uniforms,
                texture,
                bind_group,
                filled: false,
                visible: false,
            });
        }
        pass
    }

    fn create_texture(&self, device: &wgpu::Device, index: usize, width: u32, height: u32) -> wgpu::Texture {
        let label = format!("media_tex_{}", index);
        let (texture, _) = helpers::create_color_texture(
            device,
            &label,
            width,
            height,
            MEDIA_TEXTURE_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        texture
    }

    fn bind(&self, device: &wgpu::Device, uniforms: &wgpu::Buffer, texture: &wgpu::Texture) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("media_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Refresh textures from the DOM elements and write per-plane uniforms.
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        gallery: &MediaGallery,
        elements: &[MediaElement],
    ) {
        let view_proj = camera.view_proj().to_cols_array_2d();
        for (i, item) in gallery.items.iter().enumerate() {
            let Some(element) = elements.get(i) else {
                continue;
            };
            let visible = item.current_scale > HIDDEN_SCALE;
            if visible {
                self.refresh_texture(device, queue, i, element);
            }
            let Some(plane) = self.planes.get_mut(i) else {
                continue;
            };
            plane.visible = visible;
            if !visible {
                continue;
            }
            let (w, h) = item.plane_size(&gallery.config);
            let u = PlaneUniforms {
                view_proj,
                model: item.model_matrix().to_cols_array_2d(),
                size: [w, h, gallery.config.border, if plane.filled { 1.0 } else { 0.0 }],
                tint: MEDIA_TINT,
                border_color: MEDIA_BORDER_COLOR,
            };
            queue.write_buffer(&plane.uniforms, 0, bytemuck::bytes_of(&u));
        }
    }

    fn refresh_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        index: usize,
        element: &MediaElement,
    ) {
        if index >= self.planes.len() {
            return;
        }
        let Some((width, height)) = element.ready_size() else {
            return;
        };
        // Still images only need one copy.
        if self.planes[index].filled && !element.is_video() {
            return;
        }
        let size = self.planes[index].texture.size();
        if size.width != width || size.height != height {
            let texture = self.create_texture(device, index, width, height);
            let bind_group = self.bind(device, &self.planes[index].uniforms, &texture);
            let plane = &mut self.planes[index];
            plane.texture = texture;
            plane.bind_group = bind_group;
        }
        let plane = &mut self.planes[index];
        queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: element.external_source(),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &plane.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        plane.filled = true;
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        for plane in self.planes.iter().filter(|p| p.visible) {
            rpass.set_bind_group(0, &plane.bind_group, &[]);
            rpass.draw(0..6, 0..1);
        }
    }
}
