// src/render.rs
//! Instanced unit-cube renderer.
//!
//! Every proxy draws as a unit cube scaled by its transform, colored flat
//! with a single directional lambert term. One instanced draw per frame.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform};
use crate::scene::{InstanceRaw, Scene};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.12,
    b: 0.18,
    a: 1.0,
};

const SHADER_WGSL: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    position: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;

struct VertexIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceIn {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
};

struct VertexOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexIn, instance: InstanceIn) -> VertexOut {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: VertexOut;
    let world = model * vec4<f32>(vertex.position, 1.0);
    out.clip_position = camera.view_proj * world;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(-0.5, 0.8, 0.4));
    let ndl = max(dot(in.world_normal, light_dir), 0.0);
    let shade = 0.35 + 0.65 * ndl;
    return vec4<f32>(in.color.rgb * shade, in.color.a);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

const fn v(position: [f32; 3], normal: [f32; 3]) -> Vertex {
    Vertex { position, normal }
}

// Unit cube centered at the origin, six faces, counter-clockwise winding.
#[rustfmt::skip]
const CUBE_VERTICES: [Vertex; 36] = [
    // +X
    v([0.5, -0.5, -0.5], [1.0, 0.0, 0.0]), v([0.5, 0.5, -0.5], [1.0, 0.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]), v([0.5, -0.5, -0.5], [1.0, 0.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]), v([0.5, -0.5, 0.5], [1.0, 0.0, 0.0]),
    // -X
    v([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0]), v([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0]),
    v([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0]), v([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0]),
    v([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0]), v([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]),
    // +Y
    v([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0]), v([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
    v([0.5, 0.5, 0.5], [0.0, 1.0, 0.0]), v([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    v([0.5, 0.5, 0.5], [0.0, 1.0, 0.0]), v([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    // -Y
    v([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0]), v([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    v([0.5, -0.5, -0.5], [0.0, -1.0, 0.0]), v([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
    v([0.5, -0.5, -0.5], [0.0, -1.0, 0.0]), v([0.5, -0.5, 0.5], [0.0, -1.0, 0.0]),
    // +Z
    v([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0]), v([0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
    v([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]), v([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0]),
    v([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]), v([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
    // -Z
    v([0.5, -0.5, -0.5], [0.0, 0.0, -1.0]), v([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    v([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0]), v([0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    v([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0]), v([0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
];

const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
};

const INSTANCE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![
        3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4, 7 => Float32x4
    ],
};

pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<InstanceRaw>,
    depth_view: wgpu::TextureView,
}

impl Renderer {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_WGSL.into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera uniform"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube pipeline layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                compilation_options: Default::default(),
                buffers: &[VERTEX_LAYOUT, INSTANCE_LAYOUT],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
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
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube vertices"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_capacity = 1024;
        let instance_buffer = Self::make_instance_buffer(device, instance_capacity);
        let depth_view = Self::make_depth_view(device, config);

        Self {
            pipeline,
            vertex_buffer,
            camera_buffer,
            camera_bind_group,
            instance_buffer,
            instance_capacity,
            instances: Vec::new(),
            depth_view,
        }
    }

    fn make_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn make_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) {
        self.depth_view = Self::make_depth_view(device, config);
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::Surface<'_>,
        config: &wgpu::SurfaceConfiguration,
        scene: Option<&Scene>,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                surface.get_current_texture()?
            }
            Err(err) => return Err(err),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );

        self.instances.clear();
        if let Some(scene) = scene {
            scene.collect_instances(&mut self.instances);
        }
        if self.instances.len() > self.instance_capacity {
            self.instance_capacity = self.instances.len().next_power_of_two();
            self.instance_buffer = Self::make_instance_buffer(device, self.instance_capacity);
        }
        if !self.instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.instances.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.draw(0..CUBE_VERTICES.len() as u32, 0..self.instances.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
