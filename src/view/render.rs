use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::controller::{FrameView, Renderer};
use crate::error::RenderError;
use crate::view::gpu_init::GpuContext;
use crate::view::hud;
use crate::view::mesh::{create_cube_mesh, create_plane_mesh, create_sphere_mesh, MeshBuffer, Vertex};

const BALL_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GROUND_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const OBSTACLE_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad1: f32,
    pub _pad2: f32,
    pub _pad3: f32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub transform: [[f32; 4]; 4],
}

impl From<Mat4> for TransformUniform {
    fn from(m: Mat4) -> Self {
        Self { transform: m.to_cols_array_2d() }
    }
}

// Shared graphics setup
pub struct CameraResources {
    pub camera_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub camera_bind_group: wgpu::BindGroup,
}

/// Per-object transform uniform and its bind group
struct ModelSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_camera_resources(device: &wgpu::Device) -> CameraResources {
    let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("lighting_buffer"),
        size: std::mem::size_of::<LightingUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX),
            uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
        ],
    });

    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

pub fn create_scene_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_bgl: &wgpu::BindGroupLayout,
    model_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[camera_bgl, model_bgl],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// wgpu-backed renderer: red ball, green ground, blue boxes, egui HUD on top
pub struct WgpuRenderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    camera: CameraResources,
    model_bgl: wgpu::BindGroupLayout,

    sphere: MeshBuffer,
    cube: MeshBuffer,
    plane: MeshBuffer,
    ground_slot: ModelSlot,
    ball_slot: ModelSlot,
    obstacle_slots: Vec<ModelSlot>,

    egui_ctx: egui::Context,
    egui_renderer: egui_wgpu::Renderer,
    pixels_per_point: f32,
    elapsed: f64,
}

impl WgpuRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let device = gpu.device.as_ref();
        let (_, depth_view) = create_depth_texture(device, gpu.config.width, gpu.config.height);

        let camera = create_camera_resources(device);
        let lighting = LightingUniform {
            sun_dir: [5.0, 10.0, 7.5],
            sun_intensity: 0.8,
            ambient: 0.3,
            _pad1: 0.0,
            _pad2: 0.0,
            _pad3: 0.0,
        };
        gpu.queue.write_buffer(&camera.lighting_buffer, 0, bytemuck::bytes_of(&lighting));

        let model_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let pipeline = create_scene_pipeline(device, gpu.format, &camera.bind_group_layout, &model_bgl);

        let sphere = create_sphere_mesh(32, 32, BALL_COLOR).upload(device, "sphere");
        let cube = create_cube_mesh(OBSTACLE_COLOR).upload(device, "cube");
        let plane = create_plane_mesh(GROUND_COLOR).upload(device, "plane");
        let ground_slot = create_model_slot(device, &model_bgl, "ground");
        let ball_slot = create_model_slot(device, &model_bgl, "ball");

        let egui_ctx = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(device, gpu.format, egui_wgpu::RendererOptions::default());

        Self {
            depth_view,
            pipeline,
            camera,
            model_bgl,
            sphere,
            cube,
            plane,
            ground_slot,
            ball_slot,
            obstacle_slots: Vec::new(),
            egui_ctx,
            egui_renderer,
            pixels_per_point: 1.0,
            elapsed: 0.0,
            gpu,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    pub fn set_pixels_per_point(&mut self, ppp: f32) {
        if ppp > 0.0 {
            self.pixels_per_point = ppp;
        }
    }

    fn write_transforms(&mut self, frame: &FrameView<'_>) {
        let obstacle_count = frame.world.obstacles.len();
        while self.obstacle_slots.len() < obstacle_count {
            let slot = create_model_slot(self.gpu.device.as_ref(), &self.model_bgl, "obstacle");
            self.obstacle_slots.push(slot);
        }

        let queue = self.gpu.queue.as_ref();
        let camera_uniform = CameraUniform { view_proj: frame.view_proj.to_cols_array_2d() };
        queue.write_buffer(&self.camera.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        let write = |slot: &ModelSlot, m: Mat4| {
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&TransformUniform::from(m)));
        };
        write(&self.ground_slot, frame.ground_transform());
        write(&self.ball_slot, frame.ball_transform());
        for (slot, m) in self.obstacle_slots.iter().zip(frame.obstacle_transforms()) {
            write(slot, m);
        }
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.gpu.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.gpu.surface.configure(self.gpu.device.as_ref(), &self.gpu.config);
                Err(RenderError::Reconfigured(e))
            }
            Err(e) => Err(RenderError::Surface(e)),
        }
    }
}

fn create_model_slot(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> ModelSlot {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}_transform")),
        contents: bytemuck::bytes_of(&TransformUniform::from(Mat4::IDENTITY)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}_bind_group")),
        layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });
    ModelSlot { buffer, bind_group }
}

impl Renderer for WgpuRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        self.write_transforms(frame);

        // HUD first so a skipped frame still advances egui's clock
        self.elapsed += frame.stats.last_dt as f64;
        let (width, height) = self.size();
        let ppp = self.pixels_per_point;
        let mut raw_input = egui::RawInput::default();
        raw_input.time = Some(self.elapsed);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(width as f32 / ppp, height as f32 / ppp),
        ));
        self.egui_ctx.set_pixels_per_point(ppp);
        let mut full_output = hud::build_hud(&self.egui_ctx, raw_input, frame);
        let primitives = self.egui_ctx.tessellate(std::mem::take(&mut full_output.shapes), ppp);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: ppp,
        };

        let surface_frame = self.acquire_frame()?;
        let view = surface_frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let device = self.gpu.device.as_ref();
        let queue = self.gpu.queue.as_ref();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: 0.5, g: 0.8, b: 1.0, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
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

            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &self.camera.camera_bind_group, &[]);

            let mut draw = |mesh: &MeshBuffer, slot: &ModelSlot| {
                rp.set_bind_group(1, &slot.bind_group, &[]);
                rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rp.draw_indexed(0..mesh.index_count, 0, 0..1);
            };
            draw(&self.plane, &self.ground_slot);
            for slot in self.obstacle_slots.iter().take(frame.world.obstacles.len()) {
                draw(&self.cube, slot);
            }
            draw(&self.sphere, &self.ball_slot);
        }

        // Upload egui textures
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let egui_commands = self
            .egui_renderer
            .update_buffers(device, queue, &mut encoder, &primitives, &screen_descriptor);

        // Render egui overlay
        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        surface_frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.config.width = width;
        self.gpu.config.height = height;
        self.gpu.surface.configure(self.gpu.device.as_ref(), &self.gpu.config);
        let (_, depth_view) = create_depth_texture(self.gpu.device.as_ref(), width, height);
        self.depth_view = depth_view;
        tracing::debug!(width, height, "surface resized");
    }
}
