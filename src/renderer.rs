use anyhow::{Context, Result};
use blockworld::{Instance, Mesh, Projection, WorldState};
use glam::Mat4;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

const INITIAL_INSTANCES: usize = 4096;
const SPHERE_BANDS: u16 = 30;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl InstanceRaw {
    fn from_instance(instance: &Instance) -> Self {
        Self {
            model: instance.model_matrix().to_cols_array_2d(),
            color: instance.color,
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            5 => Float32x4, 6 => Float32x4, 7 => Float32x4, 8 => Float32x4, 9 => Float32x4
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    camera_position: [f32; 4],
    options: [f32; 4],
}

impl Globals {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            light_position: [0.0; 4],
            light_color: [1.0; 4],
            camera_position: [0.0; 4],
            options: [1.0, 0.0, 0.0, 0.0],
        }
    }

    fn update(&mut self, world: &WorldState, projection: &Projection) {
        let camera = world.camera();
        let view_proj = projection.build_projection_matrix(camera.fov) * camera.build_view_matrix();
        self.view_proj = view_proj.to_cols_array_2d();
        self.light_position = world.animation().light_position.extend(1.0).to_array();
        let [r, g, b] = world.light_color();
        self.light_color = [r, g, b, 1.0];
        self.camera_position = camera.eye().extend(1.0).to_array();
        self.options[0] = if world.lighting_enabled() { 1.0 } else { 0.0 };
        self.options[1] = if world.normals_enabled() { 1.0 } else { 0.0 };
    }
}

// One quad per face, wound counter-clockwise seen from outside.
const CUBE_VERTICES: &[Vertex] = &[
    // +X
    Vertex { position: [0.5, -0.5, 0.5], normal: [1.0, 0.0, 0.0] },
    Vertex { position: [0.5, -0.5, -0.5], normal: [1.0, 0.0, 0.0] },
    Vertex { position: [0.5, 0.5, -0.5], normal: [1.0, 0.0, 0.0] },
    Vertex { position: [0.5, 0.5, 0.5], normal: [1.0, 0.0, 0.0] },
    // -X
    Vertex { position: [-0.5, -0.5, -0.5], normal: [-1.0, 0.0, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.5], normal: [-1.0, 0.0, 0.0] },
    Vertex { position: [-0.5, 0.5, 0.5], normal: [-1.0, 0.0, 0.0] },
    Vertex { position: [-0.5, 0.5, -0.5], normal: [-1.0, 0.0, 0.0] },
    // +Y
    Vertex { position: [-0.5, 0.5, 0.5], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [0.5, 0.5, 0.5], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [0.5, 0.5, -0.5], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [-0.5, 0.5, -0.5], normal: [0.0, 1.0, 0.0] },
    // -Y
    Vertex { position: [-0.5, -0.5, -0.5], normal: [0.0, -1.0, 0.0] },
    Vertex { position: [0.5, -0.5, -0.5], normal: [0.0, -1.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.5], normal: [0.0, -1.0, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.5], normal: [0.0, -1.0, 0.0] },
    // +Z
    Vertex { position: [-0.5, -0.5, 0.5], normal: [0.0, 0.0, 1.0] },
    Vertex { position: [0.5, -0.5, 0.5], normal: [0.0, 0.0, 1.0] },
    Vertex { position: [0.5, 0.5, 0.5], normal: [0.0, 0.0, 1.0] },
    Vertex { position: [-0.5, 0.5, 0.5], normal: [0.0, 0.0, 1.0] },
    // -Z
    Vertex { position: [0.5, -0.5, -0.5], normal: [0.0, 0.0, -1.0] },
    Vertex { position: [-0.5, -0.5, -0.5], normal: [0.0, 0.0, -1.0] },
    Vertex { position: [-0.5, 0.5, -0.5], normal: [0.0, 0.0, -1.0] },
    Vertex { position: [0.5, 0.5, -0.5], normal: [0.0, 0.0, -1.0] },
];

const CUBE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3,
    4, 5, 6, 4, 6, 7,
    8, 9, 10, 8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];

// Latitude/longitude sphere of radius 0.5, wound counter-clockwise from outside.
fn sphere_mesh(bands: u16) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(((bands + 1) * (bands + 1)) as usize);
    for lat in 0..=bands {
        let theta = lat as f32 * std::f32::consts::PI / bands as f32;
        for lon in 0..=bands {
            let phi = lon as f32 * std::f32::consts::TAU / bands as f32;
            let normal = [phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            vertices.push(Vertex { position: normal.map(|n| n * 0.5), normal });
        }
    }

    let mut indices = Vec::with_capacity((bands * bands * 6) as usize);
    for lat in 0..bands {
        for lon in 0..bands {
            let first = lat * (bands + 1) + lon;
            let second = first + bands + 1;
            indices.extend_from_slice(&[first, first + 1, second, second, first + 1, second + 1]);
        }
    }
    (vertices, indices)
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vertex_buffer, index_buffer, num_indices: indices.len() as u32 }
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    cube: MeshBuffers,
    sphere: MeshBuffers,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    num_cubes: u32,
    num_spheres: u32,
    instances: Vec<Instance>,
    raw: Vec<InstanceRaw>,
    sky: wgpu::Color,
    projection: Projection,
    globals: Globals,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
}

impl State {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor { ..Default::default() });
        let surface = instance.create_surface(window).context("creating surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .context("no suitable GPU adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                ..Default::default()
            })
            .await
            .context("requesting device")?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let projection = Projection::new(config.width, config.height, 0.1, 100.0);
        let globals = Globals::new();

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[globals]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("globals_bind_group_layout"),
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("globals_bind_group"),
        });

        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let cube = MeshBuffers::new(&device, "Cube", CUBE_VERTICES, CUBE_INDICES);
        let (sphere_vertices, sphere_indices) = sphere_mesh(SPHERE_BANDS);
        let sphere = MeshBuffers::new(&device, "Sphere", &sphere_vertices, &sphere_indices);

        let instance_buffer = create_instance_buffer(&device, INITIAL_INSTANCES);

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout, InstanceRaw::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            cube,
            sphere,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCES,
            num_cubes: 0,
            num_spheres: 0,
            instances: Vec::with_capacity(INITIAL_INSTANCES),
            raw: Vec::with_capacity(INITIAL_INSTANCES),
            sky: wgpu::Color::BLACK,
            projection,
            globals,
            globals_buffer,
            globals_bind_group,
            depth_view,
        })
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.projection.resize(new_size.width, new_size.height);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    /// Rebuild this frame's instances and uniforms from the world.
    pub fn update(&mut self, world: &WorldState) {
        self.globals.update(world, &self.projection);
        self.queue.write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[self.globals]));

        let [r, g, b, a] = world.sky_color().map(f64::from);
        self.sky = wgpu::Color { r, g, b, a };

        self.instances.clear();
        world.render(&mut self.instances);

        // Cubes first, then spheres, so each mesh draws one contiguous range.
        self.raw.clear();
        for mesh in [Mesh::Cube, Mesh::Sphere] {
            self.raw.extend(self.instances.iter().filter(|i| i.mesh == mesh).map(InstanceRaw::from_instance));
            if mesh == Mesh::Cube {
                self.num_cubes = self.raw.len() as u32;
            }
        }
        self.num_spheres = self.raw.len() as u32 - self.num_cubes;

        if self.raw.len() > self.instance_capacity {
            self.instance_capacity = self.raw.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("instance buffer grown to {}", self.instance_capacity);
        }
        self.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.raw));
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.sky),
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
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let ranges = [
                (&self.cube, 0..self.num_cubes),
                (&self.sphere, self.num_cubes..self.num_cubes + self.num_spheres),
            ];
            for (mesh, instances) in ranges {
                if instances.is_empty() {
                    continue;
                }
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..mesh.num_indices, 0, instances);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
