//! wgpu renderer for the wheel scene.
//!
//! Per frame, in the order given by the [`FramePlan`]:
//! 1. reflection pass: swatches and segments through the mirrored camera into
//!    the fixed-size reflection target (skipped on throttled frames, the
//!    previous texture stays valid)
//! 2. main pass: floor sampling the reflection, then segments and swatches,
//!    into the HDR target
//! 3. composite: tonemap HDR onto the surface

mod helpers;
mod mesh;
mod pipelines;
mod post;
mod targets;

use mesh::InstanceRaw;
use pipelines::{CameraUniforms, FloorResources, FloorUniforms, SceneResources};
use post::{PostResources, PostUniforms};
use targets::RenderTargets;
use wgpu::util::DeviceExt;
use wheel_core::compositor::{PassKind, ReflectionCamera};
use wheel_core::{
    Camera, FramePlan, ReflectionSchedule, SceneFrame, TargetSizes, FOG_FAR, FOG_NEAR,
};

const EXPOSURE: f32 = 1.0;
const REFLECTION_BLUR_TEXELS: f32 = 2.0;
const INITIAL_INSTANCE_CAPACITY: usize = 128;

struct MeshBuffers {
    vb: wgpu::Buffer,
    ib: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, (vertices, indices): (Vec<mesh::Vertex>, Vec<u16>)) -> Self {
        let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vb,
            ib,
            index_count: indices.len() as u32,
        }
    }
}

pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sizes: TargetSizes,
    schedule: ReflectionSchedule,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    scene: SceneResources,
    floor: FloorResources,
    post: PostResources,
    bg_hdr: wgpu::BindGroup,
    cube: MeshBuffers,
    quad: MeshBuffers,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    clear_color: wgpu::Color,
}

impl<'a> Renderer<'a> {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'a>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits so older WebGPU implementations accept the request
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let sizes = TargetSizes::new(width, height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: sizes.main.0,
            height: sizes.main.1,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter={} format={:?} size={}x{}",
            adapter.get_info().name,
            format,
            config.width,
            config.height
        );

        let targets = RenderTargets::new(&device, &sizes);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(wheel_core::SCENE_WGSL.into()),
        });
        let floor_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("floor_shader"),
            source: wgpu::ShaderSource::Wgsl(wheel_core::FLOOR_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(wheel_core::POST_WGSL.into()),
        });

        let scene = pipelines::create_scene_resources(&device, &scene_shader);
        let floor = pipelines::create_floor_resources(
            &device,
            &floor_shader,
            &targets.reflection_view,
            &linear_sampler,
        );
        let post = post::create_post_resources(&device, &post_shader, format);
        let bg_hdr = post::bind_hdr(&device, &post, &targets.hdr_view, &linear_sampler);

        let cube = MeshBuffers::new(&device, "cube", mesh::cube());
        let quad = MeshBuffers::new(&device, "quad", mesh::quad());
        let instance_vb = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sizes,
            schedule: ReflectionSchedule::default(),
            targets,
            linear_sampler,
            scene,
            floor,
            post,
            bg_hdr,
            cube,
            quad,
            instance_vb,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.sizes.main
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.sizes.resize(width, height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.targets.recreate_main(&self.device, width, height);
        self.bg_hdr = post::bind_hdr(
            &self.device,
            &self.post,
            &self.targets.hdr_view,
            &self.linear_sampler,
        );
    }

    /// Reconfigure after `SurfaceError::Lost` or `Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        frame: &SceneFrame,
        camera: &Camera,
        reflection: &ReflectionCamera,
    ) -> Result<FramePlan, wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload(frame, camera, reflection);
        let plan = self.schedule.plan();
        let segment_count = frame.segments.len() as u32;
        let instance_count = segment_count + frame.swatches.len() as u32;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        for step in plan.passes.iter() {
            match step.kind {
                PassKind::Reflection => {
                    let mut rpass = begin_depth_pass(
                        &mut encoder,
                        "reflection_pass",
                        &self.targets.reflection_view,
                        &self.targets.reflection_depth_view,
                        wgpu::Color::TRANSPARENT,
                    );
                    self.draw_instances(&mut rpass, &self.scene.reflection_bg, segment_count, instance_count);
                }
                PassKind::Main => {
                    let mut rpass = begin_depth_pass(
                        &mut encoder,
                        "main_pass",
                        &self.targets.hdr_view,
                        &self.targets.depth_view,
                        self.clear_color,
                    );
                    rpass.set_pipeline(&self.floor.pipeline);
                    rpass.set_bind_group(0, &self.floor.bind_group, &[]);
                    rpass.set_vertex_buffer(0, self.quad.vb.slice(..));
                    rpass.set_index_buffer(self.quad.ib.slice(..), wgpu::IndexFormat::Uint16);
                    rpass.draw_indexed(0..self.quad.index_count, 0, 0..1);
                    self.draw_instances(&mut rpass, &self.scene.main_bg, segment_count, instance_count);
                }
                PassKind::Composite => post::blit(
                    &mut encoder,
                    "composite",
                    &surface_view,
                    self.clear_color,
                    &self.post.composite_pipeline,
                    &self.bg_hdr,
                ),
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(plan)
    }

    fn upload(&mut self, frame: &SceneFrame, camera: &Camera, reflection: &ReflectionCamera) {
        let eye = camera.eye.extend(1.0).to_array();
        let fog = [0.0, FOG_NEAR, FOG_FAR, 0.0];
        self.queue.write_buffer(
            &self.scene.main_camera,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                eye,
                clip_plane: [0.0; 4],
                params: fog,
            }),
        );
        // Mirrored eye keeps fog distances the same in the reflection.
        let mirrored_eye = frame.plane().reflection_matrix().transform_point3(camera.eye);
        self.queue.write_buffer(
            &self.scene.reflection_camera,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: reflection.view_proj.to_cols_array_2d(),
                eye: mirrored_eye.extend(1.0).to_array(),
                clip_plane: reflection.clip_plane.to_array(),
                params: [1.0, FOG_NEAR, FOG_FAR, 0.0],
            }),
        );
        let (rw, _) = self.sizes.reflection;
        self.queue.write_buffer(
            &self.floor.uniform_buffer,
            0,
            bytemuck::bytes_of(&FloorUniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                model: frame.floor.to_cols_array_2d(),
                texture_matrix: reflection.texture_matrix.to_cols_array_2d(),
                eye,
                params: [1.0 / rw.max(1) as f32, REFLECTION_BLUR_TEXELS, FOG_NEAR, FOG_FAR],
            }),
        );
        let (w, h) = self.sizes.main;
        self.queue.write_buffer(
            &self.post.uniform_buffer,
            0,
            bytemuck::bytes_of(&PostUniforms {
                resolution: [w as f32, h as f32],
                exposure: EXPOSURE,
                _pad: 0.0,
            }),
        );

        // Segments are opaque and go first; translucent swatches after.
        let instances: Vec<InstanceRaw> = frame
            .segments
            .iter()
            .chain(frame.swatches.iter())
            .map(InstanceRaw::from)
            .collect();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_vb = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("[gpu] instance buffer grown to {}", self.instance_capacity);
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&instances));
        }
    }

    fn draw_instances(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        camera_bg: &wgpu::BindGroup,
        segment_count: u32,
        instance_count: u32,
    ) {
        if instance_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.scene.pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_vertex_buffer(0, self.cube.vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.set_index_buffer(self.cube.ib.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.cube.index_count, 0, 0..segment_count);
        rpass.draw_indexed(0..self.cube.index_count, 0, segment_count..instance_count);
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<InstanceRaw>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn begin_depth_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}
