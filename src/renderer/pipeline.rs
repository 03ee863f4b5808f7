//! WebGPU render pipeline setup
//!
//! Plain colored triangle list; geometry comes from `scene::build` in canvas
//! space and is mapped to clip space here before upload.

use wgpu::util::DeviceExt;

use super::vertex::Vertex;

/// Fraction of the viewport left empty around the arena
const ARENA_MARGIN: f32 = 0.05;

/// GPU handles plus the viewport mapping
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Half the arena's side length
    pub half_extent: f32,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        arena_size: f32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pin-ring-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let config = surface_config(&surface, adapter, width, height);
        surface.configure(&device, &config);
        let pipeline = triangle_pipeline(&device, config.format);
        log::info!("Renderer ready ({width}x{height}, {:?})", config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            size: (width, height),
            half_extent: arena_size * 0.5,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Map a frame's canvas-space vertices into clip space
    pub fn to_clip_space(&self, vertices: &[Vertex]) -> Vec<Vertex> {
        vertices
            .iter()
            .map(|v| {
                let (x, y) = canvas_to_ndc(v.position[0], v.position[1], self.size, self.half_extent);
                Vertex::new(x, y, v.color)
            })
            .collect()
    }

    /// Draw one frame over a `clear` background
    pub fn render(&mut self, vertices: &[Vertex], clear: [f32; 4]) -> Result<(), wgpu::SurfaceError> {
        let clip = self.to_clip_space(vertices);
        // A fresh buffer per frame; the scene is a few thousand vertices
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("pin-ring-frame-vertices"),
                contents: bytemuck::cast_slice(&clip),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pin-ring-frame"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pin-ring-scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !clip.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..clip.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Prefer an sRGB surface format so theme colours match the DOM
fn surface_config(
    surface: &wgpu::Surface<'static>,
    adapter: &wgpu::Adapter,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    let caps = surface.get_capabilities(adapter);
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Rgba8UnormSrgb);
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// Alpha-blended triangle list without culling
fn triangle_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pin-ring-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pin-ring-layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pin-ring-pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
    let [r, g, b, a] = rgba.map(f64::from);
    wgpu::Color { r, g, b, a }
}

/// Map ring-centered canvas space (y down) into clip space (y up),
/// letterboxing the square arena into the viewport
pub fn canvas_to_ndc(x: f32, y: f32, size: (u32, u32), half_extent: f32) -> (f32, f32) {
    let (w, h) = size;
    let aspect = w.max(1) as f32 / h.max(1) as f32;
    let scale = 1.0 / (half_extent * (1.0 + ARENA_MARGIN));

    if aspect > 1.0 {
        (x * scale / aspect, -y * scale)
    } else {
        (x * scale, -y * scale * aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_ndc_flips_y() {
        let (x, y) = canvas_to_ndc(0.0, -300.0, (800, 800), 300.0);
        assert_eq!(x, 0.0);
        assert!(y > 0.9 && y < 1.0);
    }

    #[test]
    fn test_canvas_to_ndc_letterboxes() {
        // Wide viewport squeezes x so the arena stays square
        let (x, y) = canvas_to_ndc(300.0, 300.0, (1600, 800), 300.0);
        assert!((x * 2.0 + y).abs() < 1e-5);
    }

    #[test]
    fn test_clear_color_widens_channels() {
        let color = clear_color([0.5, 0.25, 1.0, 1.0]);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.25, 1.0, 1.0));
    }
}
