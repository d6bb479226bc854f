//! Window surface presentation.
//!
//! The animation is composited on the CPU. Each frame the scene buffer is
//! uploaded into a texture and drawn as one fullscreen triangle into a
//! letterboxed viewport; the rest of the surface is cleared to black.

mod scene_texture;

use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;
use winit::window::Window;

use crate::error::{Error, Result};
use crate::viewport::Letterbox;

use scene_texture::SceneTexture;

const PRESENT_SHADER: &str = r#"
@group(0) @binding(0)
var scene_texture: texture_2d<f32>;
@group(0) @binding(1)
var scene_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // Fullscreen triangle
    let corner = vec2<f32>(f32((vertex_index << 1u) & 2u), f32(vertex_index & 2u));

    var out: VertexOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(scene_texture, scene_sampler, in.uv);
}
"#;

/// Owns the GPU surface and draws scene buffers onto it.
pub struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    scene: SceneTexture,
}

impl Presenter {
    /// Create the surface for `window` and a texture for a scene buffer of
    /// `buffer_width` x `buffer_height` pixels.
    pub async fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Gpu("no compatible GPU adapter found".into()))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("surface reports no texture formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene = SceneTexture::new(&device, buffer_width, buffer_height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(PRESENT_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[scene.bind_group_layout()],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost or
    /// became outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    /// Placement of the scene buffer on the current surface.
    pub fn letterbox(&self) -> Letterbox {
        Letterbox::fit(self.scene.size(), self.surface_size())
    }

    /// Upload `scene` and present it letterboxed.
    pub fn render(&mut self, scene: &RgbaImage) -> std::result::Result<(), wgpu::SurfaceError> {
        self.scene.upload(&self.queue, scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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

            let (x, y, w, h) = viewport_rect(&self.letterbox(), self.surface_size());
            if w > 0.0 && h > 0.0 {
                render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, self.scene.bind_group(), &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Letterbox area clamped to the surface, as `(x, y, width, height)`.
fn viewport_rect(letterbox: &Letterbox, surface: Vec2) -> (f32, f32, f32, f32) {
    let min = letterbox.offset.max(Vec2::ZERO);
    let max = (letterbox.offset + letterbox.size).min(surface);
    let size = (max - min).max(Vec2::ZERO);
    (min.x, min.y, size.x, size.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rect_matches_letterbox() {
        let surface = Vec2::new(400.0, 200.0);
        let lb = Letterbox::fit(Vec2::new(100.0, 100.0), surface);
        assert_eq!(viewport_rect(&lb, surface), (100.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_viewport_rect_is_clamped_to_surface() {
        let lb = Letterbox {
            scale: 1.0,
            offset: Vec2::new(-0.5, 10.0),
            size: Vec2::new(101.0, 50.0),
        };
        let (x, y, w, h) = viewport_rect(&lb, Vec2::new(100.0, 60.0));
        assert_eq!((x, y), (0.0, 10.0));
        assert_eq!((w, h), (100.0, 50.0));
    }
}
