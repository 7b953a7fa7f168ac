use super::helpers;
use wheel_core::TargetSizes;

/// Off-screen targets of the two passes.
///
/// - `reflection_*` is the fixed-size mirror image sampled by the floor.
/// - `hdr_*` and `depth_*` follow the viewport and feed the composite.
pub(crate) struct RenderTargets {
    #[allow(dead_code)]
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) reflection_tex: wgpu::Texture,
    pub(crate) reflection_view: wgpu::TextureView,
    pub(crate) reflection_depth_tex: wgpu::Texture,
    pub(crate) reflection_depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, sizes: &TargetSizes) -> Self {
        let (mw, mh) = sizes.main;
        let (rw, rh) = sizes.reflection;
        let (hdr_tex, hdr_view) = helpers::create_color_target(device, "hdr_tex", mw, mh);
        let (depth_tex, depth_view) = helpers::create_depth_target(device, "depth_tex", mw, mh);
        let (reflection_tex, reflection_view) =
            helpers::create_color_target(device, "reflection_tex", rw, rh);
        let (reflection_depth_tex, reflection_depth_view) =
            helpers::create_depth_target(device, "reflection_depth_tex", rw, rh);
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            reflection_tex,
            reflection_view,
            reflection_depth_tex,
            reflection_depth_view,
        }
    }

    /// Recreate the viewport-sized targets. The reflection target keeps its size.
    pub(crate) fn recreate_main(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        (self.hdr_tex, self.hdr_view) = helpers::create_color_target(device, "hdr_tex", width, height);
        (self.depth_tex, self.depth_view) =
            helpers::create_depth_target(device, "depth_tex", width, height);
        log::debug!(
            "[gpu] main targets {}x{} (reflection {}x{})",
            width,
            height,
            self.reflection_tex.width(),
            self.reflection_depth_tex.height()
        );
    }
}
