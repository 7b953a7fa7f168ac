use crate::dom;
use crate::share;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use wheel_core::{DragMapper, WheelDirector, WheelState};
use wheel_gpu::Renderer;

pub struct FrameContext {
    pub store: Rc<RefCell<WheelState>>,
    pub director: Rc<RefCell<WheelDirector>>,
    pub drag: Rc<RefCell<DragMapper>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<Renderer<'static>>,

    pub viewport: (u32, u32),
    pub pathname: String,
    pub shared_revision: Option<u64>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        self.track_viewport();

        {
            let mut store = self.store.borrow_mut();
            self.director.borrow_mut().frame(&mut store, now);
        }
        self.sync_share_url();

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let director = self.director.borrow();
        let reflection = director.reflection_camera();
        match gpu.render(director.scene(), director.camera(), &reflection) {
            Ok(plan) => {
                if plan.frame == 0 {
                    log::info!("[gpu] first frame presented");
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory; rendering stopped");
                drop(director);
                self.gpu = None;
            }
            Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
        }
    }

    fn track_viewport(&mut self) {
        let size = (self.canvas.width(), self.canvas.height());
        if size == self.viewport || size.0 == 0 || size.1 == 0 {
            return;
        }
        self.viewport = size;
        self.director.borrow_mut().set_viewport(size.0, size.1);
        self.drag.borrow_mut().set_viewport_height(size.1 as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(size.0, size.1);
        }
    }

    /// Keep the address bar pointing at the current seed.
    fn sync_share_url(&mut self) {
        let store = self.store.borrow();
        let revision = store.revision();
        if self.shared_revision == Some(revision) {
            return;
        }
        self.shared_revision = Some(revision);
        dom::replace_url(&share::share_url(&self.pathname, &store.seed()));
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<Renderer<'static>> {
    let instance = wgpu::Instance::default();
    // An owned canvas target gives a 'static surface
    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
        Ok(s) => s,
        Err(e) => {
            log::error!("WebGPU surface error: {:?}", e);
            return None;
        }
    };
    match Renderer::new(&instance, surface, canvas.width().max(1), canvas.height().max(1)).await {
        Ok(r) => Some(r),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
