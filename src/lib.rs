#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;
use wheel_core::{DragMapper, WheelDirector, WheelGestureMapper, WheelSeed, WheelState};

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod share;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wheel-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, constants::CANVAS_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let search = dom::location_search();
    let seed = WheelSeed::from_query_or_random(
        search.as_deref().and_then(share::query_from_search),
        &mut rand::thread_rng(),
    );
    log::info!("[seed] {}", seed.to_query());

    let store = Rc::new(RefCell::new(WheelState::new(seed)));
    let director = Rc::new(RefCell::new(WheelDirector::new(&store.borrow())));
    let wheel = Rc::new(RefCell::new(WheelGestureMapper::default()));
    let drag = Rc::new(RefCell::new(DragMapper::new(canvas.height() as f32)));

    events::wire_global_keydown(store.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        store: store.clone(),
        director: director.clone(),
        wheel,
        drag: drag.clone(),
    });

    // Without a GPU the store, gestures and share URL keep working
    let started = Instant::now();
    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_some() {
        log::info!("[gpu] ready in {:?}", started.elapsed());
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        store,
        director,
        drag,
        canvas,
        gpu,
        viewport: (0, 0),
        pathname: dom::location_pathname(),
        shared_revision: None,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
