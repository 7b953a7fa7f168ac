use super::InputWiring;
use crate::input;
use glam::Vec2;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::client_to_canvas_px(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}

fn listen(canvas: &web::HtmlCanvasElement, name: &str, handler: impl FnMut(web::PointerEvent) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
    if let Err(e) = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
        log::warn!("[pointer] could not attach {}: {:?}", name, e);
    }
    closure.forget();
}

pub fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "pointerdown", move |ev| {
        if !input::is_primary_button(ev.button()) {
            return;
        }
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        let pos = pointer_canvas_px(&ev, &w.canvas);
        w.drag.borrow_mut().begin(pos.y, Instant::now());
    });
}

pub fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "pointermove", move |ev| {
        let pos = pointer_canvas_px(&ev, &w.canvas);
        let now = Instant::now();
        let is_open = w.store.borrow().is_open();
        let step = w.drag.borrow_mut().on_move(pos.y, now, is_open);
        if let Some(step) = step {
            log::debug!("[drag] step {:?}", step);
            w.store.borrow_mut().step(step, now);
        }
    });
}

pub fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "pointerup", move |ev| {
        if !input::is_primary_button(ev.button()) {
            return;
        }
        _ = w.canvas.release_pointer_capture(ev.pointer_id());
        let was_drag = w.drag.borrow_mut().end();
        if was_drag {
            return;
        }
        let pos = pointer_canvas_px(&ev, &w.canvas);
        let (width, height) = (w.canvas.width() as f32, w.canvas.height() as f32);
        let hit = w
            .director
            .borrow()
            .click(&mut w.store.borrow_mut(), pos, width, height);
        if let Some(hit) = hit {
            log::debug!("[pointer] click {:?}", hit);
        }
    });
}

pub fn wire_pointercancel(w: &InputWiring) {
    for name in ["pointercancel", "pointerleave"] {
        let w = w.clone();
        let canvas = w.canvas.clone();
        listen(&canvas, name, move |_ev| {
            w.drag.borrow_mut().cancel();
            w.wheel.borrow_mut().end_gesture();
        });
    }
}
