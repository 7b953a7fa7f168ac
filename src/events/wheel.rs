use super::InputWiring;
use crate::input;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use wheel_core::WheelSample;

pub fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        // Non-passive so the page itself never scrolls under the canvas
        ev.prevent_default();
        let now = Instant::now();
        let sample = WheelSample::new(ev.delta_y() as f32, input::delta_mode(ev.delta_mode()), now);
        let is_open = w.store.borrow().is_open();
        let step = w.wheel.borrow_mut().on_wheel(&sample, is_open);
        if let Some(step) = step {
            log::debug!("[wheel] scroll step {:?}", step);
            w.store.borrow_mut().step(step, now);
        }
    }) as Box<dyn FnMut(_)>);

    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    if let Err(e) = w.canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &opts,
    ) {
        log::warn!("[wheel] could not attach wheel listener: {:?}", e);
    }
    closure.forget();
}
