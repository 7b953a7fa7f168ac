use crate::input;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use wheel_core::{key_command, WheelState};

/// Arrow keys step the wheel, Space/Enter open or close it, `R` reshuffles
/// the segment colors.
pub fn wire_global_keydown(store: Rc<RefCell<WheelState>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let key = ev.key();
        let Some(command) = key_command(&key) else {
            return;
        };
        if input::suppresses_default(&key) {
            ev.prevent_default();
        }
        if ev.repeat() && !input::accepts_repeat(command) {
            return;
        }
        command.apply(&mut store.borrow_mut(), Instant::now(), &mut rand::thread_rng());
        log::debug!("[keys] {:?}", command);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
