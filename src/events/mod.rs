pub mod keyboard;
pub mod pointer;
pub mod wheel;

use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;
use wheel_core::{DragMapper, WheelDirector, WheelGestureMapper, WheelState};

pub use keyboard::wire_global_keydown;

/// Shared handles every input listener needs.
#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub store: Rc<RefCell<WheelState>>,
    pub director: Rc<RefCell<WheelDirector>>,
    pub wheel: Rc<RefCell<WheelGestureMapper>>,
    pub drag: Rc<RefCell<DragMapper>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wheel::wire_wheel(&w);
    pointer::wire_pointerdown(&w);
    pointer::wire_pointermove(&w);
    pointer::wire_pointerup(&w);
    pointer::wire_pointercancel(&w);
}
