use wasm_bindgen::JsCast;

/// Inner width and height of the browser window in CSS pixels.
pub(crate) fn viewport_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_default();
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_default();
    (width, height)
}

/// Element the event was dispatched on, if it is an element.
pub(crate) fn event_element(ev: &web_sys::Event) -> Option<web_sys::Element> {
    ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok())
}

pub(crate) fn event_target_inside(ev: &web_sys::Event, container: &web_sys::Node) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|node| container.contains(Some(&node)))
}

/// True when a `dragleave` on `row` moved onto one of its descendants.
pub(crate) fn drag_left_into_descendant(ev: &web_sys::DragEvent, row: &web_sys::Node) -> bool {
    ev.related_target()
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|related| row.contains(Some(&related)))
}
