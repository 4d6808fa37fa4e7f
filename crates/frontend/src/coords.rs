/// Container size used before the map element has been laid out.
pub const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Whether a container-relative point lies inside a `width` x `height` box.
pub fn inside(x: f64, y: f64, width: f64, height: f64) -> bool {
    (0.0..=width).contains(&x) && (0.0..=height).contains(&y)
}

fn container_rect(container_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    Some(element.get_bounding_client_rect())
}

/// Rendered size of the container, if it is laid out.
pub fn container_size(container_id: &str) -> Option<(f64, f64)> {
    let rect = container_rect(container_id)?;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some((rect.width(), rect.height()))
}

/// Container-relative position of a click, or `None` if the element is
/// gone or the point falls outside it.
pub fn click_to_container(client_x: f64, client_y: f64, container_id: &str) -> Option<(f64, f64)> {
    let rect = container_rect(container_id)?;
    let (x, y) = client_to_container(client_x, client_y, rect.left(), rect.top());
    inside(x, y, rect.width(), rect.height()).then_some((x, y))
}
