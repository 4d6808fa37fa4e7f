pub mod map_view;
pub mod marker_popup;
pub mod pin_list;
