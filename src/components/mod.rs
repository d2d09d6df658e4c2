pub mod pane_view;
pub mod status_bar;
