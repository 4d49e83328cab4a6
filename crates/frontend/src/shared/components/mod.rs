pub mod confirm_dialog;
pub mod pagination_controls;
pub mod permission_editor;
pub mod status_filter;
pub mod store_picker;
pub mod table;
