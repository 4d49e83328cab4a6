pub mod api_utils;
pub mod components;
pub mod date_utils;
pub mod entity_store;
pub mod form_utils;
pub mod icons;
pub mod list_state;
pub mod list_utils;
pub mod modal;
pub mod page_frame;
pub mod page_standard;
pub mod request_seq;
