pub mod api_error;
pub mod list_view;
pub mod money;
pub mod permissions;
pub mod validation;
