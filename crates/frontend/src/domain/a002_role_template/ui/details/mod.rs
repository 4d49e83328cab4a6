mod view;
mod view_model;

pub use view::RoleTemplateDetails;
pub use view_model::{RoleTemplateDetailsViewModel, TEMPLATE_SCOPE};
