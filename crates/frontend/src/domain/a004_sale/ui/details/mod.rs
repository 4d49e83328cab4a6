//! Карточка продажи
//!
//! - view_model.rs: загрузка, смена статусов
//! - view.rs: позиции, итоги, переходы к счёту и возврату

mod view;
mod view_model;

pub use view::SaleDetails;
pub use view_model::{status_choices, SaleDetailsViewModel};
