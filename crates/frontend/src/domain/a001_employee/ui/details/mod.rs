//! Форма сотрудника (создание/редактирование)
//!
//! - view_model.rs: черновик формы, команды сохранения
//! - view.rs: компонент формы в модальном окне

mod view;
mod view_model;

pub use view::EmployeeDetails;
pub use view_model::EmployeeDetailsViewModel;
